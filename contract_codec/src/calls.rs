use alloy::primitives::{Address, Bytes, U256};

use crate::{
    selectors::{ContractFunction, SELECTOR_LEN},
    word::{Word, WORD_LEN},
};

/// Selector followed by one word per argument, in declaration order.
///
/// Callers go through the typed helpers below, which fix the argument
/// layout of every catalogued function.
fn encode_call(function: ContractFunction, args: &[Word]) -> Bytes {
    debug_assert_eq!(args.len(), function.arity(), "{}", function.signature());

    let mut data = Vec::with_capacity(SELECTOR_LEN + args.len() * WORD_LEN);
    data.extend_from_slice(&function.selector());
    for arg in args {
        data.extend_from_slice(&arg.encode());
    }
    Bytes::from(data)
}

pub fn get_pool_state() -> Bytes {
    encode_call(ContractFunction::GetPoolState, &[])
}

pub fn get_user_position(user: Address) -> Bytes {
    encode_call(ContractFunction::GetUserPosition, &[user.into()])
}

pub fn get_user_loans(user: Address) -> Bytes {
    encode_call(ContractFunction::GetUserLoans, &[user.into()])
}

pub fn loans(loan_id: u64) -> Bytes {
    encode_call(ContractFunction::Loans, &[loan_id.into()])
}

pub fn get_loan_health(loan_id: u64) -> Bytes {
    encode_call(ContractFunction::GetLoanHealth, &[loan_id.into()])
}

pub fn get_lender_position(lender: Address) -> Bytes {
    encode_call(ContractFunction::GetLenderPosition, &[lender.into()])
}

/// `getPrice(asset)`; the native asset is queried with the zero address.
pub fn get_price(asset: Address) -> Bytes {
    encode_call(ContractFunction::GetPrice, &[asset.into()])
}

pub fn approve(spender: Address, amount: U256) -> Bytes {
    encode_call(ContractFunction::Approve, &[spender.into(), amount.into()])
}

pub fn deposit(amount: U256) -> Bytes {
    encode_call(ContractFunction::Deposit, &[amount.into()])
}

pub fn borrow(amount: U256, duration: u64) -> Bytes {
    encode_call(ContractFunction::Borrow, &[amount.into(), duration.into()])
}

pub fn repay(loan_id: u64) -> Bytes {
    encode_call(ContractFunction::Repay, &[loan_id.into()])
}

pub fn liquidate(loan_id: u64) -> Bytes {
    encode_call(ContractFunction::Liquidate, &[loan_id.into()])
}

pub fn withdraw(shares: U256) -> Bytes {
    encode_call(ContractFunction::Withdraw, &[shares.into()])
}

pub fn mint(to: Address, amount: U256) -> Bytes {
    encode_call(ContractFunction::Mint, &[to.into(), amount.into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_hex_prefixed, word};

    const SPENDER: &str = "0x8DEF68408Bc96553003094180E5C90d9fe5b88C1";

    #[test]
    fn test_approve_layout() {
        let spender: Address = SPENDER.parse().unwrap();
        let data = approve(spender, U256::from(1_000_000u64));

        assert_eq!(data.len(), 4 + 64);
        assert_eq!(
            to_hex_prefixed(&data),
            "0x095ea7b3\
             0000000000000000000000008def68408bc96553003094180e5c90d9fe5b88c1\
             00000000000000000000000000000000000000000000000000000000000f4240"
        );
    }

    #[test]
    fn test_no_argument_call_is_selector_only() {
        let data = get_pool_state();
        assert_eq!(data.as_ref(), &ContractFunction::GetPoolState.selector()[..]);
    }

    #[test]
    fn test_borrow_words_in_declaration_order() {
        let data = borrow(U256::from(500u64), 86_400);
        let args = &data[SELECTOR_LEN..];
        let [amount, duration] = word::split_words::<2>(args).unwrap();
        assert_eq!(amount, U256::from(500u64));
        assert_eq!(duration, U256::from(86_400u64));
    }

    #[test]
    fn test_address_and_integer_round_trip() {
        let to: Address = SPENDER.parse().unwrap();
        let cases = [U256::ZERO, U256::from(1u64), U256::from(u64::MAX), U256::MAX];
        for amount in cases {
            let data = mint(to, amount);
            let args = &data[SELECTOR_LEN..];
            assert_eq!(word::decode_address(word::word_at(args, 0).unwrap()), to);
            assert_eq!(word::decode_uint(word::word_at(args, 1).unwrap()), amount);
        }
    }
}
