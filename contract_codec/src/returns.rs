use alloy::primitives::{Address, U256};

use crate::{
    error::CodecError,
    word::{self, WORD_LEN},
};

/// `getPoolState()` return tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStateReturn {
    pub total_assets: U256,
    pub total_borrowed: U256,
    pub available_liquidity: U256,
    pub exchange_rate: U256,
    pub total_share_supply: U256,
}

/// `getUserPosition(address)` return tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPositionReturn {
    pub loan_ids: Vec<u64>,
    pub total_principal: U256,
    pub total_repayment: U256,
    pub total_collateral: U256,
}

/// `loans(uint256)` return tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanReturn {
    pub borrower: Address,
    pub collateral_amount: U256,
    pub principal: U256,
    pub repayment_amount: U256,
    pub start_time: u64,
    pub duration: u64,
    pub is_active: bool,
}

/// `getLoanHealth(uint256)` return tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanHealthReturn {
    pub ltv: U256,
    pub is_liquidatable: bool,
}

/// `getLenderPosition(address)` return tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenderPositionReturn {
    pub share_balance: U256,
    pub exchange_rate: U256,
    pub underlying_balance: U256,
}

pub fn decode_pool_state(output: &[u8]) -> Result<PoolStateReturn, CodecError> {
    let [total_assets, total_borrowed, available_liquidity, exchange_rate, total_share_supply] =
        word::split_words::<5>(output)?;

    Ok(PoolStateReturn {
        total_assets,
        total_borrowed,
        available_liquidity,
        exchange_rate,
        total_share_supply,
    })
}

pub fn decode_user_position(output: &[u8]) -> Result<UserPositionReturn, CodecError> {
    // Head: offset(loanIds), totalPrincipal, totalRepayment, totalCollateral
    let [_, total_principal, total_repayment, total_collateral] = word::split_words::<4>(output)?;
    let offset = word::read_offset(output, 0)?;
    let loan_ids = decode_loan_ids(output, offset)?;

    Ok(UserPositionReturn {
        loan_ids,
        total_principal,
        total_repayment,
        total_collateral,
    })
}

/// `getUserLoans(address)` returns a bare `uint256[]`.
pub fn decode_user_loans(output: &[u8]) -> Result<Vec<u64>, CodecError> {
    let offset = word::read_offset(output, 0)?;
    decode_loan_ids(output, offset)
}

pub fn decode_loan(output: &[u8]) -> Result<LoanReturn, CodecError> {
    let expected = 7 * WORD_LEN;
    if output.len() < expected {
        return Err(CodecError::OutputTooShort {
            expected,
            actual: output.len(),
        });
    }

    Ok(LoanReturn {
        borrower: word::decode_address(word::word_at(output, 0)?),
        collateral_amount: word::decode_uint(word::word_at(output, 1)?),
        principal: word::decode_uint(word::word_at(output, 2)?),
        repayment_amount: word::decode_uint(word::word_at(output, 3)?),
        start_time: word::decode_u64(word::word_at(output, 4)?, "startTime")?,
        duration: word::decode_u64(word::word_at(output, 5)?, "duration")?,
        is_active: word::decode_bool(word::word_at(output, 6)?)?,
    })
}

pub fn decode_loan_health(output: &[u8]) -> Result<LoanHealthReturn, CodecError> {
    let expected = 2 * WORD_LEN;
    if output.len() < expected {
        return Err(CodecError::OutputTooShort {
            expected,
            actual: output.len(),
        });
    }

    Ok(LoanHealthReturn {
        ltv: word::decode_uint(word::word_at(output, 0)?),
        is_liquidatable: word::decode_bool(word::word_at(output, 1)?)?,
    })
}

pub fn decode_lender_position(output: &[u8]) -> Result<LenderPositionReturn, CodecError> {
    let [share_balance, exchange_rate, underlying_balance] = word::split_words::<3>(output)?;

    Ok(LenderPositionReturn {
        share_balance,
        exchange_rate,
        underlying_balance,
    })
}

/// Oracle price, 18 decimals.
pub fn decode_price(output: &[u8]) -> Result<U256, CodecError> {
    let [price] = word::split_words::<1>(output)?;
    Ok(price)
}

fn decode_loan_ids(output: &[u8], offset: usize) -> Result<Vec<u64>, CodecError> {
    word::decode_uint_array(output, offset)?
        .into_iter()
        .map(|id| u64::try_from(id).map_err(|_| CodecError::ValueOverflow { field: "loan id" }))
        .collect()
}
