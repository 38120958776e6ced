use alloy::primitives::keccak256;
use lazy_static::lazy_static;

/// Length of a function selector in bytes
pub const SELECTOR_LEN: usize = 4;

pub type Selector = [u8; SELECTOR_LEN];

/// The fixed catalogue of contract functions the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    // Lending pool views
    GetPoolState,
    GetUserPosition,
    GetUserLoans,
    Loans,
    GetLoanHealth,
    GetLenderPosition,
    // Oracle view
    GetPrice,
    // ERC20 / pool writes
    Approve,
    Deposit,
    Borrow,
    Repay,
    Liquidate,
    Withdraw,
    Mint,
}

impl ContractFunction {
    pub const ALL: [ContractFunction; 14] = [
        Self::GetPoolState,
        Self::GetUserPosition,
        Self::GetUserLoans,
        Self::Loans,
        Self::GetLoanHealth,
        Self::GetLenderPosition,
        Self::GetPrice,
        Self::Approve,
        Self::Deposit,
        Self::Borrow,
        Self::Repay,
        Self::Liquidate,
        Self::Withdraw,
        Self::Mint,
    ];

    /// Canonical Solidity signature the selector is derived from
    pub fn signature(self) -> &'static str {
        match self {
            Self::GetPoolState => "getPoolState()",
            Self::GetUserPosition => "getUserPosition(address)",
            Self::GetUserLoans => "getUserLoans(address)",
            Self::Loans => "loans(uint256)",
            Self::GetLoanHealth => "getLoanHealth(uint256)",
            Self::GetLenderPosition => "getLenderPosition(address)",
            Self::GetPrice => "getPrice(address)",
            Self::Approve => "approve(address,uint256)",
            Self::Deposit => "deposit(uint256)",
            Self::Borrow => "borrow(uint256,uint256)",
            Self::Repay => "repay(uint256)",
            Self::Liquidate => "liquidate(uint256)",
            Self::Withdraw => "withdraw(uint256)",
            Self::Mint => "mint(address,uint256)",
        }
    }

    /// Number of 32-byte argument words the function takes
    pub fn arity(self) -> usize {
        match self {
            Self::GetPoolState => 0,
            Self::Approve | Self::Borrow | Self::Mint => 2,
            _ => 1,
        }
    }

    pub fn selector(self) -> Selector {
        SELECTORS[self as usize]
    }
}

lazy_static! {
    // Indexed by discriminant, in the order of `ContractFunction::ALL`.
    static ref SELECTORS: Vec<Selector> = ContractFunction::ALL
        .iter()
        .map(|function| selector_of(function.signature()))
        .collect();
}

fn selector_of(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; SELECTOR_LEN];
    selector.copy_from_slice(&hash[..SELECTOR_LEN]);
    selector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_order_matches_discriminants() {
        for (index, function) in ContractFunction::ALL.iter().enumerate() {
            assert_eq!(*function as usize, index);
        }
    }

    #[test]
    fn test_well_known_selectors() {
        assert_eq!(ContractFunction::Approve.selector(), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(ContractFunction::Deposit.selector(), [0xb6, 0xb5, 0x5f, 0x25]);
        assert_eq!(ContractFunction::Withdraw.selector(), [0x2e, 0x1a, 0x7d, 0x4d]);
        assert_eq!(ContractFunction::Mint.selector(), [0x40, 0xc1, 0x0f, 0x19]);
    }

    #[test]
    fn test_selectors_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for function in ContractFunction::ALL {
            assert!(seen.insert(function.selector()), "{:?}", function);
        }
    }
}
