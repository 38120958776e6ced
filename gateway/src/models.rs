use alloy::primitives::{Address, U256};
use contract_codec::returns::{
    LenderPositionReturn, LoanHealthReturn, LoanReturn, PoolStateReturn, UserPositionReturn,
};
use serde::{Deserialize, Serialize};

use crate::utils::{
    address::address_string,
    decimal::{decimal_string, optional_decimal_string},
};

/// Aggregate pool metrics, replaced wholesale on each refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    #[serde(with = "decimal_string")]
    pub total_assets: U256,
    #[serde(with = "decimal_string")]
    pub total_borrowed: U256,
    #[serde(with = "decimal_string")]
    pub available_liquidity: U256,
    #[serde(with = "decimal_string")]
    pub exchange_rate: U256,
    #[serde(with = "decimal_string")]
    pub total_f_token_supply: U256,
}

impl From<PoolStateReturn> for PoolState {
    fn from(raw: PoolStateReturn) -> Self {
        Self {
            total_assets: raw.total_assets,
            total_borrowed: raw.total_borrowed,
            available_liquidity: raw.available_liquidity,
            exchange_rate: raw.exchange_rate,
            total_f_token_supply: raw.total_share_supply,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: u64,
    #[serde(with = "address_string")]
    pub borrower: Address,
    #[serde(with = "decimal_string")]
    pub collateral_amount: U256,
    #[serde(with = "decimal_string")]
    pub principal: U256,
    #[serde(with = "decimal_string")]
    pub repayment_amount: U256,
    pub start_time: u64,
    pub duration: u64,
    pub is_active: bool,
}

impl Loan {
    pub fn from_return(id: u64, raw: LoanReturn) -> Self {
        Self {
            id,
            borrower: raw.borrower,
            collateral_amount: raw.collateral_amount,
            principal: raw.principal,
            repayment_amount: raw.repayment_amount,
            start_time: raw.start_time,
            duration: raw.duration,
            is_active: raw.is_active,
        }
    }
}

/// Computed on-chain by `getLoanHealth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanHealth {
    #[serde(with = "decimal_string")]
    pub ltv: U256,
    pub is_liquidatable: bool,
}

impl From<LoanHealthReturn> for LoanHealth {
    fn from(raw: LoanHealthReturn) -> Self {
        Self {
            ltv: raw.ltv,
            is_liquidatable: raw.is_liquidatable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosition {
    #[serde(with = "address_string")]
    pub address: Address,
    pub loan_ids: Vec<u64>,
    #[serde(with = "decimal_string")]
    pub total_principal: U256,
    #[serde(with = "decimal_string")]
    pub total_repayment: U256,
    #[serde(with = "decimal_string")]
    pub total_collateral: U256,
}

impl UserPosition {
    pub fn from_return(address: Address, raw: UserPositionReturn) -> Self {
        Self {
            address,
            loan_ids: raw.loan_ids,
            total_principal: raw.total_principal,
            total_repayment: raw.total_repayment,
            total_collateral: raw.total_collateral,
        }
    }
}

/// A liquidity provider's share position.
///
/// `net_deposited` and `interest` need off-chain deposit/withdrawal tracking
/// which this service does not keep; they are always `None` (JSON `null`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderPosition {
    #[serde(with = "address_string")]
    pub address: Address,
    #[serde(with = "decimal_string")]
    pub f_token_balance: U256,
    #[serde(with = "decimal_string")]
    pub exchange_rate: U256,
    #[serde(with = "decimal_string")]
    pub underlying_balance: U256,
    #[serde(with = "optional_decimal_string")]
    pub net_deposited: Option<U256>,
    #[serde(with = "optional_decimal_string")]
    pub interest: Option<U256>,
}

impl LenderPosition {
    pub fn from_return(address: Address, raw: LenderPositionReturn) -> Self {
        Self {
            address,
            f_token_balance: raw.share_balance,
            exchange_rate: raw.exchange_rate,
            underlying_balance: raw.underlying_balance,
            net_deposited: None,
            interest: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    Cache,
    Chain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowQuote {
    #[serde(with = "decimal_string")]
    pub borrow_amount: U256,
    #[serde(with = "decimal_string")]
    pub collateral_wei: U256,
    #[serde(with = "decimal_string")]
    pub native_usd_price: U256,
    pub max_ltv_percent: u64,
    pub price_source: PriceSource,
}

/// One unsigned call for a wallet to sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxCall {
    #[serde(with = "address_string")]
    pub to: Address,
    /// `0x`-prefixed lowercase hex
    pub data: String,
    #[serde(with = "decimal_string")]
    pub value: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositTx {
    pub approve: TxCall,
    pub deposit: TxCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowTx {
    pub borrow: TxCall,
}

/// Amount approved for a repay or liquidation, and how long it is trusted.
///
/// The loan's repayment amount can change on-chain between building and
/// signing; callers should rebuild (or re-check) after `valid_until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentQuote {
    pub loan_id: u64,
    #[serde(with = "decimal_string")]
    pub repayment_amount: U256,
    pub quoted_at: i64,
    pub valid_until: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayTx {
    pub approve: TxCall,
    pub repay: TxCall,
    pub quote: RepaymentQuote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidateTx {
    pub approve: TxCall,
    pub liquidate: TxCall,
    pub quote: RepaymentQuote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawTx {
    pub withdraw: TxCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintTx {
    pub mint: TxCall,
}

/// Result of re-reading a loan against a previously approved amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentCheck {
    pub loan_id: u64,
    #[serde(with = "decimal_string")]
    pub approved_amount: U256,
    #[serde(with = "decimal_string")]
    pub current_repayment_amount: U256,
    pub is_active: bool,
    /// Approved amount still covers the current repayment amount
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amounts_serialize_as_decimal_strings() {
        let state = PoolState {
            total_assets: U256::MAX,
            total_borrowed: U256::from(1u64),
            available_liquidity: U256::ZERO,
            exchange_rate: U256::from(1_000_000_000_000_000_000u64),
            total_f_token_supply: U256::from(42u64),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            json!({
                "totalAssets": U256::MAX.to_string(),
                "totalBorrowed": "1",
                "availableLiquidity": "0",
                "exchangeRate": "1000000000000000000",
                "totalFTokenSupply": "42",
            })
        );
        let back: PoolState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_lender_untracked_fields_are_null() {
        let position = LenderPosition::from_return(
            Address::ZERO,
            LenderPositionReturn {
                share_balance: U256::from(10u64),
                exchange_rate: U256::from(2u64),
                underlying_balance: U256::from(20u64),
            },
        );
        let value = serde_json::to_value(&position).unwrap();
        assert_eq!(value["netDeposited"], serde_json::Value::Null);
        assert_eq!(value["interest"], serde_json::Value::Null);
        assert_eq!(value["underlyingBalance"], "20");
        assert_eq!(value["address"], "0x0000000000000000000000000000000000000000");
    }
}
