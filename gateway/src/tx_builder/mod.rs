use std::time::Duration;

use alloy::primitives::{Address, Bytes, U256};
use anyhow::{Context, Result};
use chrono::Utc;
use contract_codec::{calls, to_hex_prefixed};
use tracing::{info, instrument};

use crate::{
    blockchain_manager::ChainGateway,
    models::{
        BorrowTx, DepositTx, LiquidateTx, Loan, MintTx, RepayTx, RepaymentCheck, RepaymentQuote,
        TxCall, WithdrawTx,
    },
    utils::{
        address::parse_address,
        decimal::{parse_decimal, parse_positive},
    },
};

/// Builds unsigned call bundles for a wallet to sign.
///
/// Holds no keys and never submits or estimates anything. Bundles that need
/// an allowance always list the `approve` call first.
pub struct TxBuilder {
    gateway: ChainGateway,
    token_address: Address,
    quote_validity: Duration,
}

impl TxBuilder {
    pub fn new(gateway: ChainGateway, token_address: Address, quote_validity: Duration) -> Self {
        Self {
            gateway,
            token_address,
            quote_validity,
        }
    }

    fn pool_address(&self) -> Address {
        self.gateway.pool_address()
    }

    fn pool_call(&self, data: Bytes, value: U256) -> TxCall {
        tx_call(self.pool_address(), data, value)
    }

    fn approve_pool(&self, amount: U256) -> TxCall {
        tx_call(
            self.token_address,
            calls::approve(self.pool_address(), amount),
            U256::ZERO,
        )
    }

    /// approve(pool, amount) + deposit(amount)
    pub fn build_deposit(&self, amount: &str) -> Result<DepositTx> {
        let amount = parse_positive("amount", amount)?;
        Ok(DepositTx {
            approve: self.approve_pool(amount),
            deposit: self.pool_call(calls::deposit(amount), U256::ZERO),
        })
    }

    /// borrow(amount, duration) carrying the collateral as call value.
    ///
    /// The collateral is taken as given (usually from a borrow quote); it is
    /// not recomputed here.
    pub fn build_borrow(&self, amount: &str, duration: u64, collateral_wei: &str) -> Result<BorrowTx> {
        let amount = parse_positive("amount", amount)?;
        let collateral = parse_decimal("collateralWei", collateral_wei)?;
        Ok(BorrowTx {
            borrow: self.pool_call(calls::borrow(amount, duration), collateral),
        })
    }

    /// approve(pool, repaymentAmount) + repay(loanId), sized from a fresh loan read.
    #[instrument("BUILD_REPAY", skip(self))]
    pub async fn build_repay(&self, loan_id: u64) -> Result<RepayTx> {
        let loan = self.read_loan(loan_id).await?;
        let quote = self.repayment_quote(&loan);
        Ok(RepayTx {
            approve: self.approve_pool(loan.repayment_amount),
            repay: self.pool_call(calls::repay(loan_id), U256::ZERO),
            quote,
        })
    }

    /// approve(pool, repaymentAmount) + liquidate(loanId), sized from a fresh loan read.
    #[instrument("BUILD_LIQUIDATE", skip(self))]
    pub async fn build_liquidate(&self, loan_id: u64) -> Result<LiquidateTx> {
        let loan = self.read_loan(loan_id).await?;
        let quote = self.repayment_quote(&loan);
        Ok(LiquidateTx {
            approve: self.approve_pool(loan.repayment_amount),
            liquidate: self.pool_call(calls::liquidate(loan_id), U256::ZERO),
            quote,
        })
    }

    /// withdraw(shares) on the pool
    pub fn build_withdraw(&self, shares: &str) -> Result<WithdrawTx> {
        let shares = parse_positive("shares", shares)?;
        Ok(WithdrawTx {
            withdraw: self.pool_call(calls::withdraw(shares), U256::ZERO),
        })
    }

    /// mint(to, amount) on the test token; only a minter can send it.
    pub fn build_mint(&self, to: &str, amount: &str) -> Result<MintTx> {
        let to = parse_address("to", to)?;
        let amount = parse_positive("amount", amount)?;
        Ok(MintTx {
            mint: tx_call(self.token_address, calls::mint(to, amount), U256::ZERO),
        })
    }

    /// Re-reads the loan and reports whether `approved_amount` still covers
    /// its repayment amount. Meant to be called right before signing a
    /// repay or liquidate bundle.
    #[instrument("CHECK_REPAYMENT", skip(self))]
    pub async fn check_repayment_current(
        &self,
        loan_id: u64,
        approved_amount: &str,
    ) -> Result<RepaymentCheck> {
        let approved_amount = parse_decimal("approvedAmount", approved_amount)?;
        let loan = self.read_loan(loan_id).await?;
        Ok(RepaymentCheck {
            loan_id,
            approved_amount,
            current_repayment_amount: loan.repayment_amount,
            is_active: loan.is_active,
            is_current: approved_amount >= loan.repayment_amount,
        })
    }

    // Never cached: the approved amount must match the chain at build time.
    async fn read_loan(&self, loan_id: u64) -> Result<Loan> {
        let loan = self.gateway.get_loan(loan_id).await.context("read loan")?;
        info!(
            "Loan {} repayment amount {} (active: {})",
            loan_id, loan.repayment_amount, loan.is_active
        );
        Ok(loan)
    }

    fn repayment_quote(&self, loan: &Loan) -> RepaymentQuote {
        let quoted_at = Utc::now().timestamp();
        RepaymentQuote {
            loan_id: loan.id,
            repayment_amount: loan.repayment_amount,
            quoted_at,
            valid_until: quoted_at
                .saturating_add(i64::try_from(self.quote_validity.as_secs()).unwrap_or(i64::MAX)),
        }
    }
}

fn tx_call(to: Address, data: Bytes, value: U256) -> TxCall {
    TxCall {
        to,
        data: to_hex_prefixed(&data),
        value,
    }
}
