pub mod rpc_client;

#[cfg(test)]
pub(crate) mod mock_transport;

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use anyhow::{Context, Result};
use contract_codec::{calls, returns};
use futures::future::try_join_all;
use tracing::instrument;

use crate::{
    config::LocalConfig,
    errors::ConfigError,
    models::{LenderPosition, Loan, LoanHealth, PoolState, UserPosition},
};
use rpc_client::{CallTransport, JsonRpcClient};

/// Read-only access to the lending pool and price oracle contracts.
///
/// Holds no mutable state beyond the configured addresses and the transport
/// handle, so clones can be shared freely across tasks. Every read is a
/// single attempt; retrying is left to the caller.
#[derive(Clone)]
pub struct ChainGateway {
    transport: Arc<dyn CallTransport>,
    pool_address: Address,
    price_oracle: Option<Address>,
}

impl ChainGateway {
    pub fn new(
        transport: Arc<dyn CallTransport>,
        pool_address: Address,
        price_oracle: Option<Address>,
    ) -> Self {
        Self {
            transport,
            pool_address,
            price_oracle,
        }
    }

    /// Creates a gateway talking JSON-RPC to the configured endpoint.
    ///
    /// # Arguments
    /// * `local_config` - Local configuration containing the RPC URL and contract addresses
    pub fn from_config(local_config: &LocalConfig) -> Result<Self> {
        let client = JsonRpcClient::new(&local_config.rpc_url, local_config.rpc_timeout)?;
        Ok(Self::new(
            Arc::new(client),
            local_config.pool_address,
            local_config.price_oracle,
        ))
    }

    pub fn pool_address(&self) -> Address {
        self.pool_address
    }

    pub fn has_price_oracle(&self) -> bool {
        self.price_oracle.is_some()
    }

    async fn call_pool(&self, data: Bytes) -> Result<Bytes> {
        self.transport.eth_call(self.pool_address, data).await
    }

    #[instrument("GET_POOL_STATE", skip_all)]
    pub async fn get_pool_state(&self) -> Result<PoolState> {
        let output = self
            .call_pool(calls::get_pool_state())
            .await
            .context("call getPoolState")?;
        let raw = returns::decode_pool_state(&output).context("decode getPoolState")?;
        Ok(raw.into())
    }

    #[instrument("GET_USER_POSITION", skip(self))]
    pub async fn get_user_position(&self, user: Address) -> Result<UserPosition> {
        let output = self
            .call_pool(calls::get_user_position(user))
            .await
            .context("call getUserPosition")?;
        let raw = returns::decode_user_position(&output).context("decode getUserPosition")?;
        Ok(UserPosition::from_return(user, raw))
    }

    /// Loan ids from `getUserLoans`, then one `loans(id)` read per id.
    #[instrument("LIST_USER_LOANS", skip(self))]
    pub async fn list_user_loans(&self, user: Address) -> Result<Vec<Loan>> {
        let output = self
            .call_pool(calls::get_user_loans(user))
            .await
            .context("call getUserLoans")?;
        let ids = returns::decode_user_loans(&output).context("decode getUserLoans")?;

        try_join_all(ids.into_iter().map(|id| async move {
            self.get_loan(id)
                .await
                .with_context(|| format!("get loan {}", id))
        }))
        .await
    }

    pub async fn get_loan(&self, id: u64) -> Result<Loan> {
        let output = self
            .call_pool(calls::loans(id))
            .await
            .with_context(|| format!("call loans({})", id))?;
        let raw = returns::decode_loan(&output).with_context(|| format!("decode loans({})", id))?;
        Ok(Loan::from_return(id, raw))
    }

    pub async fn get_loan_health(&self, id: u64) -> Result<LoanHealth> {
        let output = self
            .call_pool(calls::get_loan_health(id))
            .await
            .with_context(|| format!("call getLoanHealth({})", id))?;
        let raw = returns::decode_loan_health(&output)
            .with_context(|| format!("decode getLoanHealth({})", id))?;
        Ok(raw.into())
    }

    #[instrument("GET_LENDER_POSITION", skip(self))]
    pub async fn get_lender_position(&self, lender: Address) -> Result<LenderPosition> {
        let output = self
            .call_pool(calls::get_lender_position(lender))
            .await
            .context("call getLenderPosition")?;
        let raw = returns::decode_lender_position(&output).context("decode getLenderPosition")?;
        Ok(LenderPosition::from_return(lender, raw))
    }

    /// Native asset USD price (18 decimals) from `getPrice(address(0))`.
    pub async fn get_native_price(&self) -> Result<U256> {
        let oracle = self.price_oracle.ok_or(ConfigError::OracleNotConfigured)?;
        let output = self
            .transport
            .eth_call(oracle, calls::get_price(Address::ZERO))
            .await
            .context("call getPrice(address(0))")?;
        let price = returns::decode_price(&output).context("decode getPrice")?;
        Ok(price)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;
    use contract_codec::CodecError;
    use super::mock_transport::MockTransport;
    use super::test_support::*;

    #[tokio::test]
    async fn test_get_pool_state() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(POOL, calls::get_pool_state(), pool_state_output(1_000));
        let gateway = gateway(&transport, None);

        let state = gateway.get_pool_state().await.unwrap();
        assert_eq!(state.total_assets, U256::from(1_000u64));
        assert_eq!(state.total_f_token_supply, U256::from(950u64));
    }

    #[tokio::test]
    async fn test_truncated_output_is_decode_error() {
        let transport = Arc::new(MockTransport::new());
        let mut output = pool_state_output(1_000);
        output.truncate(100);
        transport.respond(POOL, calls::get_pool_state(), output);

        let err = gateway(&transport, None).get_pool_state().await.unwrap_err();
        assert!(err.chain().any(|cause| cause.is::<CodecError>()));
    }

    #[tokio::test]
    async fn test_list_user_loans_fetches_each_loan() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            POOL,
            calls::get_user_loans(BORROWER),
            words(&[U256::from(32u64), U256::from(2u64), U256::from(4u64), U256::from(9u64)]),
        );
        transport.respond(POOL, calls::loans(4), loan_output(111, true));
        transport.respond(POOL, calls::loans(9), loan_output(222, false));

        let loans = gateway(&transport, None).list_user_loans(BORROWER).await.unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!((loans[0].id, loans[0].repayment_amount), (4, U256::from(111u64)));
        assert_eq!((loans[1].id, loans[1].is_active), (9, false));
        assert_eq!(loans[1].borrower, BORROWER);
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_list_user_loans_propagates_loan_failure() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            POOL,
            calls::get_user_loans(BORROWER),
            words(&[U256::from(32u64), U256::from(1u64), U256::from(4u64)]),
        );
        transport.fail(POOL, calls::loans(4), "connection reset");

        let err = gateway(&transport, None)
            .list_user_loans(BORROWER)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("get loan 4"));
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.fail(POOL, calls::get_loan_health(7), "timeout");

        assert!(gateway(&transport, None).get_loan_health(7).await.is_err());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_user_and_lender_positions() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            POOL,
            calls::get_user_position(BORROWER),
            words(&[
                U256::from(128u64),
                U256::from(10u64),
                U256::from(11u64),
                U256::from(12u64),
                U256::from(1u64),
                U256::from(5u64),
            ]),
        );
        transport.respond(
            POOL,
            calls::get_lender_position(BORROWER),
            words(&[U256::from(1u64), U256::from(2u64), U256::from(3u64)]),
        );
        let gateway = gateway(&transport, None);

        let position = gateway.get_user_position(BORROWER).await.unwrap();
        assert_eq!(position.loan_ids, vec![5]);
        assert_eq!(position.total_collateral, U256::from(12u64));

        let lender = gateway.get_lender_position(BORROWER).await.unwrap();
        assert_eq!(lender.underlying_balance, U256::from(3u64));
        assert_eq!(lender.net_deposited, None);
    }

    #[tokio::test]
    async fn test_native_price_requires_oracle() {
        let transport = Arc::new(MockTransport::new());
        let err = gateway(&transport, None).get_native_price().await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::OracleNotConfigured)
        );
        assert!(transport.calls().is_empty());

        let price = U256::from(2_000u64) * U256::from(10u64).pow(U256::from(18u64));
        transport.respond(ORACLE, calls::get_price(Address::ZERO), words(&[price]));
        let fetched = gateway(&transport, Some(ORACLE)).get_native_price().await.unwrap();
        assert_eq!(fetched, price);
    }
}
