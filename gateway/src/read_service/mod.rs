use std::sync::Arc;

use anyhow::Result;

use crate::{
    blockchain_manager::ChainGateway,
    models::{LenderPosition, Loan, LoanHealth, PoolState, UserPosition},
    state_cache::StateCache,
    utils::address::parse_address,
};

/// Pool, user and loan reads for the API.
///
/// Pool state is served from the cache and read from chain only on a miss;
/// the miss does not populate the cache, which only the refresher writes.
/// Everything else goes straight to the gateway.
pub struct ReadService {
    gateway: ChainGateway,
    cache: Arc<StateCache>,
}

impl ReadService {
    pub fn new(gateway: ChainGateway, cache: Arc<StateCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn get_pool_state(&self) -> Result<PoolState> {
        if let Some(state) = self.cache.get_pool_state() {
            return Ok(state);
        }
        self.gateway.get_pool_state().await
    }

    pub async fn get_user_position(&self, address: &str) -> Result<UserPosition> {
        let address = parse_address("address", address)?;
        self.gateway.get_user_position(address).await
    }

    pub async fn get_lender_position(&self, address: &str) -> Result<LenderPosition> {
        let address = parse_address("address", address)?;
        self.gateway.get_lender_position(address).await
    }

    pub async fn list_user_loans(&self, address: &str) -> Result<Vec<Loan>> {
        let address = parse_address("address", address)?;
        self.gateway.list_user_loans(address).await
    }

    pub async fn get_loan(&self, loan_id: u64) -> Result<Loan> {
        self.gateway.get_loan(loan_id).await
    }

    pub async fn get_loan_health(&self, loan_id: u64) -> Result<LoanHealth> {
        self.gateway.get_loan_health(loan_id).await
    }
}
