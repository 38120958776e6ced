use std::time::Duration;

use alloy::primitives::Address;
use anyhow::Result;

use super::env_helper::{load_env_var, load_env_var_or, load_optional_env_var};
use crate::{errors::ConfigError, utils::address::parse_address};

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 180;
pub const DEFAULT_MAX_LTV_PERCENT: u64 = 75;
pub const DEFAULT_QUOTE_VALIDITY_SECS: u64 = 60;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct LocalConfig {
    pub rpc_url: String,
    pub pool_address: Address,
    pub token_address: Address,
    pub price_oracle: Option<Address>,
    pub refresh_interval: Duration,
    pub max_ltv_percent: u64,
    pub quote_validity: Duration,
    pub rpc_timeout: Duration,
    pub port: u16,
}

impl LocalConfig {
    pub fn load_from_env() -> Result<Self> {
        let price_oracle = load_optional_env_var::<String>("PRICE_ORACLE")?
            .map(|raw| address_var("PRICE_ORACLE", &raw))
            .transpose()?;

        let config = Self {
            rpc_url: load_env_var("RPC_URL")?,
            pool_address: address_var("POOL_ADDRESS", &load_env_var::<String>("POOL_ADDRESS")?)?,
            token_address: address_var("TOKEN_ADDRESS", &load_env_var::<String>("TOKEN_ADDRESS")?)?,
            price_oracle,
            refresh_interval: Duration::from_secs(load_env_var_or(
                "REFRESH_INTERVAL_SECS",
                DEFAULT_REFRESH_INTERVAL_SECS,
            )?),
            max_ltv_percent: load_env_var_or("MAX_LTV_PERCENT", DEFAULT_MAX_LTV_PERCENT)?,
            quote_validity: Duration::from_secs(load_env_var_or(
                "QUOTE_VALIDITY_SECS",
                DEFAULT_QUOTE_VALIDITY_SECS,
            )?),
            rpc_timeout: Duration::from_secs(load_env_var_or(
                "RPC_TIMEOUT_SECS",
                DEFAULT_RPC_TIMEOUT_SECS,
            )?),
            port: load_env_var_or("PORT", DEFAULT_PORT)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::Invalid {
                name: "REFRESH_INTERVAL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(1..=100).contains(&self.max_ltv_percent) {
            return Err(ConfigError::Invalid {
                name: "MAX_LTV_PERCENT",
                reason: format!("{} is outside 1..=100", self.max_ltv_percent),
            });
        }
        Ok(())
    }
}

fn address_var(name: &'static str, raw: &str) -> Result<Address, ConfigError> {
    parse_address(name, raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
