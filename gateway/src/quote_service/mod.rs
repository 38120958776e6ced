use std::sync::Arc;

use alloy::primitives::U256;
use anyhow::{Context, Result};
use tracing::instrument;

use crate::{
    blockchain_manager::ChainGateway,
    errors::{ConfigError, InputError},
    models::{BorrowQuote, PriceSource},
    state_cache::StateCache,
    utils::{decimal::parse_positive, math_helper},
};

/// Decimals of the borrowed stablecoin
pub const BORROW_TOKEN_DECIMALS: u8 = 6;
/// Decimals of USD values and of the oracle price
pub const USD_DECIMALS: u8 = 18;
/// Decimals of the native collateral asset
pub const NATIVE_DECIMALS: u8 = 18;

const PERCENT: u64 = 100;

/// Minimum native collateral (wei) for a borrow at `max_ltv_percent`.
///
/// `ceil(amount * 10^12 * 10^18 * 100 / (price * max_ltv_percent))`, in u256
/// integer arithmetic only. Rounding is always up so the quote never
/// under-collateralizes.
pub fn required_collateral(
    amount: U256,
    price: U256,
    max_ltv_percent: u64,
) -> Result<U256, InputError> {
    if amount.is_zero() {
        return Err(InputError::new("amount must be positive"));
    }
    if price.is_zero() {
        return Err(InputError::new("oracle returned non-positive price"));
    }
    if max_ltv_percent == 0 {
        return Err(InputError::new("max LTV must be positive"));
    }

    let too_large = || InputError::new("amount too large");
    let amount_usd = math_helper::scale_up(amount, BORROW_TOKEN_DECIMALS, USD_DECIMALS)
        .ok_or_else(too_large)?;
    let numerator = amount_usd
        .checked_mul(math_helper::pow10(NATIVE_DECIMALS))
        .and_then(|n| n.checked_mul(U256::from(PERCENT)))
        .ok_or_else(too_large)?;
    let denominator = price
        .checked_mul(U256::from(max_ltv_percent))
        .ok_or_else(|| InputError::new("price too large"))?;

    math_helper::ceil_div(numerator, denominator).ok_or_else(too_large)
}

/// Borrow quotes against the cached (or freshly read) native price.
pub struct QuoteService {
    gateway: ChainGateway,
    cache: Arc<StateCache>,
    max_ltv_percent: u64,
}

impl QuoteService {
    /// Fails when the gateway has no oracle: without it a cache miss could
    /// never be served.
    pub fn new(gateway: ChainGateway, cache: Arc<StateCache>, max_ltv_percent: u64) -> Result<Self> {
        if !gateway.has_price_oracle() {
            return Err(ConfigError::OracleNotConfigured.into());
        }
        if !(1..=PERCENT).contains(&max_ltv_percent) {
            return Err(ConfigError::Invalid {
                name: "MAX_LTV_PERCENT",
                reason: format!("{} is outside 1..=100", max_ltv_percent),
            }
            .into());
        }

        Ok(Self {
            gateway,
            cache,
            max_ltv_percent,
        })
    }

    /// `amount` is the borrow amount in the stablecoin's smallest unit.
    #[instrument("QUOTE_BORROW", skip(self))]
    pub async fn quote_borrow_collateral(&self, amount: &str) -> Result<BorrowQuote> {
        let amount = parse_positive("amount", amount)?;

        let (price, price_source) = match self.cache.get_native_price() {
            Some(price) => (price, PriceSource::Cache),
            None => (
                self.gateway
                    .get_native_price()
                    .await
                    .context("get native price")?,
                PriceSource::Chain,
            ),
        };

        let collateral_wei = required_collateral(amount, price, self.max_ltv_percent)?;

        Ok(BorrowQuote {
            borrow_amount: amount,
            collateral_wei,
            native_usd_price: price,
            max_ltv_percent: self.max_ltv_percent,
            price_source,
        })
    }
}
