use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{error, info, info_span, warn, Instrument};

use crate::{blockchain_manager::ChainGateway, state_cache::StateCache};

/// Keeps the [`StateCache`] approximately fresh in the background.
pub struct StateRefresher;

impl StateRefresher {
    /// Spawns the refresh loop: one refresh right away, then one per `interval`
    /// until `stop` flips to `true` (or its sender is dropped).
    ///
    /// The stop signal is only looked at between refreshes, and wins over a
    /// tick that is due at the same time. Late ticks are delayed, never
    /// queued up.
    pub fn start(
        gateway: ChainGateway,
        cache: Arc<StateCache>,
        interval: Duration,
        mut stop: watch::Receiver<bool>,
    ) -> JoinHandle<Result<()>> {
        let task = async move {
            info!("Starting state refresher, interval {:?}", interval);
            if !gateway.has_price_oracle() {
                warn!("Price oracle not configured, native price will not be cached");
            }

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop_requested(&mut stop) => {
                        info!("State refresher stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        Self::refresh_once(&gateway, &cache).await;
                    }
                }
            }
            Ok(())
        };

        tokio::spawn(task.instrument(info_span!("STATE_REFRESHER")))
    }

    /// Fetches pool state and native price independently. A failed fetch is
    /// logged and leaves that field's last good value in the cache.
    pub async fn refresh_once(gateway: &ChainGateway, cache: &StateCache) {
        let refresh_pool_state = async {
            match gateway.get_pool_state().await {
                Ok(state) => cache.set_pool_state(state),
                Err(e) => error!("Error refreshing pool state: {:#}", e),
            }
        };

        let refresh_native_price = async {
            if !gateway.has_price_oracle() {
                return;
            }
            match gateway.get_native_price().await {
                Ok(price) if price.is_zero() => {
                    error!("Error refreshing native price: oracle returned zero")
                }
                Ok(price) => cache.set_native_price(price),
                Err(e) => error!("Error refreshing native price: {:#}", e),
            }
        };

        tokio::join!(refresh_pool_state, refresh_native_price);
    }
}

async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    while !*stop.borrow_and_update() {
        if stop.changed().await.is_err() {
            return;
        }
    }
}
