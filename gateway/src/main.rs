use std::sync::Arc;

use anyhow::{Context, Result};
use lending_gateway::{
    api::{self, AppState},
    blockchain_manager::ChainGateway,
    config::LocalConfig,
    quote_service::QuoteService,
    read_service::ReadService,
    state_cache::StateCache,
    state_refresher::StateRefresher,
    tx_builder::TxBuilder,
    utils,
};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Main entry point for the Lending Gateway
///
/// This function performs the following steps:
/// 1. Initializes the pre-run environment
/// 2. Builds the chain gateway and the services on top of it
/// 3. Starts the state refresher
/// 4. Serves the API until Ctrl-C, then stops the refresher
#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    init_pre_run()?;

    info!("Starting the Lending Gateway");

    let local_config = LocalConfig::load_from_env().context("Failed to load config")?;
    let gateway = ChainGateway::from_config(&local_config)?;
    let cache = Arc::new(StateCache::new());

    let quote_service = match QuoteService::new(
        gateway.clone(),
        cache.clone(),
        local_config.max_ltv_percent,
    ) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            warn!("Borrow quotes disabled: {:#}", e);
            None
        }
    };

    let state = AppState {
        cache: cache.clone(),
        read_service: Arc::new(ReadService::new(gateway.clone(), cache.clone())),
        quote_service,
        tx_builder: Arc::new(TxBuilder::new(
            gateway.clone(),
            local_config.token_address,
            local_config.quote_validity,
        )),
    };

    let (stop_sender, stop_receiver) = watch::channel(false);
    let refresher = StateRefresher::start(
        gateway,
        cache,
        local_config.refresh_interval,
        stop_receiver,
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    let server_result = api::serve(state, local_config.port, shutdown).await;

    // Stop the refresher whether the server exited cleanly or not
    let _ = stop_sender.send(true);
    match refresher.await {
        Ok(Ok(())) => info!("State refresher finished"),
        Ok(Err(e)) => error!("State refresher failed with error: {:#}", e),
        Err(e) => error!("State refresher task panicked: {}", e),
    }

    if let Err(e) = &server_result {
        let error_message = e
            .chain()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        error!("API server failed with error: {}", error_message);
    }
    server_result
}

/// Loads environment variables from the `.env` file, if there is one, and
/// sets up the logger
fn init_pre_run() -> Result<()> {
    let env_loaded = dotenvy::dotenv().is_ok();
    utils::logger::setup_logger().context("Failed to setup logger")?;
    if !env_loaded {
        info!("No .env file found, using process environment");
    }
    Ok(())
}
