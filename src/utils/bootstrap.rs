//! Bootstrap utilities for the sui-sync binary.
//!
//! Tracing setup, config path parsing and wiring the coordinator to a
//! fullnode.

use std::sync::Arc;

use sui_sync_client::JsonRpcClient;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LOG_ENV_VAR};
use crate::coordinator::DispatchCoordinator;

/// Initialize tracing with the SUI_SYNC_LOG environment variable.
///
/// Defaults to "info" level if SUI_SYNC_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Config file path from `--config <path>` / `-c <path>`, if given.
pub fn parse_config_path() -> Option<String> {
    config_path_from(std::env::args().skip(1))
}

fn config_path_from(mut args: impl Iterator<Item = String>) -> Option<String> {
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    None
}

/// Resolve the endpoint and build a read-only coordinator.
///
/// No signer is connected; one can be attached later with
/// [`DispatchCoordinator::connect_signer`].
pub fn build_coordinator(
    config: &Config,
) -> Result<DispatchCoordinator, Box<dyn std::error::Error>> {
    let endpoint = config.network.resolve()?;
    let client = Arc::new(JsonRpcClient::with_timeout(
        endpoint.clone(),
        config.rpc.timeout(),
    )?);

    info!(network = %config.network.active, endpoint = %endpoint, "Using fullnode");

    let mut coordinator = DispatchCoordinator::new(client.clone(), config.counter.clone())
        .with_metadata(client)
        .with_endpoint(endpoint);
    if let Some(mint) = &config.mint {
        coordinator = coordinator.with_mint(mint.clone())?;
    }
    Ok(coordinator)
}
