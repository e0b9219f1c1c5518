//! sui-sync: read-only view of a shared counter
//!
//! Loads the configured counter (and coin supply, when minting is
//! configured) from a Sui fullnode and prints it. No signer is attached,
//! so nothing is ever submitted.
//!
//! ## Configuration
//! - `--config <path>` or SUI_SYNC_CONFIG: YAML config file
//! - SUI_SYNC__NETWORK__ACTIVE: devnet, testnet, mainnet or localnet
//! - SUI_SYNC__WATCH__ENABLED: keep polling the counter
//! - SUI_SYNC_LOG: tracing filter (default "info")

use tracing::{error, info};

use sui_sync::config::Config;
use sui_sync::coordinator::{DispatchCoordinator, LocalViewState};
use sui_sync::utils::bootstrap::{build_coordinator, init_tracing, parse_config_path};
use sui_sync::utils::retry::load_with_retry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Starting sui-sync");

    let coordinator = build_coordinator(&config)?;
    // Display only, so fetched once and never retried.
    coordinator.load_protocol_version().await;
    load_with_retry(&config.retry, || coordinator.load_tracked()).await?;
    print_view(&coordinator, &coordinator.snapshot());

    if !config.watch.enabled {
        return Ok(());
    }

    let mut interval = tokio::time::interval(config.watch.interval());
    // First tick fires immediately; the initial load already covered it.
    interval.tick().await;
    let mut last = coordinator.display_value();

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        }

        let counter_id = coordinator.counter().object_id.clone();
        // Read failures are logged and keep the previous value.
        if let Ok(value) = coordinator.refresh(&counter_id).await {
            if value != last {
                info!(object_id = %counter_id, previous = ?last, current = ?value, "Counter changed");
                last = value;
                print_view(&coordinator, &coordinator.snapshot());
            }
        }
    }
}

fn print_view(coordinator: &DispatchCoordinator, view: &LocalViewState) {
    let endpoint = view.endpoint.as_deref().unwrap_or("-");
    let protocol = view.protocol_version.as_deref().unwrap_or("unknown");
    println!("endpoint:         {}", endpoint);
    println!("protocol version: {}", protocol);
    match coordinator.display_value() {
        Some(value) => println!("counter:          {}", value),
        None => println!("counter:          -"),
    }
    if let Some(supply) = coordinator.supply_value() {
        println!("coin supply:      {}", supply);
    }
}
