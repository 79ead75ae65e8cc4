//! Game server binary for Burn Rate.
//!
//! Loads the world definition, seeds the job boards, and serves the game
//! API and broadcast socket until the process is stopped.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Read process settings from the environment
//! 3. Load and validate the world definition
//! 4. Create the state store and seed every job board
//! 5. Start the broadcast hub
//! 6. Start the market heartbeat
//! 7. Install the `SIGHUP` reload handler
//! 8. Serve HTTP and `WebSocket` traffic

mod config;
mod error;
mod reload;

use std::sync::Arc;

use burnrate_core::{StateStore, WorldConfig};
use burnrate_server::{AppState, spawn_heartbeat, spawn_hub, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Application entry point for the game server.
///
/// # Errors
///
/// Returns an error if the settings or world definition are invalid, or
/// if the server cannot bind its listen address.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("burnrate-engine starting");

    // 2. Read settings.
    let settings = EngineConfig::from_env()?;
    info!(
        world_path = %settings.world_path.display(),
        host = %settings.server.host,
        port = settings.server.port,
        heartbeat_secs = settings.heartbeat.as_secs(),
        "Settings loaded"
    );

    // 3. Load the world. A broken definition at startup is fatal.
    let world = WorldConfig::from_file(&settings.world_path).map_err(EngineError::from)?;
    info!(
        locations = world.locations.len(),
        commodities = world.commodities.len(),
        modules = world.ship_modules.len(),
        upgrade_hub = %world.balance.upgrade_hub,
        "World definition loaded"
    );

    // 4. Create the store and seed the boards.
    let store = StateStore::new(world);
    let seeded = store.replenish().await;
    info!(stocked_locations = seeded.len(), "Job boards seeded");

    // 5. Start the hub.
    let (hub, _hub_task) = spawn_hub();

    // 6. Start the heartbeat.
    let _heartbeat = spawn_heartbeat(store.clone(), hub.clone(), settings.heartbeat);
    info!("Market heartbeat started");

    // 7. Reload on SIGHUP.
    #[cfg(unix)]
    {
        let _reloader = reload::spawn_reload_listener(
            store.clone(),
            hub.clone(),
            settings.world_path.clone(),
        )
        .map_err(EngineError::from)?;
        info!("Reload handler installed (send SIGHUP to re-read the world)");
    }

    // 8. Serve until shutdown.
    let state = Arc::new(AppState::new(store, hub));
    start_server(&settings.server, state)
        .await
        .map_err(EngineError::from)?;

    info!("burnrate-engine stopped");
    Ok(())
}
