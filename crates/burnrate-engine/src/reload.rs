//! Hot reload of the world definition on `SIGHUP`.
//!
//! A reload re-reads the YAML file, swaps the world definition in the
//! store, and reseeds the job boards. A file that fails to read, parse,
//! or validate leaves the running world untouched.

use std::path::{Path, PathBuf};

use burnrate_core::StateStore;
use burnrate_server::HubHandle;
use burnrate_types::Envelope;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Reload the world from `path` and announce the reseeded boards.
///
/// Returns `true` if the new definition was applied.
pub async fn reload_world(store: &StateStore, hub: &HubHandle, path: &Path) -> bool {
    match store.reload_from(path).await {
        Ok(updated) => {
            info!(
                path = %path.display(),
                updated_locations = updated.len(),
                "World definition reloaded"
            );
            if updated.is_empty() {
                return true;
            }
            if let Err(e) = hub.publish(&Envelope::market_pulse(&updated)).await {
                warn!(error = %e, "Failed to publish reload pulse");
            }
            true
        }
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "Reload failed, keeping the previous world"
            );
            false
        }
    }
}

/// Install a `SIGHUP` handler that calls [`reload_world`] on every signal.
///
/// # Errors
///
/// Returns an I/O error if the signal handler cannot be registered.
#[cfg(unix)]
pub fn spawn_reload_listener(
    store: StateStore,
    hub: HubHandle,
    path: PathBuf,
) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    Ok(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("SIGHUP received");
            reload_world(&store, &hub, &path).await;
        }
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use burnrate_core::WorldConfig;
    use burnrate_server::{Observer, spawn_hub};

    use super::*;

    const WORLD: &str = r"
game_balance:
  upgrade_hub: prime
player_ship:
  max_fuel: 1000
  base_burn_rate: 100
  burn_damping: 1000
  base_mass: 1000
  cargo_capacity: 30
  passenger_slots: 2
commodities:
  - key: item_water
    name: Water
    base_value: 10
    mass: 2
planets:
  - key: prime
    name: Prime
    coordinates: [0, 0]
  - key: outpost
    name: Outpost
    coordinates: [6, 8]
";

    fn temp_world(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "burnrate-engine-{name}-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn reload_publishes_reseeded_boards() {
        let path = temp_world("ok", WORLD);
        let store = StateStore::with_seed(WorldConfig::parse(WORLD).unwrap(), 5);
        let (hub, _task) = spawn_hub();
        let (observer, mut rx) = Observer::channel();
        hub.register(observer).await.unwrap();

        assert!(reload_world(&store, &hub, &path).await);
        let pulse = rx.recv().await.unwrap();
        assert!(pulse.contains("market_pulse"));
        assert!(pulse.contains("outpost"));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn broken_file_keeps_running_world() {
        let path = temp_world("broken", "planets: [unterminated");
        let store = StateStore::with_seed(WorldConfig::parse(WORLD).unwrap(), 5);
        store.replenish().await;
        let before = store.current_board().await;
        let (hub, _task) = spawn_hub();

        assert!(!reload_world(&store, &hub, &path).await);
        assert_eq!(store.current_board().await, before);

        std::fs::remove_file(&path).unwrap();
    }
}
