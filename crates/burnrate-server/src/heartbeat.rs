//! Periodic market simulation driver.
//!
//! Every heartbeat runs one market cycle on the [`StateStore`] (heat decay,
//! then board replenishment) and, if any board gained contracts, publishes
//! a `market_pulse` envelope through the hub.
//!
//! Pulses are not ordered against state reads: an observer may see a pulse
//! slightly before or after a concurrent request sees the new boards.

use std::time::Duration;

use burnrate_core::StateStore;
use burnrate_types::Envelope;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::hub::{HubError, HubHandle};

/// Default interval between market cycles.
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(60);

/// Run one market cycle and publish a pulse if anything changed.
///
/// Returns the keys of locations that gained contracts.
///
/// # Errors
///
/// Returns a [`HubError`] if the pulse could not be published. The market
/// cycle itself has already been applied.
pub async fn pulse(store: &StateStore, hub: &HubHandle) -> Result<Vec<String>, HubError> {
    let updated = store.replenish().await;
    if updated.is_empty() {
        debug!("Market cycle complete, no boards changed");
        return Ok(updated);
    }

    info!(updated_locations = updated.len(), "Market pulse");
    hub.publish(&Envelope::market_pulse(&updated)).await?;
    Ok(updated)
}

/// Run [`pulse`] every `period` until the hub shuts down.
///
/// The first cycle runs one full period after start; initial seeding is
/// the caller's job.
pub async fn run_heartbeat(store: StateStore, hub: HubHandle, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        match pulse(&store, &hub).await {
            Ok(_) => {}
            Err(HubError::Closed) => {
                info!("Hub closed, stopping heartbeat");
                return;
            }
            Err(e) => warn!(error = %e, "Failed to publish market pulse"),
        }
    }
}

/// Spawn [`run_heartbeat`] on a background task.
pub fn spawn_heartbeat(store: StateStore, hub: HubHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(run_heartbeat(store, hub, period))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use burnrate_core::WorldConfig;

    use super::*;
    use crate::hub::{Observer, spawn_hub};

    const WORLD: &str = r"
game_balance:
  starting_credits: 1000
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

    #[tokio::test]
    async fn first_pulse_announces_every_location() {
        let store = StateStore::with_seed(WorldConfig::parse(WORLD).unwrap(), 3);
        let (hub, _task) = spawn_hub();
        let (observer, mut rx) = Observer::channel();
        hub.register(observer).await.unwrap();

        let updated = pulse(&store, &hub).await.unwrap();
        assert_eq!(updated, vec!["prime".to_owned(), "outpost".to_owned()]);

        let json: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(json["type"], "market_pulse");
        assert_eq!(json["payload"]["updated_planets"][1], "outpost");
    }

    #[tokio::test]
    async fn quiet_pulse_publishes_nothing() {
        let store = StateStore::with_seed(WorldConfig::parse(WORLD).unwrap(), 3);
        let (hub, _task) = spawn_hub();
        let (observer, mut rx) = Observer::channel();
        hub.register(observer).await.unwrap();
        pulse(&store, &hub).await.unwrap();
        assert!(rx.recv().await.unwrap().contains("market_pulse"));

        let updated = pulse(&store, &hub).await.unwrap();
        assert!(updated.is_empty());

        hub.broadcast("marker".to_owned()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "marker");
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_publishes_after_one_period() {
        let store = StateStore::with_seed(WorldConfig::parse(WORLD).unwrap(), 3);
        let (hub, _task) = spawn_hub();
        let (observer, mut rx) = Observer::channel();
        hub.register(observer).await.unwrap();

        let beat = spawn_heartbeat(store, hub, Duration::from_secs(60));
        let first = rx.recv().await.unwrap();
        assert!(first.contains("market_pulse"));
        beat.abort();
    }
}
