//! Concurrent access to the game world.
//!
//! [`StateStore`] is a cheap-to-clone handle around a single
//! [`GameWorld`] guarded by one `tokio` reader/writer lock. Every method
//! takes the lock exactly once: reads under a shared acquisition,
//! mutations under an exclusive acquisition covering the whole
//! validate-then-mutate sequence.
//!
//! Methods return owned copies of the data they read. Callers serialize
//! those copies after the lock has been released, so a slow client never
//! holds up other state operations.

use std::path::Path;
use std::sync::Arc;

use burnrate_types::{Contract, Location, Ship, ShipModule, TravelQuote};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::RwLock;

use crate::config::{ConfigError, WorldConfig};
use crate::error::GameError;
use crate::world::GameWorld;

/// Shared handle to the authoritative game world.
#[derive(Debug, Clone)]
pub struct StateStore {
    world: Arc<RwLock<GameWorld>>,
}

impl StateStore {
    /// Create a store over a freshly seeded world, drawing randomness from
    /// the operating system.
    pub fn new(config: WorldConfig) -> Self {
        Self::from_world(GameWorld::new(config, StdRng::from_os_rng()))
    }

    /// Create a store with deterministic contract generation.
    pub fn with_seed(config: WorldConfig, seed: u64) -> Self {
        Self::from_world(GameWorld::new(config, StdRng::seed_from_u64(seed)))
    }

    fn from_world(world: GameWorld) -> Self {
        Self {
            world: Arc::new(RwLock::new(world)),
        }
    }

    /// Run a read-only closure against the world under a shared lock.
    pub async fn inspect<R>(&self, f: impl FnOnce(&GameWorld) -> R) -> R {
        let world = self.world.read().await;
        f(&world)
    }

    /// Snapshot of the ship.
    pub async fn ship(&self) -> Ship {
        self.world.read().await.ship().clone()
    }

    /// Every location in the world definition.
    pub async fn locations(&self) -> Vec<Location> {
        self.world.read().await.locations().to_vec()
    }

    /// Contracts on offer where the ship is docked.
    pub async fn current_board(&self) -> Vec<Contract> {
        self.world.read().await.current_board().to_vec()
    }

    /// Modules for sale where the ship is docked.
    pub async fn available_modules(&self) -> Vec<ShipModule> {
        self.world.read().await.available_modules().to_vec()
    }

    /// Accept a contract from the local board. Returns the updated ship.
    ///
    /// # Errors
    ///
    /// See [`GameWorld::accept_contract`].
    pub async fn accept_contract(&self, id: &str) -> Result<Ship, GameError> {
        let mut world = self.world.write().await;
        world.accept_contract(id)?;
        Ok(world.ship().clone())
    }

    /// Drop a contract held by the ship. Returns the updated ship.
    ///
    /// # Errors
    ///
    /// See [`GameWorld::drop_contract`].
    pub async fn drop_contract(&self, id: &str) -> Result<Ship, GameError> {
        let mut world = self.world.write().await;
        world.drop_contract(id)?;
        Ok(world.ship().clone())
    }

    /// Quote a trip without moving the ship.
    ///
    /// # Errors
    ///
    /// See [`GameWorld::travel_quote`].
    pub async fn travel_quote(&self, destination: &str) -> Result<TravelQuote, GameError> {
        self.world.read().await.travel_quote(destination)
    }

    /// Travel and deliver. Returns the updated ship.
    ///
    /// # Errors
    ///
    /// See [`GameWorld::travel`].
    pub async fn travel(&self, destination: &str) -> Result<Ship, GameError> {
        let mut world = self.world.write().await;
        world.travel(destination)?;
        Ok(world.ship().clone())
    }

    /// Fill the tank. Returns the updated ship.
    ///
    /// # Errors
    ///
    /// See [`GameWorld::refuel`].
    pub async fn refuel(&self) -> Result<Ship, GameError> {
        let mut world = self.world.write().await;
        world.refuel()?;
        Ok(world.ship().clone())
    }

    /// Buy and install a module. Returns the updated ship.
    ///
    /// # Errors
    ///
    /// See [`GameWorld::buy_module`].
    pub async fn buy_module(&self, key: &str) -> Result<Ship, GameError> {
        let mut world = self.world.write().await;
        world.buy_module(key)?;
        Ok(world.ship().clone())
    }

    /// Cool the market one step.
    pub async fn tick(&self) {
        self.world.write().await.tick_market();
    }

    /// One market simulation cycle: cool the market, then restock boards.
    ///
    /// The two phases run in separate critical sections, and other
    /// operations may interleave between them. The board pass reads
    /// current counts, so it never acts on stale data.
    ///
    /// Returns the keys of locations that gained contracts.
    pub async fn replenish(&self) -> Vec<String> {
        self.tick().await;
        self.world.write().await.replenish_boards()
    }

    /// Swap in a new world definition and restock the cleared boards.
    pub async fn reload(&self, config: WorldConfig) -> Vec<String> {
        let mut world = self.world.write().await;
        world.reload(config);
        world.replenish_boards()
    }

    /// Re-read the world definition from disk and swap it in.
    ///
    /// The file is read without blocking the runtime and validated before
    /// the lock is taken. On error the current world is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from loading the file.
    pub async fn reload_from(&self, path: &Path) -> Result<Vec<String>, ConfigError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let config = WorldConfig::parse(&contents)?;
        Ok(self.reload(config).await)
    }
}
