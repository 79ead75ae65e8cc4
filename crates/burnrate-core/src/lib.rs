//! Game-state engine for Burn Rate.
//!
//! This crate owns the single authoritative world: the ship, the job boards
//! at every location, and the supply/demand market that reacts to trade.
//!
//! # Modules
//!
//! - [`config`] -- World definition loading from `universe.yaml` into
//!   strongly-typed structs, with validation.
//! - [`physics`] -- Distance, ship mass, and fuel burn rate.
//! - [`market`] -- Source and destination heat maps with decay.
//! - [`generator`] -- Procedural cargo and passenger contracts.
//! - [`world`] -- [`GameWorld`], every transactional game operation and the
//!   board replenishment pass.
//! - [`store`] -- [`StateStore`], the shared handle serializing access to
//!   the world behind one reader/writer lock.
//! - [`error`] -- [`GameError`] and its classification.

pub mod config;
pub mod error;
pub mod generator;
pub mod market;
pub mod physics;
pub mod store;
pub mod world;

pub use config::{ConfigError, WorldConfig};
pub use error::{ErrorKind, GameError};
pub use store::StateStore;
pub use world::GameWorld;
