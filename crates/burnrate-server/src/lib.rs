//! HTTP game API and real-time broadcast hub for Burn Rate.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **REST endpoints** (`/api/...`) for reading the world and driving the
//!   ship: accept/drop contracts, travel, refuel, buy modules
//! - **`WebSocket` endpoint** (`/ws`) connecting clients as observers of
//!   the broadcast hub
//! - **Heartbeat** task that runs the market simulation on a fixed
//!   interval and publishes `market_pulse` events
//!
//! # Architecture
//!
//! Handlers call into a shared [`StateStore`](burnrate_core::StateStore)
//! and serialize the owned copies it returns. Observers hang off a single
//! [`hub`] actor that owns the observer set and evicts slow consumers.

pub mod error;
pub mod handlers;
pub mod heartbeat;
pub mod hub;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use heartbeat::{DEFAULT_HEARTBEAT, pulse, spawn_heartbeat};
pub use hub::{HubError, HubHandle, Observer, ObserverId, spawn_hub};
pub use router::build_router;
pub use server::{DEFAULT_PORT, ServerConfig, ServerError, start_server};
pub use state::AppState;
