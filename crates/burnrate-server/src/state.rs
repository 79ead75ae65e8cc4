//! Shared application state for the game server.
//!
//! [`AppState`] bundles the handle to the game world and the handle to the
//! broadcast hub. It is wrapped in [`Arc`](std::sync::Arc) and injected
//! into handlers through Axum's `State` extractor.

use burnrate_core::StateStore;

use crate::hub::HubHandle;

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The authoritative game world.
    pub store: StateStore,
    /// Handle to the broadcast hub for real-time observers.
    pub hub: HubHandle,
}

impl AppState {
    /// Bundle a store and a hub handle.
    pub const fn new(store: StateStore, hub: HubHandle) -> Self {
        Self { store, hub }
    }
}
