//! Axum router construction for the game API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled for the browser client.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the game server.
///
/// The router includes:
/// - `GET /ws` -- `WebSocket` observer channel
/// - `GET /api/planets`, `/api/ship`, `/api/contracts`, `/api/modules`
/// - `POST /api/contracts/accept`, `/api/contracts/drop`
/// - `POST /api/travel`, `/api/travel/quote`
/// - `POST /api/refuel`, `/api/modules/buy`
///
/// CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_observer))
        // Reads
        .route("/api/planets", get(handlers::get_planets))
        .route("/api/ship", get(handlers::get_ship))
        .route("/api/contracts", get(handlers::get_contracts))
        .route("/api/modules", get(handlers::get_modules))
        // Mutations
        .route("/api/contracts/accept", post(handlers::accept_contract))
        .route("/api/contracts/drop", post(handlers::drop_contract))
        .route("/api/travel", post(handlers::travel))
        .route("/api/travel/quote", post(handlers::travel_quote))
        .route("/api/refuel", post(handlers::refuel))
        .route("/api/modules/buy", post(handlers::buy_module))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
