//! REST API endpoint handlers for the game server.
//!
//! Handlers validate the request body, call exactly one [`StateStore`]
//! operation, and serialize the owned result it returns. The world lock is
//! never held while a response is being encoded.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/planets` | All locations |
//! | `GET` | `/api/ship` | The player's ship |
//! | `GET` | `/api/contracts` | Job board at the ship's location |
//! | `GET` | `/api/modules` | Modules for sale (upgrade hub only) |
//! | `POST` | `/api/contracts/accept` | Accept a contract from the board |
//! | `POST` | `/api/contracts/drop` | Discard a carried contract |
//! | `POST` | `/api/travel` | Fly to a location and deliver |
//! | `POST` | `/api/travel/quote` | Pre-flight fuel estimate |
//! | `POST` | `/api/refuel` | Fill the tank |
//! | `POST` | `/api/modules/buy` | Buy and install a module |
//!
//! [`StateStore`]: burnrate_core::StateStore

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use burnrate_types::{Contract, Location, Ship, ShipModule, TravelQuote};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Request body for accepting or dropping a contract.
#[derive(Debug, Deserialize)]
pub struct ContractRequest {
    /// Id of the contract.
    pub contract_id: String,
}

/// Request body for travel and travel quotes.
#[derive(Debug, Deserialize)]
pub struct TravelRequest {
    /// Key of the destination location.
    pub destination_key: String,
}

/// Request body for buying a module.
#[derive(Debug, Deserialize)]
pub struct BuyModuleRequest {
    /// Key of the module to buy.
    pub module_key: String,
}

/// Unwrap a JSON body and reject an empty identifier field.
fn required<T>(
    body: Result<Json<T>, JsonRejection>,
    field: &str,
    value: impl FnOnce(&T) -> &str,
) -> Result<T, ApiError> {
    let Json(request) = body?;
    if value(&request).trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(request)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// List every location in the world.
pub async fn get_planets(State(state): State<Arc<AppState>>) -> Json<Vec<Location>> {
    Json(state.store.locations().await)
}

/// Return the player's ship.
pub async fn get_ship(State(state): State<Arc<AppState>>) -> Json<Ship> {
    Json(state.store.ship().await)
}

/// List the contracts on offer where the ship is docked.
pub async fn get_contracts(State(state): State<Arc<AppState>>) -> Json<Vec<Contract>> {
    Json(state.store.current_board().await)
}

/// List modules for sale. Empty unless the ship is at the upgrade hub.
pub async fn get_modules(State(state): State<Arc<AppState>>) -> Json<Vec<ShipModule>> {
    Json(state.store.available_modules().await)
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Accept a contract from the local board.
pub async fn accept_contract(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ContractRequest>, JsonRejection>,
) -> Result<Json<Ship>, ApiError> {
    let request = required(body, "contract_id", |r| r.contract_id.as_str())?;
    let ship = state.store.accept_contract(&request.contract_id).await?;
    Ok(Json(ship))
}

/// Discard a carried contract. No penalty is applied.
pub async fn drop_contract(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ContractRequest>, JsonRejection>,
) -> Result<Json<Ship>, ApiError> {
    let request = required(body, "contract_id", |r| r.contract_id.as_str())?;
    let ship = state.store.drop_contract(&request.contract_id).await?;
    Ok(Json(ship))
}

// ---------------------------------------------------------------------------
// Travel and services
// ---------------------------------------------------------------------------

/// Fly to a location, delivering every contract bound there.
pub async fn travel(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TravelRequest>, JsonRejection>,
) -> Result<Json<Ship>, ApiError> {
    let request = required(body, "destination_key", |r| r.destination_key.as_str())?;
    let ship = state.store.travel(&request.destination_key).await?;
    Ok(Json(ship))
}

/// Estimate a trip without moving the ship.
pub async fn travel_quote(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TravelRequest>, JsonRejection>,
) -> Result<Json<TravelQuote>, ApiError> {
    let request = required(body, "destination_key", |r| r.destination_key.as_str())?;
    let quote = state.store.travel_quote(&request.destination_key).await?;
    Ok(Json(quote))
}

/// Fill the tank.
pub async fn refuel(State(state): State<Arc<AppState>>) -> Result<Json<Ship>, ApiError> {
    let ship = state.store.refuel().await?;
    Ok(Json(ship))
}

/// Buy and install a module at the upgrade hub.
pub async fn buy_module(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BuyModuleRequest>, JsonRejection>,
) -> Result<Json<Ship>, ApiError> {
    let request = required(body, "module_key", |r| r.module_key.as_str())?;
    let ship = state.store.buy_module(&request.module_key).await?;
    Ok(Json(ship))
}
