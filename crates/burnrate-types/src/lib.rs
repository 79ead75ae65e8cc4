//! Shared type definitions for the Burn Rate trading game.
//!
//! This crate is the single source of truth for the game model used across
//! the workspace: the static world catalog (locations, commodities, ship
//! modules), the mutable runtime entities (ship, contracts), and the
//! payloads exchanged with clients. Types flow downstream to `TypeScript`
//! via `ts-rs` for the game client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe contract identifier
//! - [`enums`] -- Contract kinds and module stat targets
//! - [`structs`] -- Catalog entries, ship, contracts, and API payloads

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ContractKind, StatModifier};
pub use ids::ContractId;
pub use structs::{
    BoardTargets, Commodity, Contract, DEFAULT_CARGO_TARGETS, DEFAULT_PASSENGER_TARGETS, Envelope,
    GameBalance, Location, MARKET_PULSE, PassengerConfig, SYSTEM_SENDER, Ship, ShipModule,
    TravelQuote,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. The files are written to the `bindings/`
        // directory relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::ContractId::export_all();

        // Enums
        let _ = crate::enums::ContractKind::export_all();
        let _ = crate::enums::StatModifier::export_all();

        // Structs
        let _ = crate::structs::GameBalance::export_all();
        let _ = crate::structs::Commodity::export_all();
        let _ = crate::structs::Location::export_all();
        let _ = crate::structs::ShipModule::export_all();
        let _ = crate::structs::PassengerConfig::export_all();
        let _ = crate::structs::Contract::export_all();
        let _ = crate::structs::Ship::export_all();
        let _ = crate::structs::TravelQuote::export_all();
        let _ = crate::structs::Envelope::export_all();
    }
}
