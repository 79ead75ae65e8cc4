//! Enumeration types for the Burn Rate game model.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The two kinds of job a location can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ContractKind {
    /// Haul a quantity of a commodity to another location.
    Cargo,
    /// Carry a single passenger to another location.
    Passenger,
}

impl ContractKind {
    /// Identifier prefix used when minting contract ids of this kind.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Cargo => "CRG",
            Self::Passenger => "PAX",
        }
    }
}

impl core::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Cargo => f.write_str("cargo"),
            Self::Passenger => f.write_str("passenger"),
        }
    }
}

/// The ship stat a module adjusts when installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum StatModifier {
    /// Adds to the number of cargo units the ship can carry.
    CargoCapacity,
    /// Adds to the number of passengers the ship can carry.
    PassengerSlots,
}
