//! Core entity structs for the Burn Rate game model.
//!
//! These types double as the YAML world-definition schema (loaded by
//! `burnrate-core::config`) and the JSON wire format served by
//! `burnrate-server`. Runtime-only fields carry `#[serde(default)]` so a
//! ship template in YAML does not have to spell them out.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ContractKind, StatModifier};
use crate::ids::ContractId;

/// Board targets applied when a location leaves `max_cargo` unset (zero).
pub const DEFAULT_CARGO_TARGETS: BoardTargets = BoardTargets { min: 5, max: 15 };

/// Board targets applied when a location leaves `max_passengers` unset (zero).
pub const DEFAULT_PASSENGER_TARGETS: BoardTargets = BoardTargets { min: 2, max: 8 };

// ---------------------------------------------------------------------------
// Static catalog
// ---------------------------------------------------------------------------

/// Global tuning constants for the economy and physics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameBalance {
    /// Credits given to a freshly seeded ship.
    #[serde(default)]
    pub starting_credits: i64,
    /// Price of 100 fuel units at a depot.
    #[serde(default)]
    pub fuel_cost_per_unit: i64,
    /// Mass of a single fuel unit.
    #[serde(default)]
    pub fuel_mass_per_unit: i64,
    /// Credits paid per unit of distance on a cargo contract.
    #[serde(default)]
    pub distance_payout_mult: i64,
    /// Location where the ship starts and where modules are sold.
    #[serde(default = "default_upgrade_hub")]
    pub upgrade_hub: String,
}

impl Default for GameBalance {
    fn default() -> Self {
        Self {
            starting_credits: 0,
            fuel_cost_per_unit: 0,
            fuel_mass_per_unit: 0,
            distance_payout_mult: 0,
            upgrade_hub: default_upgrade_hub(),
        }
    }
}

fn default_upgrade_hub() -> String {
    "planet_prime".to_owned()
}

/// A tradeable good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Commodity {
    /// Unique key (e.g. `item_water`).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Baseline value per unit before market modifiers.
    #[serde(default)]
    pub base_value: i64,
    /// Mass of one unit.
    #[serde(default, alias = "mass")]
    pub mass_per_unit: i64,
}

/// Minimum and maximum number of offers a board keeps for one contract kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTargets {
    /// Replenishment triggers when the board holds fewer offers than this.
    pub min: u32,
    /// Upper bound of the randomly drawn restock level.
    pub max: u32,
}

/// A static location (node) on the star map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Unique key (e.g. `planet_prime`).
    pub key: String,
    /// Display name.
    pub name: String,
    /// `[x, y]` position on the star map.
    #[serde(default)]
    pub coordinates: Vec<i64>,
    /// Commodity keys this location sells.
    #[serde(default)]
    pub production: Vec<String>,
    /// Commodity keys this location buys.
    #[serde(default)]
    pub demand: Vec<String>,
    /// Minimum cargo offers on the board.
    #[serde(default)]
    pub min_cargo: u32,
    /// Maximum cargo offers on the board (zero selects the defaults).
    #[serde(default)]
    pub max_cargo: u32,
    /// Minimum passenger offers on the board.
    #[serde(default)]
    pub min_passengers: u32,
    /// Maximum passenger offers on the board (zero selects the defaults).
    #[serde(default)]
    pub max_passengers: u32,
}

impl Location {
    /// Effective board targets for the given contract kind.
    ///
    /// A zero maximum means "unset" and selects the defaults for both
    /// bounds. A maximum below the minimum is raised to the minimum.
    pub fn board_targets(&self, kind: ContractKind) -> BoardTargets {
        let (min, max, fallback) = match kind {
            ContractKind::Cargo => (self.min_cargo, self.max_cargo, DEFAULT_CARGO_TARGETS),
            ContractKind::Passenger => (
                self.min_passengers,
                self.max_passengers,
                DEFAULT_PASSENGER_TARGETS,
            ),
        };
        if max == 0 {
            return fallback;
        }
        BoardTargets {
            min,
            max: max.max(min),
        }
    }
}

/// An installable ship upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ShipModule {
    /// Unique key (e.g. `mod_cargo_bay`).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// Purchase price in credits.
    pub cost: i64,
    /// The stat this module adjusts.
    pub stat_modifier: StatModifier,
    /// Amount added to the stat.
    pub stat_value: u32,
}

/// Baseline values for passenger jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PassengerConfig {
    /// Flat fare added on top of the distance component.
    #[serde(default)]
    pub base_ticket_price: i64,
    /// Mass of one passenger including luggage.
    #[serde(default)]
    pub mass_per_passenger: i64,
}

// ---------------------------------------------------------------------------
// Runtime entities
// ---------------------------------------------------------------------------

/// A procedurally generated job.
///
/// Immutable once created. A contract is owned either by exactly one
/// location's board or by the ship, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Contract {
    /// Process-unique identifier.
    pub id: ContractId,
    /// Cargo or passenger.
    #[serde(rename = "type")]
    pub kind: ContractKind,
    /// Display name of the goods or passenger.
    pub item_name: String,
    /// Commodity key used for market heat tracking.
    pub item_key: String,
    /// Units of cargo or number of passengers.
    pub quantity: u32,
    /// Mass of each unit.
    pub mass_per_unit: i64,
    /// Location where the contract was offered.
    pub origin_key: String,
    /// Location where the contract is delivered.
    pub destination_key: String,
    /// Credits paid on delivery.
    pub payout: i64,
}

/// The player's vessel.
///
/// Loaded from the `player_ship` template in the world definition. The
/// runtime fields (location, credits, fuel, modules, contracts) are filled
/// in when the ship is seeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Ship {
    /// Ship name.
    #[serde(default)]
    pub name: String,
    /// Key of the location the ship is docked at (empty before seeding).
    #[serde(default)]
    pub location_key: String,
    /// Wallet balance.
    #[serde(default)]
    pub credits: i64,
    /// Current fuel level.
    #[serde(default)]
    pub fuel: i64,
    /// Fuel tank capacity.
    #[serde(default)]
    pub max_fuel: i64,
    /// Fuel burned per unit distance at reference mass.
    #[serde(default)]
    pub base_burn_rate: i64,
    /// Resistance to mass penalties; higher means mass matters less.
    #[serde(default)]
    pub burn_damping: i64,
    /// Mass of the empty chassis.
    #[serde(default)]
    pub base_mass: i64,
    /// Maximum total cargo units on board.
    #[serde(default)]
    pub cargo_capacity: u32,
    /// Maximum total passengers on board.
    #[serde(default)]
    pub passenger_slots: u32,
    /// Maximum number of installed modules.
    #[serde(default)]
    pub max_module_slots: u32,
    /// Installed upgrades in purchase order.
    #[serde(default)]
    pub installed_modules: Vec<ShipModule>,
    /// Contracts currently carried.
    #[serde(default)]
    pub active_contracts: Vec<Contract>,
}

impl Ship {
    /// Total quantity across active contracts of the given kind.
    pub fn load(&self, kind: ContractKind) -> u32 {
        self.active_contracts
            .iter()
            .filter(|c| c.kind == kind)
            .fold(0_u32, |acc, c| acc.saturating_add(c.quantity))
    }

    /// Capacity limit for the given contract kind.
    pub const fn capacity(&self, kind: ContractKind) -> u32 {
        match kind {
            ContractKind::Cargo => self.cargo_capacity,
            ContractKind::Passenger => self.passenger_slots,
        }
    }

    /// Whether another module can be installed.
    pub fn has_free_module_slot(&self) -> bool {
        u32::try_from(self.installed_modules.len()).is_ok_and(|n| n < self.max_module_slots)
    }
}

// ---------------------------------------------------------------------------
// API payloads
// ---------------------------------------------------------------------------

/// Pre-flight cost estimate for a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TravelQuote {
    /// Rounded distance to the destination.
    pub distance: i64,
    /// Fuel the trip would consume at the current mass.
    pub fuel_cost: i64,
    /// Whether the tank holds enough fuel for the trip.
    pub can_afford: bool,
    /// Burn rate used for the estimate.
    pub burn_rate: i64,
}

/// Sender name used for messages originating from the server itself.
pub const SYSTEM_SENDER: &str = "system";

/// Event type of the periodic replenishment notification.
pub const MARKET_PULSE: &str = "market_pulse";

/// Envelope for every message on the real-time channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Envelope {
    /// Event type (e.g. `market_pulse`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event-specific data.
    pub payload: serde_json::Value,
    /// Origin of the message (`system` or a client name).
    pub sender: String,
}

impl Envelope {
    /// Build the pulse sent after a replenishment pass changed some boards.
    pub fn market_pulse(updated_planets: &[String]) -> Self {
        Self {
            event_type: MARKET_PULSE.to_owned(),
            payload: serde_json::json!({ "updated_planets": updated_planets }),
            sender: SYSTEM_SENDER.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(max_cargo: u32, min_cargo: u32) -> Location {
        Location {
            key: "a".to_owned(),
            name: "A".to_owned(),
            coordinates: vec![0, 0],
            production: Vec::new(),
            demand: Vec::new(),
            min_cargo,
            max_cargo,
            min_passengers: 0,
            max_passengers: 0,
        }
    }

    #[test]
    fn unset_targets_fall_back_to_defaults() {
        let loc = location(0, 3);
        assert_eq!(loc.board_targets(ContractKind::Cargo), DEFAULT_CARGO_TARGETS);
        assert_eq!(
            loc.board_targets(ContractKind::Passenger),
            DEFAULT_PASSENGER_TARGETS
        );
    }

    #[test]
    fn inverted_targets_are_raised_to_min() {
        let loc = location(2, 4);
        let targets = loc.board_targets(ContractKind::Cargo);
        assert_eq!(targets.min, 4);
        assert_eq!(targets.max, 4);
    }

    #[test]
    fn contract_serializes_kind_as_type() {
        let contract = Contract {
            id: ContractId::new("CRG-1-2"),
            kind: ContractKind::Cargo,
            item_name: "Water".to_owned(),
            item_key: "item_water".to_owned(),
            quantity: 5,
            mass_per_unit: 2,
            origin_key: "a".to_owned(),
            destination_key: "b".to_owned(),
            payout: 100,
        };
        let json = serde_json::to_value(&contract).unwrap_or_default();
        assert_eq!(json["type"], "cargo");
        assert_eq!(json["id"], "CRG-1-2");
    }

    #[test]
    fn market_pulse_envelope_shape() {
        let env = Envelope::market_pulse(&["a".to_owned(), "b".to_owned()]);
        let json = serde_json::to_value(&env).unwrap_or_default();
        assert_eq!(json["type"], "market_pulse");
        assert_eq!(json["sender"], "system");
        assert_eq!(json["payload"]["updated_planets"][1], "b");
    }

    #[test]
    fn ship_load_sums_by_kind() {
        let mut ship = Ship::default();
        for (kind, qty) in [
            (ContractKind::Cargo, 10),
            (ContractKind::Cargo, 5),
            (ContractKind::Passenger, 1),
        ] {
            ship.active_contracts.push(Contract {
                id: ContractId::new(format!("X-{qty}")),
                kind,
                item_name: String::new(),
                item_key: String::new(),
                quantity: qty,
                mass_per_unit: 1,
                origin_key: String::new(),
                destination_key: String::new(),
                payout: 0,
            });
        }
        assert_eq!(ship.load(ContractKind::Cargo), 15);
        assert_eq!(ship.load(ContractKind::Passenger), 1);
    }
}
