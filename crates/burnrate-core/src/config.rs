//! World definition loading and typed config structures.
//!
//! The canonical world definition lives in `universe.yaml`. This module
//! defines the struct that mirrors the YAML structure and a loader that
//! reads, parses, and validates it. A [`WorldConfig`] is immutable once
//! loaded; a hot reload builds a fresh one and swaps it in wholesale.

use std::collections::BTreeSet;
use std::path::Path;

use burnrate_types::{Commodity, GameBalance, Location, PassengerConfig, Ship, ShipModule};
use serde::Deserialize;

/// Errors that can occur when loading the world definition.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the world definition from disk.
    #[error("failed to read world definition: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse world definition YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The definition parsed but describes an unplayable world.
    #[error("invalid world definition: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Static world definition.
///
/// Mirrors the structure of `universe.yaml`. Locations are read from the
/// `planets` key; `locations` is accepted as an alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Global balance constants.
    #[serde(default, rename = "game_balance")]
    pub balance: GameBalance,

    /// Template the ship is seeded from.
    #[serde(default, rename = "player_ship")]
    pub ship_template: Ship,

    /// Commodity catalog.
    #[serde(default)]
    pub commodities: Vec<Commodity>,

    /// Location catalog, in definition order.
    #[serde(default, rename = "planets", alias = "locations")]
    pub locations: Vec<Location>,

    /// Ship module catalog.
    #[serde(default)]
    pub ship_modules: Vec<ShipModule>,

    /// Passenger fare configuration.
    #[serde(default, rename = "passenger_config")]
    pub passengers: PassengerConfig,
}

impl WorldConfig {
    /// Load and validate the world definition from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate the world definition from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// Contract generation needs at least two locations (a destination
    /// must differ from the origin) and at least one commodity. Burn rate
    /// computation divides by the ship's `burn_damping`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locations.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "at least two locations are required, found {}",
                self.locations.len()
            )));
        }
        if self.commodities.is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "at least one commodity is required",
            )));
        }

        let mut seen = BTreeSet::new();
        for loc in &self.locations {
            if !seen.insert(loc.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate location key: {}",
                    loc.key
                )));
            }
        }

        if self.ship_template.burn_damping <= 0 {
            return Err(ConfigError::Invalid(format!(
                "player_ship.burn_damping must be positive, found {}",
                self.ship_template.burn_damping
            )));
        }

        if self.location(&self.balance.upgrade_hub).is_none() {
            return Err(ConfigError::Invalid(format!(
                "game_balance.upgrade_hub names unknown location: {}",
                self.balance.upgrade_hub
            )));
        }

        Ok(())
    }

    /// Look up a location by key.
    pub fn location(&self, key: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.key == key)
    }

    /// Look up a commodity by key.
    pub fn commodity(&self, key: &str) -> Option<&Commodity> {
        self.commodities.iter().find(|c| c.key == key)
    }

    /// Look up a ship module by key.
    pub fn module(&self, key: &str) -> Option<&ShipModule> {
        self.ship_modules.iter().find(|m| m.key == key)
    }

    /// Build a freshly seeded ship from the template.
    ///
    /// Full tank, starting credits, docked at the upgrade hub, no modules
    /// and no contracts.
    pub fn seed_ship(&self) -> Ship {
        Ship {
            location_key: self.balance.upgrade_hub.clone(),
            credits: self.balance.starting_credits,
            fuel: self.ship_template.max_fuel,
            installed_modules: Vec::new(),
            active_contracts: Vec::new(),
            ..self.ship_template.clone()
        }
    }
}
