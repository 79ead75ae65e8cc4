//! Supply and demand pressure ("heat") for every location and commodity.
//!
//! Two heat maps are tracked, both keyed by location then commodity and
//! centered on [`NEUTRAL_HEAT`]:
//!
//! - **Source heat** rises when contracts are accepted at an origin. High
//!   source heat means the good is scarce there and throttles future cargo
//!   generation at that origin.
//! - **Destination heat** rises when contracts are delivered. High
//!   destination heat means the market is flooded and suppresses cargo
//!   payouts to that destination.
//!
//! Every [`MarketState::tick`] moves all values a fixed step back toward
//! neutral without crossing it. Deliveries move heat twice as fast as
//! acceptances: markets saturate faster than mines deplete.

use std::collections::BTreeMap;

use crate::config::WorldConfig;

/// Heat value representing an undisturbed market.
pub const NEUTRAL_HEAT: f64 = 1.0;

/// Amount each tick moves a heat value toward neutral.
pub const RECOVERY_STEP: f64 = 0.05;

/// Source heat added per accepted unit.
pub const ACCEPTANCE_IMPACT: f64 = 0.01;

/// Destination heat added per delivered unit.
pub const DELIVERY_IMPACT: f64 = 0.02;

/// Heat values keyed by location key, then commodity key.
pub type HeatMap = BTreeMap<String, BTreeMap<String, f64>>;

/// The dynamic market, rebuilt wholesale on every (re)load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketState {
    source_heat: HeatMap,
    dest_heat: HeatMap,
}

impl MarketState {
    /// Create a market with a neutral entry for every (location, commodity)
    /// pair in the world definition.
    pub fn new(config: &WorldConfig) -> Self {
        let neutral: HeatMap = config
            .locations
            .iter()
            .map(|loc| {
                let row = config
                    .commodities
                    .iter()
                    .map(|c| (c.key.clone(), NEUTRAL_HEAT))
                    .collect();
                (loc.key.clone(), row)
            })
            .collect();
        Self {
            source_heat: neutral.clone(),
            dest_heat: neutral,
        }
    }

    /// Scarcity heat of `item` at `location`, if the pair is known.
    pub fn source_heat(&self, location: &str, item: &str) -> Option<f64> {
        self.source_heat.get(location)?.get(item).copied()
    }

    /// Saturation heat of `item` at `location`, if the pair is known.
    pub fn dest_heat(&self, location: &str, item: &str) -> Option<f64> {
        self.dest_heat.get(location)?.get(item).copied()
    }

    /// Record an accepted contract: the good becomes scarcer at its origin.
    ///
    /// Unknown (origin, item) pairs are ignored.
    pub fn record_acceptance(&mut self, origin: &str, item: &str, quantity: u32) {
        bump(&mut self.source_heat, origin, item, quantity, ACCEPTANCE_IMPACT);
    }

    /// Record a delivered contract: the destination market saturates.
    ///
    /// Unknown (destination, item) pairs are ignored.
    pub fn record_delivery(&mut self, destination: &str, item: &str, quantity: u32) {
        bump(&mut self.dest_heat, destination, item, quantity, DELIVERY_IMPACT);
    }

    /// Cool every heat value one step toward neutral.
    ///
    /// Values move by [`RECOVERY_STEP`] and are clamped at
    /// [`NEUTRAL_HEAT`], so a value never crosses neutral in one tick.
    pub fn tick(&mut self) {
        for row in self.source_heat.values_mut().chain(self.dest_heat.values_mut()) {
            for heat in row.values_mut() {
                *heat = cool(*heat);
            }
        }
    }
}

fn bump(map: &mut HeatMap, location: &str, item: &str, quantity: u32, per_unit: f64) {
    if let Some(heat) = map.get_mut(location).and_then(|row| row.get_mut(item)) {
        *heat += f64::from(quantity) * per_unit;
    }
}

fn cool(heat: f64) -> f64 {
    if heat > NEUTRAL_HEAT {
        (heat - RECOVERY_STEP).max(NEUTRAL_HEAT)
    } else if heat < NEUTRAL_HEAT {
        (heat + RECOVERY_STEP).min(NEUTRAL_HEAT)
    } else {
        heat
    }
}
