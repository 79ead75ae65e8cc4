//! Distance, mass, and fuel burn calculations.
//!
//! Pure functions with no access to shared state; callers pass in the ship
//! and the balance constants they need. Safe to call under either a shared
//! or an exclusive acquisition of the world lock.

use burnrate_types::{ContractKind, Ship};

/// Burn rate floor. Travel never becomes free or pays fuel back.
pub const MIN_BURN_RATE: i64 = 100;

/// Euclidean distance between two `[x, y]` coordinates, rounded to the
/// nearest integer.
///
/// Returns 0 if either coordinate has fewer than two components.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn distance(a: &[i64], b: &[i64]) -> i64 {
    let (Some(&ax), Some(&ay), Some(&bx), Some(&by)) = (a.first(), a.get(1), b.first(), b.get(1))
    else {
        return 0;
    };
    let dx = bx.saturating_sub(ax) as f64;
    let dy = by.saturating_sub(ay) as f64;
    dx.hypot(dy).round() as i64
}

/// Current total mass of the ship.
///
/// Base chassis mass plus every carried cargo unit, every passenger (at
/// the configured per-passenger mass), and the fuel in the tank.
pub fn total_mass(ship: &Ship, passenger_mass: i64, fuel_mass_per_unit: i64) -> i64 {
    let payload = ship.active_contracts.iter().fold(0_i64, |acc, c| {
        let unit_mass = match c.kind {
            ContractKind::Cargo => c.mass_per_unit,
            ContractKind::Passenger => passenger_mass,
        };
        acc.saturating_add(unit_mass.saturating_mul(i64::from(c.quantity)))
    });
    ship.base_mass
        .saturating_add(payload)
        .saturating_add(ship.fuel.saturating_mul(fuel_mass_per_unit))
}

/// Mass at which the ship burns exactly its base rate: empty chassis plus
/// half a full tank.
pub const fn reference_mass(ship: &Ship, fuel_mass_per_unit: i64) -> i64 {
    ship.base_mass
        .saturating_add((ship.max_fuel / 2).saturating_mul(fuel_mass_per_unit))
}

/// Fuel burned per unit distance at the ship's current mass.
///
/// `base_burn_rate + (total_mass - reference_mass) / burn_damping`, using
/// truncating integer division, clamped from below at [`MIN_BURN_RATE`].
pub fn current_burn_rate(ship: &Ship, passenger_mass: i64, fuel_mass_per_unit: i64) -> i64 {
    let delta = total_mass(ship, passenger_mass, fuel_mass_per_unit)
        .saturating_sub(reference_mass(ship, fuel_mass_per_unit));
    let adjustment = delta.checked_div(ship.burn_damping).unwrap_or(0);
    ship.base_burn_rate
        .saturating_add(adjustment)
        .max(MIN_BURN_RATE)
}
