//! Procedural cargo and passenger contract generation.
//!
//! Generation reads the world definition and the market heat maps but
//! never mutates them; the caller (the replenishment pass in
//! [`crate::world`]) owns placing the produced contracts on a board.
//!
//! Soft failures are silent. A cargo draw that hits the scarcity check, or
//! a location with no valid destination, simply yields `None` and the board
//! ends up with fewer offers.

use burnrate_types::{Commodity, Contract, ContractId, ContractKind, Location};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::WorldConfig;
use crate::market::{MarketState, NEUTRAL_HEAT};
use crate::physics;

/// Probability that a cargo draw prefers one of the origin's own products.
pub const LOCAL_PRODUCTION_BIAS: f32 = 0.8;

/// A cargo draw is skipped when `random() * source_heat` exceeds this.
pub const SCARCITY_SKIP_THRESHOLD: f64 = 1.5;

/// Inclusive quantity range for cargo contracts.
pub const CARGO_QUANTITY: core::ops::RangeInclusive<u32> = 5..=25;

/// Credits per unit distance on passenger contracts.
pub const PASSENGER_DISTANCE_RATE: i64 = 15;

/// Item key recorded on passenger contracts.
pub const PASSENGER_ITEM_KEY: &str = "passenger";

/// Display name recorded on passenger contracts.
pub const PASSENGER_ITEM_NAME: &str = "Passenger";

/// Exclusive upper bound of the random starting point for contract ids.
const ID_SEED_RANGE: u64 = 99_999;

/// Mints contract identifiers.
///
/// Ids have the shape `<PREFIX>-<sequence>-<millis>` where the sequence
/// starts at a random offset and increases by one per id. Two ids minted by
/// the same source therefore never collide, regardless of clock resolution.
#[derive(Debug, Clone)]
pub struct ContractIdSource {
    next: u64,
}

impl ContractIdSource {
    /// Start a new sequence at a random offset.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            next: rng.random_range(0..ID_SEED_RANGE),
        }
    }

    /// Start a sequence at a fixed value.
    pub const fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Mint the next identifier for a contract of the given kind.
    pub fn mint(&mut self, kind: ContractKind) -> ContractId {
        let sequence = self.next;
        self.next = self.next.wrapping_add(1);
        let millis = chrono::Utc::now().timestamp_subsec_millis();
        ContractId(format!("{}-{sequence}-{millis}", kind.id_prefix()))
    }
}

/// Read-only view over the world used to price and route new contracts.
#[derive(Debug, Clone, Copy)]
pub struct ContractGenerator<'a> {
    config: &'a WorldConfig,
    market: &'a MarketState,
}

impl<'a> ContractGenerator<'a> {
    /// Create a generator over the given world definition and market.
    pub const fn new(config: &'a WorldConfig, market: &'a MarketState) -> Self {
        Self { config, market }
    }

    /// Generate one contract of the given kind offered at `origin`.
    pub fn generate(
        &self,
        kind: ContractKind,
        origin: &Location,
        ids: &mut ContractIdSource,
        rng: &mut impl Rng,
    ) -> Option<Contract> {
        match kind {
            ContractKind::Cargo => self.cargo(origin, ids, rng),
            ContractKind::Passenger => self.passenger(origin, ids, rng),
        }
    }

    /// Generate one cargo contract offered at `origin`.
    ///
    /// Returns `None` when the scarcity check rejects the draw or when no
    /// commodity or destination is available.
    pub fn cargo(
        &self,
        origin: &Location,
        ids: &mut ContractIdSource,
        rng: &mut impl Rng,
    ) -> Option<Contract> {
        let commodity = self.pick_commodity(origin, rng)?;

        let source_heat = self
            .market
            .source_heat(&origin.key, &commodity.key)
            .unwrap_or(NEUTRAL_HEAT);
        if source_heat > NEUTRAL_HEAT && rng.random::<f64>() * source_heat > SCARCITY_SKIP_THRESHOLD
        {
            return None;
        }

        let destination = self.pick_destination(origin, rng)?;
        let quantity = rng.random_range(CARGO_QUANTITY);
        let distance = physics::distance(&origin.coordinates, &destination.coordinates);

        let base_payout = distance
            .saturating_mul(self.config.balance.distance_payout_mult)
            .saturating_add(
                commodity
                    .base_value
                    .saturating_mul(i64::from(quantity))
                    / 2,
            );
        let dest_heat = self
            .market
            .dest_heat(&destination.key, &commodity.key)
            .filter(|h| *h > 0.0)
            .unwrap_or(NEUTRAL_HEAT);

        Some(Contract {
            id: ids.mint(ContractKind::Cargo),
            kind: ContractKind::Cargo,
            item_name: commodity.name.clone(),
            item_key: commodity.key.clone(),
            quantity,
            mass_per_unit: commodity.mass_per_unit,
            origin_key: origin.key.clone(),
            destination_key: destination.key.clone(),
            payout: scale_payout(base_payout, dest_heat),
        })
    }

    /// Generate one passenger contract offered at `origin`.
    ///
    /// Passenger fares ignore market heat.
    pub fn passenger(
        &self,
        origin: &Location,
        ids: &mut ContractIdSource,
        rng: &mut impl Rng,
    ) -> Option<Contract> {
        let destination = self.pick_destination(origin, rng)?;
        let distance = physics::distance(&origin.coordinates, &destination.coordinates);
        let payout = distance
            .saturating_mul(PASSENGER_DISTANCE_RATE)
            .saturating_add(self.config.passengers.base_ticket_price);

        Some(Contract {
            id: ids.mint(ContractKind::Passenger),
            kind: ContractKind::Passenger,
            item_name: PASSENGER_ITEM_NAME.to_owned(),
            item_key: PASSENGER_ITEM_KEY.to_owned(),
            quantity: 1,
            mass_per_unit: self.config.passengers.mass_per_passenger,
            origin_key: origin.key.clone(),
            destination_key: destination.key.clone(),
            payout,
        })
    }

    /// Prefer one of the origin's products, falling back to any commodity
    /// when the origin produces nothing, the roll goes global, or the
    /// product key does not resolve.
    fn pick_commodity(&self, origin: &Location, rng: &mut impl Rng) -> Option<&'a Commodity> {
        let local = if !origin.production.is_empty()
            && rng.random::<f32>() < LOCAL_PRODUCTION_BIAS
        {
            origin
                .production
                .choose(rng)
                .and_then(|key| self.config.commodity(key))
        } else {
            None
        };
        local.or_else(|| self.config.commodities.choose(rng))
    }

    /// Uniformly random location other than the origin.
    fn pick_destination(&self, origin: &Location, rng: &mut impl Rng) -> Option<&'a Location> {
        let candidates: Vec<&Location> = self
            .config
            .locations
            .iter()
            .filter(|l| l.key != origin.key)
            .collect();
        candidates.choose(rng).copied()
    }
}

/// Scale a payout by the inverse of destination heat, truncating toward zero.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn scale_payout(base: i64, dest_heat: f64) -> i64 {
    (base as f64 * (1.0 / dest_heat)) as i64
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::tests::two_planet_config;

    fn alpha(config: &WorldConfig) -> Location {
        config.location("alpha").cloned().unwrap_or_else(|| Location {
            key: String::new(),
            name: String::new(),
            coordinates: Vec::new(),
            production: Vec::new(),
            demand: Vec::new(),
            min_cargo: 0,
            max_cargo: 0,
            min_passengers: 0,
            max_passengers: 0,
        })
    }

    fn base_value(config: &WorldConfig, item: &str) -> i64 {
        config.commodity(item).map_or(0, |c| c.base_value)
    }

    #[test]
    fn cargo_contract_has_expected_shape_and_price() {
        let config = two_planet_config();
        let market = MarketState::new(&config);
        let generator = ContractGenerator::new(&config, &market);
        let origin = alpha(&config);
        let mut rng = StdRng::seed_from_u64(7);
        let mut ids = ContractIdSource::starting_at(1);

        for _ in 0..50 {
            let Some(c) = generator.cargo(&origin, &mut ids, &mut rng) else {
                panic!("neutral heat must never skip a draw");
            };
            assert!(c.id.as_str().starts_with("CRG-"));
            assert_eq!(c.kind, ContractKind::Cargo);
            assert_eq!(c.origin_key, "alpha");
            assert_eq!(c.destination_key, "beta");
            assert!(CARGO_QUANTITY.contains(&c.quantity));
            // distance 5 * mult 20 + base * qty / 2, neutral heat.
            let expected = 100 + base_value(&config, &c.item_key) * i64::from(c.quantity) / 2;
            assert_eq!(c.payout, expected);
        }
    }

    #[test]
    fn saturated_destination_pays_less() {
        let config = two_planet_config();
        let mut market = MarketState::new(&config);
        // Push beta's destination heat to 2.0 for every commodity.
        market.record_delivery("beta", "item_water", 50);
        market.record_delivery("beta", "item_ore", 50);
        let generator = ContractGenerator::new(&config, &market);
        let origin = alpha(&config);
        let mut rng = StdRng::seed_from_u64(11);
        let mut ids = ContractIdSource::starting_at(1);

        for _ in 0..20 {
            let Some(c) = generator.cargo(&origin, &mut ids, &mut rng) else {
                continue;
            };
            let base = 100 + base_value(&config, &c.item_key) * i64::from(c.quantity) / 2;
            assert_eq!(c.payout, base / 2);
        }
    }

    #[test]
    fn scarce_origin_skips_most_draws() {
        let config = two_planet_config();
        let mut market = MarketState::new(&config);
        // Source heat ~101 for everything at alpha.
        market.record_acceptance("alpha", "item_water", 10_000);
        market.record_acceptance("alpha", "item_ore", 10_000);
        let generator = ContractGenerator::new(&config, &market);
        let origin = alpha(&config);
        let mut rng = StdRng::seed_from_u64(3);
        let mut ids = ContractIdSource::starting_at(1);

        let produced = (0..200)
            .filter_map(|_| generator.cargo(&origin, &mut ids, &mut rng))
            .count();
        assert!(produced < 30, "expected heavy throttling, got {produced}");
    }

    fn catalog_keys(config: &WorldConfig) -> BTreeSet<String> {
        config.commodities.iter().map(|c| c.key.clone()).collect()
    }

    #[test]
    fn unresolvable_product_falls_back_to_catalog() {
        let config = two_planet_config();
        let market = MarketState::new(&config);
        let generator = ContractGenerator::new(&config, &market);
        let mut origin = alpha(&config);
        origin.production = vec![String::from("item_missing")];
        let mut rng = StdRng::seed_from_u64(21);
        let mut ids = ContractIdSource::starting_at(1);

        let contracts: Vec<Contract> = (0..100)
            .filter_map(|_| generator.cargo(&origin, &mut ids, &mut rng))
            .collect();
        assert_eq!(contracts.len(), 100);
        let catalog = catalog_keys(&config);
        for c in &contracts {
            assert!(catalog.contains(&c.item_key), "unknown item {}", c.item_key);
            assert_ne!(c.item_key, "item_missing");
        }
    }

    #[test]
    fn origin_without_production_draws_from_whole_catalog() {
        let config = two_planet_config();
        let market = MarketState::new(&config);
        let generator = ContractGenerator::new(&config, &market);
        let mut origin = alpha(&config);
        origin.production.clear();
        let mut rng = StdRng::seed_from_u64(22);
        let mut ids = ContractIdSource::starting_at(1);

        let drawn: BTreeSet<String> = (0..100)
            .filter_map(|_| generator.cargo(&origin, &mut ids, &mut rng))
            .map(|c| c.item_key)
            .collect();
        assert_eq!(drawn, catalog_keys(&config));
    }

    #[test]
    fn origin_production_dominates() {
        let config = two_planet_config();
        let market = MarketState::new(&config);
        let generator = ContractGenerator::new(&config, &market);
        let origin = alpha(&config);
        let mut rng = StdRng::seed_from_u64(99);
        let mut ids = ContractIdSource::starting_at(1);

        let water = (0..500)
            .filter_map(|_| generator.cargo(&origin, &mut ids, &mut rng))
            .filter(|c| c.item_key == "item_water")
            .count();
        // 80% local + half of the 20% global roll lands on water.
        assert!(water > 380, "expected ~450 water contracts, got {water}");
    }

    #[test]
    fn passenger_fare_ignores_heat() {
        let config = two_planet_config();
        let mut market = MarketState::new(&config);
        market.record_delivery("beta", "item_water", 500);
        let generator = ContractGenerator::new(&config, &market);
        let origin = alpha(&config);
        let mut rng = StdRng::seed_from_u64(5);
        let mut ids = ContractIdSource::starting_at(1);

        let c = generator.passenger(&origin, &mut ids, &mut rng);
        assert!(c.is_some());
        let Some(c) = c else { return };
        assert!(c.id.as_str().starts_with("PAX-"));
        assert_eq!(c.kind, ContractKind::Passenger);
        assert_eq!(c.quantity, 1);
        assert_eq!(c.item_key, PASSENGER_ITEM_KEY);
        assert_eq!(c.mass_per_unit, 80);
        assert_eq!(c.destination_key, "beta");
        // 5 * 15 + 50
        assert_eq!(c.payout, 125);
    }

    #[test]
    fn minted_ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ids = ContractIdSource::new(&mut rng);
        let minted: BTreeSet<String> = (0..1000)
            .map(|i| {
                let kind = if i % 2 == 0 {
                    ContractKind::Cargo
                } else {
                    ContractKind::Passenger
                };
                ids.mint(kind).into_inner()
            })
            .collect();
        assert_eq!(minted.len(), 1000);
    }

    #[test]
    fn scale_payout_truncates() {
        assert_eq!(scale_payout(101, 2.0), 50);
        assert_eq!(scale_payout(100, 1.0), 100);
        assert_eq!(scale_payout(100, 1.5), 66);
    }
}
