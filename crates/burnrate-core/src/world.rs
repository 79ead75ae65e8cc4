//! The authoritative game world.
//!
//! [`GameWorld`] owns the world definition, the ship, the job boards, the
//! market, and the randomness used to generate contracts. Every method is a
//! complete validate-then-mutate transaction: on error nothing has changed.
//!
//! The world is synchronous and knows nothing about locking. Concurrent
//! access goes through [`crate::store::StateStore`], which wraps a single
//! world in one reader/writer lock and calls exactly one of these methods
//! per critical section.

use std::collections::BTreeMap;

use burnrate_types::{
    Contract, ContractKind, Location, Ship, ShipModule, StatModifier, TravelQuote,
};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::WorldConfig;
use crate::error::GameError;
use crate::generator::{ContractGenerator, ContractIdSource};
use crate::market::MarketState;
use crate::physics;

/// Contracts on offer, keyed by location key.
pub type JobBoard = BTreeMap<String, Vec<Contract>>;

/// Contract kinds in the order boards are restocked.
const BOARD_KINDS: [ContractKind; 2] = [ContractKind::Cargo, ContractKind::Passenger];

/// The single mutable game world.
#[derive(Debug)]
pub struct GameWorld {
    config: WorldConfig,
    ship: Ship,
    boards: JobBoard,
    market: MarketState,
    ids: ContractIdSource,
    rng: StdRng,
}

impl GameWorld {
    /// Build a world from a validated definition.
    ///
    /// The ship is seeded from the template and the boards start empty;
    /// call [`Self::replenish_boards`] to stock them.
    pub fn new(config: WorldConfig, mut rng: StdRng) -> Self {
        let ids = ContractIdSource::new(&mut rng);
        Self {
            ship: config.seed_ship(),
            market: MarketState::new(&config),
            boards: JobBoard::new(),
            config,
            ids,
            rng,
        }
    }

    /// The current world definition.
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The player's ship.
    pub const fn ship(&self) -> &Ship {
        &self.ship
    }

    /// The market heat maps.
    pub const fn market(&self) -> &MarketState {
        &self.market
    }

    /// Every job board.
    pub const fn boards(&self) -> &JobBoard {
        &self.boards
    }

    /// All locations in definition order.
    pub fn locations(&self) -> &[Location] {
        &self.config.locations
    }

    /// Contracts on offer at `location`.
    pub fn board(&self, location: &str) -> &[Contract] {
        self.boards.get(location).map_or(&[], Vec::as_slice)
    }

    /// Contracts on offer where the ship is docked.
    pub fn current_board(&self) -> &[Contract] {
        self.board(&self.ship.location_key)
    }

    /// Modules for sale where the ship is docked.
    ///
    /// The full catalog at the upgrade hub, nothing anywhere else.
    pub fn available_modules(&self) -> &[ShipModule] {
        if self.at_upgrade_hub() {
            &self.config.ship_modules
        } else {
            &[]
        }
    }

    fn at_upgrade_hub(&self) -> bool {
        self.ship.location_key == self.config.balance.upgrade_hub
    }

    /// Move a contract from the current location's board onto the ship.
    ///
    /// Makes the contract's commodity scarcer at its origin.
    ///
    /// # Errors
    ///
    /// [`GameError::ContractNotFound`] if the id is not on the current
    /// board, or a capacity error if the ship cannot take the load.
    pub fn accept_contract(&mut self, id: &str) -> Result<(), GameError> {
        let not_found = || GameError::ContractNotFound(id.into());
        let board = self
            .boards
            .get_mut(&self.ship.location_key)
            .ok_or_else(not_found)?;
        let (index, contract) = board
            .iter()
            .enumerate()
            .find(|(_, c)| c.id == *id)
            .ok_or_else(not_found)?;

        let kind = contract.kind;
        let load = self.ship.load(kind);
        let capacity = self.ship.capacity(kind);
        if load.saturating_add(contract.quantity) > capacity {
            let requested = contract.quantity;
            let available = capacity.saturating_sub(load);
            return Err(match kind {
                ContractKind::Cargo => GameError::InsufficientCargoSpace {
                    requested,
                    available,
                },
                ContractKind::Passenger => GameError::InsufficientPassengerSlots {
                    requested,
                    available,
                },
            });
        }

        let contract = board.swap_remove(index);
        self.market
            .record_acceptance(&contract.origin_key, &contract.item_key, contract.quantity);
        debug!(
            contract_id = %contract.id,
            kind = %contract.kind,
            quantity = contract.quantity,
            "Contract accepted"
        );
        self.ship.active_contracts.push(contract);
        Ok(())
    }

    /// Discard a contract held by the ship.
    ///
    /// The contract is destroyed; it does not return to any board.
    ///
    /// # Errors
    ///
    /// [`GameError::ContractNotFound`] if the ship does not hold it.
    pub fn drop_contract(&mut self, id: &str) -> Result<Contract, GameError> {
        let index = self
            .ship
            .active_contracts
            .iter()
            .position(|c| c.id == *id)
            .ok_or_else(|| GameError::ContractNotFound(id.into()))?;
        let dropped = self.ship.active_contracts.swap_remove(index);
        debug!(contract_id = %dropped.id, "Contract dropped");
        Ok(dropped)
    }

    /// Estimate a trip from the current location to `destination`.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownLocation`] if the destination is not defined.
    pub fn travel_quote(&self, destination: &str) -> Result<TravelQuote, GameError> {
        let dest = self
            .config
            .location(destination)
            .ok_or_else(|| GameError::UnknownLocation(destination.to_owned()))?;
        let here = self
            .config
            .location(&self.ship.location_key)
            .map_or(&[][..], |l| l.coordinates.as_slice());

        let distance = physics::distance(here, &dest.coordinates);
        let burn_rate = physics::current_burn_rate(
            &self.ship,
            self.config.passengers.mass_per_passenger,
            self.config.balance.fuel_mass_per_unit,
        );
        let fuel_cost = distance.saturating_mul(burn_rate);
        Ok(TravelQuote {
            distance,
            fuel_cost,
            can_afford: self.ship.fuel >= fuel_cost,
            burn_rate,
        })
    }

    /// Fly to `destination`, burning fuel and delivering every contract
    /// bound there.
    ///
    /// Each delivery credits its payout and saturates the destination
    /// market. Returns the delivered contracts.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownLocation`] for an undefined destination, or
    /// [`GameError::InsufficientFuel`] if the tank cannot cover the trip.
    pub fn travel(&mut self, destination: &str) -> Result<Vec<Contract>, GameError> {
        let quote = self.travel_quote(destination)?;
        if !quote.can_afford {
            return Err(GameError::InsufficientFuel {
                required: quote.fuel_cost,
                available: self.ship.fuel,
            });
        }

        self.ship.fuel = self.ship.fuel.saturating_sub(quote.fuel_cost);
        self.ship.location_key = destination.to_owned();

        let (delivered, remaining): (Vec<Contract>, Vec<Contract>) =
            std::mem::take(&mut self.ship.active_contracts)
                .into_iter()
                .partition(|c| c.destination_key == destination);
        self.ship.active_contracts = remaining;

        for contract in &delivered {
            self.ship.credits = self.ship.credits.saturating_add(contract.payout);
            self.market.record_delivery(
                &contract.destination_key,
                &contract.item_key,
                contract.quantity,
            );
        }

        debug!(
            destination,
            distance = quote.distance,
            fuel_cost = quote.fuel_cost,
            delivered = delivered.len(),
            "Ship travelled"
        );
        Ok(delivered)
    }

    /// Fill the tank. Returns the price paid.
    ///
    /// Fuel is priced per started hundred units missing, rounded down, so
    /// topping up fewer than 100 units is free.
    ///
    /// # Errors
    ///
    /// [`GameError::TankFull`] if nothing is missing, or
    /// [`GameError::InsufficientCredits`] if the wallet cannot cover it.
    pub fn refuel(&mut self) -> Result<i64, GameError> {
        let needed = self.ship.max_fuel.saturating_sub(self.ship.fuel);
        if needed <= 0 {
            return Err(GameError::TankFull);
        }
        let cost = (needed / 100).saturating_mul(self.config.balance.fuel_cost_per_unit);
        if self.ship.credits < cost {
            return Err(GameError::InsufficientCredits {
                required: cost,
                available: self.ship.credits,
            });
        }

        self.ship.credits = self.ship.credits.saturating_sub(cost);
        self.ship.fuel = self.ship.max_fuel;
        debug!(fuel = needed, cost, "Ship refuelled");
        Ok(cost)
    }

    /// Buy and install a module, applying its stat delta permanently.
    ///
    /// # Errors
    ///
    /// Checked in order: [`GameError::NotAtUpgradeHub`],
    /// [`GameError::NoModuleSlots`], [`GameError::UnknownModule`],
    /// [`GameError::InsufficientCredits`].
    pub fn buy_module(&mut self, key: &str) -> Result<(), GameError> {
        if !self.at_upgrade_hub() {
            return Err(GameError::NotAtUpgradeHub {
                location: self.ship.location_key.clone(),
            });
        }
        if !self.ship.has_free_module_slot() {
            return Err(GameError::NoModuleSlots {
                max: self.ship.max_module_slots,
            });
        }
        let module = self
            .config
            .module(key)
            .ok_or_else(|| GameError::UnknownModule(key.to_owned()))?;
        if self.ship.credits < module.cost {
            return Err(GameError::InsufficientCredits {
                required: module.cost,
                available: self.ship.credits,
            });
        }

        self.ship.credits = self.ship.credits.saturating_sub(module.cost);
        match module.stat_modifier {
            StatModifier::CargoCapacity => {
                self.ship.cargo_capacity =
                    self.ship.cargo_capacity.saturating_add(module.stat_value);
            }
            StatModifier::PassengerSlots => {
                self.ship.passenger_slots =
                    self.ship.passenger_slots.saturating_add(module.stat_value);
            }
        }
        self.ship.installed_modules.push(module.clone());
        debug!(module = key, cost = module.cost, "Module installed");
        Ok(())
    }

    /// Cool all market heat one step toward neutral.
    pub fn tick_market(&mut self) {
        self.market.tick();
    }

    /// Top up every under-stocked board.
    ///
    /// For each location and contract kind whose offer count is below the
    /// minimum, a restock level is drawn uniformly from `[min, max]` and the
    /// generator is invoked once per missing offer. Cargo draws may be
    /// skipped by the scarcity check, so a board can stay below its
    /// minimum until a later pass.
    ///
    /// Returns the keys of locations that gained at least one contract, in
    /// definition order.
    pub fn replenish_boards(&mut self) -> Vec<String> {
        let generator = ContractGenerator::new(&self.config, &self.market);
        let mut updated = Vec::new();

        for location in &self.config.locations {
            let offers = self.boards.entry(location.key.clone()).or_default();
            let before = offers.len();

            for kind in BOARD_KINDS {
                let targets = location.board_targets(kind);
                let count = offers.iter().filter(|c| c.kind == kind).count();
                let count = u32::try_from(count).unwrap_or(u32::MAX);
                if count >= targets.min {
                    continue;
                }
                let target = self.rng.random_range(targets.min..=targets.max);
                for _ in 0..target.saturating_sub(count) {
                    if let Some(contract) =
                        generator.generate(kind, location, &mut self.ids, &mut self.rng)
                    {
                        offers.push(contract);
                    }
                }
            }

            if offers.len() > before {
                updated.push(location.key.clone());
            }
        }

        updated
    }

    /// Swap in a freshly loaded world definition.
    ///
    /// The market is rebuilt and every board is cleared. The ship keeps
    /// its in-flight state unless it has no location, in which case it is
    /// reseeded from the new template.
    pub fn reload(&mut self, config: WorldConfig) {
        self.market = MarketState::new(&config);
        self.boards.clear();
        if self.ship.location_key.is_empty() {
            self.ship = config.seed_ship();
        }
        self.config = config;
    }

    #[cfg(test)]
    pub(crate) const fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    #[cfg(test)]
    pub(crate) fn offer(&mut self, contract: Contract) {
        self.boards
            .entry(contract.origin_key.clone())
            .or_default()
            .push(contract);
    }
}
