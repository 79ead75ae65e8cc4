//! Error types for game-state operations.
//!
//! Every rejected operation fails before touching state, so a returned
//! [`GameError`] always means "nothing changed". Callers that need to map
//! errors onto a transport (HTTP status codes) use [`GameError::kind`].

use burnrate_types::ContractId;

/// Coarse classification of a [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request named an entity that does not exist.
    NotFound,
    /// The entity exists but the ship cannot perform the operation now.
    PreconditionFailed,
}

/// Errors that can occur during game-state operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// No contract with this id is on the current board or aboard the ship.
    #[error("contract not found: {0}")]
    ContractNotFound(ContractId),

    /// The location key is not part of the world definition.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// The module key is not part of the module catalog.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// Accepting the contract would overfill the cargo hold.
    #[error("insufficient cargo space: need {requested}, {available} free")]
    InsufficientCargoSpace {
        /// Units the contract would add.
        requested: u32,
        /// Units still free in the hold.
        available: u32,
    },

    /// Accepting the contract would exceed the passenger slots.
    #[error("insufficient passenger slots: need {requested}, {available} free")]
    InsufficientPassengerSlots {
        /// Passengers the contract would add.
        requested: u32,
        /// Slots still free.
        available: u32,
    },

    /// The tank does not hold enough fuel for the trip.
    #[error("insufficient fuel for current mass: need {required}, have {available}")]
    InsufficientFuel {
        /// Fuel the trip would burn.
        required: i64,
        /// Fuel in the tank.
        available: i64,
    },

    /// The wallet does not cover the price.
    #[error("insufficient credits: need {required}, have {available}")]
    InsufficientCredits {
        /// Price of the operation.
        required: i64,
        /// Credits in the wallet.
        available: i64,
    },

    /// Every module slot is already occupied.
    #[error("no module slots available (max {max})")]
    NoModuleSlots {
        /// The ship's slot limit.
        max: u32,
    },

    /// Refueling was requested with a full tank.
    #[error("tank is already full")]
    TankFull,

    /// Modules can only be bought at the upgrade hub.
    #[error("upgrade service unavailable at {location}")]
    NotAtUpgradeHub {
        /// Where the ship currently is.
        location: String,
    },
}

impl GameError {
    /// Classify this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ContractNotFound(_) | Self::UnknownLocation(_) | Self::UnknownModule(_) => {
                ErrorKind::NotFound
            }
            Self::InsufficientCargoSpace { .. }
            | Self::InsufficientPassengerSlots { .. }
            | Self::InsufficientFuel { .. }
            | Self::InsufficientCredits { .. }
            | Self::NoModuleSlots { .. }
            | Self::TankFull
            | Self::NotAtUpgradeHub { .. } => ErrorKind::PreconditionFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_classify_as_not_found() {
        assert_eq!(
            GameError::ContractNotFound(ContractId::new("CRG-1-1")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            GameError::UnknownModule("mod_x".to_owned()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn capacity_and_funds_classify_as_precondition() {
        assert_eq!(GameError::TankFull.kind(), ErrorKind::PreconditionFailed);
        assert_eq!(
            GameError::InsufficientFuel {
                required: 600,
                available: 100
            }
            .kind(),
            ErrorKind::PreconditionFailed
        );
    }

    #[test]
    fn messages_carry_context() {
        let err = GameError::InsufficientCargoSpace {
            requested: 20,
            available: 5,
        };
        assert_eq!(err.to_string(), "insufficient cargo space: need 20, 5 free");
    }
}
