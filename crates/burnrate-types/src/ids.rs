//! Type-safe identifier wrappers.
//!
//! Contract identifiers are human-readable strings of the shape
//! `CRG-<sequence>-<millis>` or `PAX-<sequence>-<millis>`. They are
//! generated by the contract generator in `burnrate-core`; this crate only
//! defines the wrapper so that a contract id can never be confused with a
//! location or commodity key at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier of a contract within a running process.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ContractId(pub String);

impl ContractId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ContractId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContractId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ContractId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl PartialEq<str> for ContractId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
