//! Process settings read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BURNRATE_CONFIG` | `universe.yaml` | Path of the world definition |
//! | `BURNRATE_HOST` | `0.0.0.0` | Listen address |
//! | `BURNRATE_PORT` | `8081` | Listen port |
//! | `BURNRATE_HEARTBEAT_SECS` | `60` | Seconds between market cycles |

use std::path::PathBuf;
use std::time::Duration;

use burnrate_server::{DEFAULT_HEARTBEAT, ServerConfig};

use crate::error::EngineError;

/// Default path of the world definition.
pub const DEFAULT_WORLD_PATH: &str = "universe.yaml";

/// Settings for one engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path of the world definition, re-read on every reload.
    pub world_path: PathBuf,
    /// HTTP listen address.
    pub server: ServerConfig,
    /// Interval between market cycles.
    pub heartbeat: Duration,
}

impl EngineConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let defaults = ServerConfig::default();

        let world_path = lookup("BURNRATE_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_WORLD_PATH), PathBuf::from);
        let host = lookup("BURNRATE_HOST").unwrap_or(defaults.host);

        let port = match lookup("BURNRATE_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| EngineError::InvalidSetting {
                name: "BURNRATE_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let heartbeat = match lookup("BURNRATE_HEARTBEAT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(EngineError::InvalidSetting {
                        name: "BURNRATE_HEARTBEAT_SECS",
                        value: raw,
                        reason: String::from("must be at least 1"),
                    });
                }
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => {
                    return Err(EngineError::InvalidSetting {
                        name: "BURNRATE_HEARTBEAT_SECS",
                        value: raw,
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_HEARTBEAT,
        };

        Ok(Self {
            world_path,
            server: ServerConfig { host, port },
            heartbeat,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.world_path, PathBuf::from("universe.yaml"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.heartbeat, Duration::from_secs(60));
    }

    #[test]
    fn overrides_are_applied() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("BURNRATE_CONFIG", "/etc/burnrate/world.yaml"),
            ("BURNRATE_HOST", "127.0.0.1"),
            ("BURNRATE_PORT", "9000"),
            ("BURNRATE_HEARTBEAT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.world_path, PathBuf::from("/etc/burnrate/world.yaml"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.heartbeat, Duration::from_secs(5));
    }

    #[test]
    fn bad_port_is_rejected() {
        let result = EngineConfig::from_lookup(lookup(&[("BURNRATE_PORT", "80000")]));
        assert!(matches!(
            result,
            Err(EngineError::InvalidSetting {
                name: "BURNRATE_PORT",
                ..
            })
        ));
    }

    #[test]
    fn zero_heartbeat_is_rejected() {
        let result = EngineConfig::from_lookup(lookup(&[("BURNRATE_HEARTBEAT_SECS", "0")]));
        assert!(matches!(
            result,
            Err(EngineError::InvalidSetting {
                name: "BURNRATE_HEARTBEAT_SECS",
                ..
            })
        ));
    }
}
