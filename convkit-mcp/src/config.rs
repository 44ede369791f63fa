//! Server configuration from the environment

use std::env;

use convkit_core::{DEFAULT_DECIMALS, MAX_DECIMALS};
use tracing::warn;

const DEFAULT_HISTORY_LIMIT: usize = 50;
const DEFAULT_FAVORITES_LIMIT: usize = 100;

/// Tunables read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Decimal places in result text (`CONVKIT_DECIMALS`)
    pub decimals: usize,
    /// History entries kept per session (`CONVKIT_HISTORY_LIMIT`)
    pub history_limit: usize,
    /// Favorites allowed per session (`CONVKIT_FAVORITES_LIMIT`)
    pub favorites_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            favorites_limit: DEFAULT_FAVORITES_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; bad values fall back to defaults with a warning
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            decimals: read_usize(&lookup, "CONVKIT_DECIMALS", defaults.decimals)
                .min(MAX_DECIMALS),
            history_limit: read_usize(&lookup, "CONVKIT_HISTORY_LIMIT", defaults.history_limit),
            favorites_limit: read_usize(
                &lookup,
                "CONVKIT_FAVORITES_LIMIT",
                defaults.favorites_limit,
            ),
        }
    }
}

fn read_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, default, "ignoring unparseable setting");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]), ServerConfig::default());
        assert_eq!(ServerConfig::default().decimals, 2);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CONVKIT_DECIMALS", "4"),
            ("CONVKIT_HISTORY_LIMIT", " 10 "),
            ("CONVKIT_FAVORITES_LIMIT", "3"),
        ]);
        assert_eq!(config.decimals, 4);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.favorites_limit, 3);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[("CONVKIT_DECIMALS", "two"), ("CONVKIT_HISTORY_LIMIT", "-1")]);
        assert_eq!(config.decimals, 2);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn test_decimals_clamped() {
        let config = config_from(&[("CONVKIT_DECIMALS", "99")]);
        assert_eq!(config.decimals, MAX_DECIMALS);
    }
}
