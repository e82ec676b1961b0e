//! Runtime configuration for parcel tracking entry points.
//!
//! Values come from `PARCEL_*` environment variables; blank values count as
//! unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PARCEL_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PARCEL_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PARCEL_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tracker.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// SQLite database file; created on first open.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Rolling log directory. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TrackerConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config = TrackerConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.db_path, PathBuf::from("tracker.db"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, "/tmp/parcels.db"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/tmp/parcel-logs"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/parcels.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/parcel-logs")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, "   "),
            (LOG_DIR_ENV, ""),
        ]));
        assert_eq!(config.db_path, PathBuf::from("tracker.db"));
        assert!(config.log_dir.is_none());
    }
}
