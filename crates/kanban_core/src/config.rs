//! Runtime configuration resolved from `KANBAN_*` environment variables.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - `log_level` is always a normalized level name.

use crate::logging::{default_log_level, normalize_level};
use crate::snapshot::DEFAULT_BLOB_NAME;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "KANBAN_DB_PATH";
pub const ENV_SNAPSHOT_DIR: &str = "KANBAN_SNAPSHOT_DIR";
pub const ENV_LOG_LEVEL: &str = "KANBAN_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "KANBAN_LOG_DIR";
pub const ENV_USER_ID: &str = "KANBAN_USER_ID";

const DEFAULT_DB_FILE_NAME: &str = "kanban_board.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "kanban-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel { value: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel { value, reason } => {
                write!(f, "invalid {ENV_LOG_LEVEL} `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where the board keeps its data and logs, and whom it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// SQLite database backing the networked variant.
    pub db_path: PathBuf,
    /// Directory holding the local variant's JSON blob.
    pub snapshot_dir: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
    /// Owner scoping remote rows; `None` keeps the board local.
    pub user_id: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            db_path: temp.join(DEFAULT_DB_FILE_NAME),
            snapshot_dir: temp.join(DEFAULT_BLOB_NAME),
            log_level: default_log_level(),
            log_dir: temp.join(DEFAULT_LOG_DIR_NAME),
            user_id: None,
        }
    }
}

impl BoardConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, one call per variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = value(ENV_SNAPSHOT_DIR) {
            config.snapshot_dir = PathBuf::from(dir);
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|reason| {
                ConfigError::InvalidLogLevel {
                    value: level.clone(),
                    reason,
                }
            })?;
        }
        config.user_id = value(ENV_USER_ID);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_USER_ID};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = BoardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BoardConfig::default());
        assert!(config.user_id.is_none());
    }

    #[test]
    fn values_are_trimmed_and_blank_values_ignored() {
        let config = BoardConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "  /data/board.sqlite3 "),
            (ENV_USER_ID, "   "),
            (ENV_LOG_LEVEL, " Warning "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/board.sqlite3"));
        assert_eq!(config.user_id, None);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let error = BoardConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidLogLevel { ref value, .. } if value == "loud"));
    }
}
