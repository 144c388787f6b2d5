//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path, autosave debounce window and log settings.
//! - Reject malformed values instead of silently guessing.
//!
//! # Invariants
//! - Unset variables fall back to documented defaults.
//! - Blank values are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use crate::service::debounce::DEFAULT_DEBOUNCE;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_PATH_ENV: &str = "PLANNER_DB_PATH";
pub const DEBOUNCE_MS_ENV: &str = "PLANNER_DEBOUNCE_MS";
pub const LOG_LEVEL_ENV: &str = "PLANNER_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PLANNER_LOG_DIR";

/// Database file name used when `PLANNER_DB_PATH` is unset.
pub const DEFAULT_DB_FILE_NAME: &str = "planner.sqlite3";
const MAX_DEBOUNCE_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDebounce(String),
    InvalidLogLevel(String),
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDebounce(value) => write!(
                f,
                "{DEBOUNCE_MS_ENV} must be an integer within 0..={MAX_DEBOUNCE_MS}, got `{value}`"
            ),
            Self::InvalidLogLevel(details) => write!(f, "{LOG_LEVEL_ENV}: {details}"),
            Self::RelativeLogDir(value) => {
                write!(f, "{LOG_DIR_ENV} must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub db_path: PathBuf,
    pub debounce: Duration,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            debounce: DEFAULT_DEBOUNCE,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl PlannerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = read(DEBOUNCE_MS_ENV) {
            let millis = raw
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis <= MAX_DEBOUNCE_MS)
                .ok_or(ConfigError::InvalidDebounce(raw))?;
            config.debounce = Duration::from_millis(millis);
        }

        if let Some(raw) = read(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?;
        }

        if let Some(raw) = read(LOG_DIR_ENV) {
            if !Path::new(&raw).is_absolute() {
                return Err(ConfigError::RelativeLogDir(raw));
            }
            config.log_dir = Some(PathBuf::from(raw));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, PlannerConfig, DB_PATH_ENV, DEBOUNCE_MS_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn resolve(vars: &[(&str, &str)]) -> Result<PlannerConfig, ConfigError> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        PlannerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn unset_and_blank_values_use_defaults() {
        let config = resolve(&[(DB_PATH_ENV, "   ")]).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.debounce, Duration::from_millis(500));
    }

    #[test]
    fn explicit_values_are_applied() {
        let log_dir = std::env::temp_dir().join("planner-logs");
        let log_dir_str = log_dir.to_str().unwrap().to_string();
        let config = resolve(&[
            (DB_PATH_ENV, "/tmp/planner-test.sqlite3"),
            (DEBOUNCE_MS_ENV, "250"),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, log_dir_str.as_str()),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/planner-test.sqlite3"));
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            resolve(&[(DEBOUNCE_MS_ENV, "soon")]),
            Err(ConfigError::InvalidDebounce(_))
        ));
        assert!(matches!(
            resolve(&[(DEBOUNCE_MS_ENV, "600000")]),
            Err(ConfigError::InvalidDebounce(_))
        ));
        assert!(matches!(
            resolve(&[(LOG_LEVEL_ENV, "verbose")]),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            resolve(&[(LOG_DIR_ENV, "logs/dev")]),
            Err(ConfigError::RelativeLogDir(_))
        ));
    }
}
