//! Runtime configuration for embedding binaries.
//!
//! Settings come from environment variables so that the same binary can run
//! against a scratch in-memory store or a file-backed one.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging};
use rusqlite::Connection;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "EMPLOYEE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "EMPLOYEE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "EMPLOYEE_LOG_DIR";

/// Store and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// `None` selects a private in-memory store.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// `None` leaves file logging disabled.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV).map(PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging stays disabled.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }

    /// Opens the configured store with migrations applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, CoreConfig::default());
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn values_are_trimmed_and_blank_values_ignored() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, " /tmp/employees.sqlite3 "),
            (LOG_LEVEL_ENV, "   "),
            (LOG_DIR_ENV, "/var/log/employees"),
        ]));

        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/tmp/employees.sqlite3"))
        );
        assert_eq!(config.log_level, CoreConfig::default().log_level);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/employees")));
    }

    #[test]
    fn open_store_uses_file_when_path_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.sqlite3");
        let config = CoreConfig {
            db_path: Some(path.clone()),
            ..CoreConfig::default()
        };

        let conn = config.open_store().unwrap();
        drop(conn);
        assert!(path.exists());
    }
}
