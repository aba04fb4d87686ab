//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `TODO_BIND_ADDR` | `127.0.0.1:8000` |
//! | `TODO_DB_PATH` | `todo.sqlite3` (`:memory:` for an in-memory store) |
//! | `TODO_LOG_LEVEL` | `debug` in debug builds, `info` in release builds |
//! | `TODO_LOG_DIR` | `<cwd>/logs` |
//!
//! Relative paths are resolved against the working directory.

use rusqlite::Connection;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use todo_core::db::{open_db, open_db_in_memory, DbResult};
use todo_core::default_log_level;

pub const BIND_ADDR_VAR: &str = "TODO_BIND_ADDR";
pub const DB_PATH_VAR: &str = "TODO_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "TODO_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TODO_LOG_DIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_DB_FILE_NAME: &str = "todo.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "logs";
const IN_MEMORY_DB: &str = ":memory:";

/// Where the todo table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    InMemory,
    File(PathBuf),
}

impl Database {
    /// Opens the database and applies pending migrations.
    pub fn open(&self) -> DbResult<Connection> {
        match self {
            Self::InMemory => open_db_in_memory(),
            Self::File(path) => open_db(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database: Database,
    pub log_level: String,
    /// Always absolute.
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        let cwd = std::env::current_dir()
            .map_err(|err| format!("failed to resolve working directory: {err}"))?;
        Self::from_lookup(|key| std::env::var(key).ok(), &cwd)
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<Self, String> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_text = var(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_text
            .parse::<SocketAddr>()
            .map_err(|err| format!("invalid {BIND_ADDR_VAR} `{bind_text}`: {err}"))?;

        let database = match var(DB_PATH_VAR) {
            Some(value) if value == IN_MEMORY_DB => Database::InMemory,
            Some(value) => Database::File(cwd.join(value)),
            None => Database::File(cwd.join(DEFAULT_DB_FILE_NAME)),
        };

        let log_level = var(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = var(LOG_DIR_VAR)
            .map(|value| cwd.join(value))
            .unwrap_or_else(|| cwd.join(DEFAULT_LOG_DIR_NAME));

        Ok(Self {
            bind_addr,
            database,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Database, ServerConfig};
    use std::collections::HashMap;
    use std::path::Path;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned(), Path::new("/srv/todo"))
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(
            config.database,
            Database::File(Path::new("/srv/todo/todo.sqlite3").to_path_buf())
        );
        assert_eq!(config.log_dir, Path::new("/srv/todo/logs"));
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config(&[
            ("TODO_BIND_ADDR", "0.0.0.0:9000"),
            ("TODO_DB_PATH", ":memory:"),
            ("TODO_LOG_LEVEL", "warn"),
            ("TODO_LOG_DIR", "/var/log/todo"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.database, Database::InMemory);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Path::new("/var/log/todo"));
    }

    #[test]
    fn relative_paths_resolve_against_working_directory() {
        let config = config(&[("TODO_DB_PATH", "data/app.db"), ("TODO_LOG_DIR", "out")]).unwrap();
        assert_eq!(
            config.database,
            Database::File(Path::new("/srv/todo/data/app.db").to_path_buf())
        );
        assert_eq!(config.log_dir, Path::new("/srv/todo/out"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config(&[("TODO_BIND_ADDR", "  ")]).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = config(&[("TODO_BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.contains("TODO_BIND_ADDR"));
    }
}
