//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default SQLite file used when no Postgres connection is configured
pub const DEFAULT_SQLITE_PATH: &str = "db.sqlite";

/// Where todo items are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// Remote Postgres server
    Postgres {
        host: String,
        port: u16,
        name: String,
        user: String,
        password: String,
    },
    /// Local SQLite file
    Sqlite { path: String },
}

impl DatabaseConfig {
    /// Picks Postgres only when every DB_* variable is present and non-empty;
    /// any gap falls back to the local SQLite file.
    pub fn from_env() -> Self {
        let host = non_empty_var("DB_HOST");
        let port = non_empty_var("DB_PORT").and_then(|v| v.parse().ok());
        let name = non_empty_var("DB_NAME");
        let user = non_empty_var("DB_USER");
        let password = non_empty_var("DB_PASSWORD");

        match (host, port, name, user, password) {
            (Some(host), Some(port), Some(name), Some(user), Some(password)) => {
                DatabaseConfig::Postgres {
                    host,
                    port,
                    name,
                    user,
                    password,
                }
            }
            _ => DatabaseConfig::Sqlite {
                path: non_empty_var("SQLITE_PATH")
                    .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string()),
            },
        }
    }

    /// Short label for logs, never including credentials.
    pub fn describe(&self) -> String {
        match self {
            DatabaseConfig::Postgres {
                host, port, name, ..
            } => format!("postgres://{}:{}/{}", host, port, name),
            DatabaseConfig::Sqlite { path } => format!("sqlite://{}", path),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Sqlite {
            path: DEFAULT_SQLITE_PATH.to_string(),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Persistence backend
    pub database: DatabaseConfig,
    /// Verbose logging
    pub debug: bool,
    /// Lifetime of cached list snapshots in seconds
    pub cache_ttl: u64,
    /// Minimum seconds between two janitor sweeps
    pub sweep_interval: u64,
    /// Requests allowed per client per minute
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD` - Postgres
    ///   connection; all five required, otherwise SQLite is used
    /// - `SQLITE_PATH` - SQLite file (default: db.sqlite)
    /// - `DEBUG` - "True", "true" or "1" enables debug logging
    /// - `CACHE_TTL` - Snapshot TTL in seconds (default: 3600)
    /// - `SWEEP_INTERVAL` - Janitor threshold in seconds (default: 30)
    /// - `RATE_LIMIT_PER_MINUTE` - Per-client budget (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            database: DatabaseConfig::from_env(),
            debug: env::var("DEBUG")
                .map(|v| matches!(v.as_str(), "True" | "true" | "1"))
                .unwrap_or(false),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            // A zero budget would reject every request
            rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE")
                .filter(|&limit: &u32| limit > 0)
                .unwrap_or(defaults.rate_limit_per_minute),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    /// Default tracing filter when RUST_LOG is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "todo_cache=debug,tower_http=debug,sqlx=info"
        } else {
            "todo_cache=info,tower_http=info"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            database: DatabaseConfig::default(),
            debug: false,
            cache_ttl: 3600,
            sweep_interval: 30,
            rate_limit_per_minute: 100,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
