//! Deficiencia service configuration.
//!
//! Configuration is loaded from environment variables. The database URL is
//! redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default maximum pool size.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Default minimum pool size.
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;

/// Default time to wait for a pooled connection, in seconds.
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECONDS: u64 = 5;

/// Default per-request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default graceful shutdown drain period, in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 30;

/// Deficiencia service configuration.
///
/// Database URL is redacted in Debug output to prevent credential leakage.
#[derive(Clone)]
pub struct Config {
    /// MySQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound on pooled connections.
    pub db_max_connections: u32,

    /// Connections kept open while idle.
    pub db_min_connections: u32,

    /// How long a request waits for a pooled connection.
    pub db_acquire_timeout_seconds: u64,

    /// Requests running longer than this are aborted with 408.
    pub request_timeout_seconds: u64,

    /// Seconds to keep draining after a shutdown signal. Zero skips the drain.
    pub drain_seconds: u64,

    /// Emit JSON-formatted logs (`LOG_FORMAT=json`).
    pub log_json: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field(
                "db_acquire_timeout_seconds",
                &self.db_acquire_timeout_seconds,
            )
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("drain_seconds", &self.drain_seconds)
            .field("log_json", &self.log_json)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid database pool configuration: {0}")]
    InvalidPool(String),

    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let db_max_connections = parse_positive(
            vars,
            "DB_MAX_CONNECTIONS",
            DEFAULT_DB_MAX_CONNECTIONS,
            ConfigError::InvalidPool,
        )?;

        let db_min_connections = if let Some(value_str) = vars.get("DB_MIN_CONNECTIONS") {
            value_str.parse::<u32>().map_err(|e| {
                ConfigError::InvalidPool(format!(
                    "DB_MIN_CONNECTIONS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_DB_MIN_CONNECTIONS.min(db_max_connections)
        };

        if db_min_connections > db_max_connections {
            return Err(ConfigError::InvalidPool(format!(
                "DB_MIN_CONNECTIONS ({}) must not exceed DB_MAX_CONNECTIONS ({})",
                db_min_connections, db_max_connections
            )));
        }

        let db_acquire_timeout_seconds = parse_positive(
            vars,
            "DB_ACQUIRE_TIMEOUT_SECONDS",
            DEFAULT_DB_ACQUIRE_TIMEOUT_SECONDS,
            ConfigError::InvalidTimeout,
        )?;

        let request_timeout_seconds = parse_positive(
            vars,
            "REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
            ConfigError::InvalidTimeout,
        )?;

        // Zero is allowed here: it disables the drain period
        let drain_seconds = if let Some(value_str) = vars.get("DRAIN_SECONDS") {
            value_str.parse::<u64>().map_err(|e| {
                ConfigError::InvalidTimeout(format!(
                    "DRAIN_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_DRAIN_SECONDS
        };

        let log_json = vars
            .get("LOG_FORMAT")
            .is_some_and(|format| format.eq_ignore_ascii_case("json"));

        Ok(Config {
            database_url,
            bind_address,
            db_max_connections,
            db_min_connections,
            db_acquire_timeout_seconds,
            request_timeout_seconds,
            drain_seconds,
            log_json,
        })
    }
}

/// Parse an optional strictly positive integer variable.
fn parse_positive<T>(
    vars: &HashMap<String, String>,
    name: &str,
    default: T,
    make_err: fn(String) -> ConfigError,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: fmt::Display,
{
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    let value: T = value_str.parse().map_err(|e| {
        make_err(format!(
            "{} must be a valid positive integer, got '{}': {}",
            name, value_str, e
        ))
    })?;

    if value == T::default() {
        return Err(make_err(format!("{} must be greater than 0", name)));
    }

    Ok(value)
}
