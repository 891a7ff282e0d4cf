//! Application configuration loaded from environment variables.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while reading the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

/// Where repositories keep their data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataAccessMode {
    InMemory,
    Postgres { url: String, max_connections: u32 },
}

impl DataAccessMode {
    pub fn label(&self) -> &'static str {
        match self {
            DataAccessMode::InMemory => "in-memory",
            DataAccessMode::Postgres { .. } => "postgres",
        }
    }
}

/// Which payment gateway the booking service talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMode {
    Simulated,
    External { base_url: String, timeout: Duration },
}

impl PaymentMode {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Simulated => "simulated",
            PaymentMode::External { .. } => "external",
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATA_ACCESS_MODE` — `in-memory` (default) or `postgres` (alias `sql`)
/// - `DATABASE_URL` — required in postgres mode
/// - `DATABASE_MAX_CONNECTIONS` — pool size (default: `5`)
/// - `PAYMENT_MODE` — `simulated` (default) or `external`
/// - `PAYMENT_API_BASE_URL` — required in external mode
/// - `PAYMENT_TIMEOUT_SECS` — payment API timeout (default: `30`)
/// - `SEED_DEMO_DATA` — seed demo data in in-memory mode (default: `true`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub data_access: DataAccessMode,
    pub payment: PaymentMode,
    pub seed_demo_data: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_access = match var("DATA_ACCESS_MODE")
            .map(|m| m.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("in-memory" | "inmemory" | "memory") => DataAccessMode::InMemory,
            Some("postgres" | "sql") => DataAccessMode::Postgres {
                url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5)?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "DATA_ACCESS_MODE",
                    value: other.to_string(),
                });
            }
        };

        let payment = match var("PAYMENT_MODE").map(|m| m.to_ascii_lowercase()).as_deref() {
            None | Some("simulated") => PaymentMode::Simulated,
            Some("external" | "http") => PaymentMode::External {
                base_url: var("PAYMENT_API_BASE_URL")
                    .ok_or(ConfigError::Missing("PAYMENT_API_BASE_URL"))?,
                timeout: Duration::from_secs(parse_or(&var, "PAYMENT_TIMEOUT_SECS", 30)?),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "PAYMENT_MODE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            data_access,
            payment,
            seed_demo_data: parse_or(&var, "SEED_DEMO_DATA", true)?,
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| ConfigError::Invalid { var: key, value }),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            data_access: DataAccessMode::InMemory,
            payment: PaymentMode::Simulated,
            seed_demo_data: true,
        }
    }
}
