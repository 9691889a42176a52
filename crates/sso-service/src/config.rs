//! SSO service configuration.
//!
//! Configuration is loaded from environment variables. The database URL is
//! held as a [`SecretString`] so it never shows up in Debug output or logs.

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Default gRPC bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:44044";

/// Default session token TTL in seconds.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Accepted bcrypt work factors.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 10..=14;

/// Default per-request deadline in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 15;

/// Default Postgres statement_timeout in seconds.
pub const DEFAULT_DB_STATEMENT_TIMEOUT_SECONDS: u32 = 5;

/// Default connection pool size.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Logging profile selected by `SSO_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Human-readable output at debug level.
    Local,
    /// JSON output at debug level.
    Dev,
    /// JSON output at info level.
    Prod,
}

impl Environment {
    /// Unknown values fall back to `Prod`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Environment::Local,
            "dev" => Environment::Dev,
            _ => Environment::Prod,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

/// SSO service configuration.
#[derive(Clone)]
pub struct Config {
    /// Postgres URL, held as a secret.
    pub database_url: SecretString,

    /// gRPC server bind address (default: "0.0.0.0:44044").
    pub bind_address: SocketAddr,

    /// Logging profile.
    pub environment: Environment,

    /// Lifetime of minted session tokens.
    pub token_ttl_seconds: u64,

    /// bcrypt work factor used at registration.
    pub bcrypt_cost: u32,

    /// Deadline applied by the gRPC server to every call.
    pub request_timeout_seconds: u64,

    /// Postgres `statement_timeout` appended to the connection URL.
    pub db_statement_timeout_seconds: u32,

    /// Maximum pool size.
    pub db_max_connections: u32,

    /// Apply embedded migrations at start-up.
    pub run_migrations: bool,

    /// Prometheus scrape endpoint. Metrics export is disabled when unset.
    pub metrics_bind_address: Option<SocketAddr>,
}

/// Hand-written so the database URL never reaches logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("environment", &self.environment)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field(
                "db_statement_timeout_seconds",
                &self.db_statement_timeout_seconds,
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("metrics_bind_address", &self.metrics_bind_address)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl ConfigError {
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(vars: &HashMap<String, String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match vars.get(name) {
        Some(value_str) => value_str.trim().parse().map_err(|e| {
            ConfigError::invalid(name, format!("could not parse '{}': {}", value_str, e))
        }),
        None => Ok(default),
    }
}

fn parse_bool(vars: &HashMap<String, String>, name: &str) -> Result<bool, ConfigError> {
    match vars.get(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(ConfigError::invalid(
                name,
                format!("expected a boolean, got '{}'", other),
            )),
        },
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Builds a config from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;
        let database_url = SecretString::from(database_url.clone());

        let default_bind_address: SocketAddr = DEFAULT_BIND_ADDRESS
            .parse()
            .map_err(|e| ConfigError::invalid("BIND_ADDRESS", format!("bad default: {}", e)))?;
        let bind_address = parse_or(vars, "BIND_ADDRESS", default_bind_address)?;

        let environment = vars
            .get("SSO_ENV")
            .map(|v| Environment::parse(v))
            .unwrap_or(Environment::Local);

        let token_ttl_seconds = parse_or(vars, "TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        if token_ttl_seconds == 0 {
            return Err(ConfigError::invalid(
                "TOKEN_TTL_SECONDS",
                "must be greater than 0",
            ));
        }

        let bcrypt_cost = parse_or(vars, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::invalid(
                "BCRYPT_COST",
                format!(
                    "must be between {} and {}, got {}",
                    BCRYPT_COST_RANGE.start(),
                    BCRYPT_COST_RANGE.end(),
                    bcrypt_cost
                ),
            ));
        }

        let request_timeout_seconds = parse_or(
            vars,
            "REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "REQUEST_TIMEOUT_SECONDS",
                "must be greater than 0",
            ));
        }

        let db_statement_timeout_seconds = parse_or(
            vars,
            "DB_STATEMENT_TIMEOUT_SECONDS",
            DEFAULT_DB_STATEMENT_TIMEOUT_SECONDS,
        )?;
        if db_statement_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "DB_STATEMENT_TIMEOUT_SECONDS",
                "must be greater than 0",
            ));
        }

        let db_max_connections =
            parse_or(vars, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::invalid(
                "DB_MAX_CONNECTIONS",
                "must be greater than 0",
            ));
        }

        let run_migrations = parse_bool(vars, "RUN_MIGRATIONS")?;

        let metrics_bind_address = match vars.get("METRICS_BIND_ADDRESS") {
            Some(value_str) if !value_str.trim().is_empty() => {
                Some(value_str.trim().parse::<SocketAddr>().map_err(|e| {
                    ConfigError::invalid(
                        "METRICS_BIND_ADDRESS",
                        format!("could not parse '{}': {}", value_str, e),
                    )
                })?)
            }
            _ => None,
        };

        Ok(Config {
            database_url,
            bind_address,
            environment,
            token_ttl_seconds,
            bcrypt_cost,
            request_timeout_seconds,
            db_statement_timeout_seconds,
            db_max_connections,
            run_migrations,
            metrics_bind_address,
        })
    }
}
