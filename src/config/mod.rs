//! Configuration module for the NESPAK backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use rand::{distributions::Alphanumeric, Rng};

/// Which record store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory store seeded with sample records
    Mock,
    /// SQLite database through a connection pool
    Sqlite,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Configuration error raised at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.variable, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Record store backend selection
    pub store_backend: StoreBackend,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// How long a caller waits for a pooled connection
    pub db_acquire_timeout: Duration,
    /// Seed sample records into an empty SQLite store
    pub seed_sample_data: bool,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Dashboard administrator username
    pub admin_username: String,
    /// bcrypt hash of the administrator password
    pub admin_password_hash: Option<String>,
    /// Plain administrator password for local development, hashed at startup
    pub admin_password: Option<String>,
    /// HS256 secret for admin session tokens
    pub token_secret: String,
    pub token_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("NESPAK_STORE_BACKEND").as_deref() {
            None | Some("mock") => StoreBackend::Mock,
            Some("sqlite") => StoreBackend::Sqlite,
            Some(other) => {
                return Err(ConfigError {
                    variable: "NESPAK_STORE_BACKEND",
                    message: format!("expected 'mock' or 'sqlite', got '{}'", other),
                })
            }
        };

        let db_path = lookup("NESPAK_DB_PATH")
            .unwrap_or_else(|| "./data/nespak.sqlite".to_string())
            .into();

        let db_max_connections = parse_or(&lookup, "NESPAK_DB_MAX_CONNECTIONS", 5u32)?;
        let db_acquire_timeout =
            Duration::from_secs(parse_or(&lookup, "NESPAK_DB_ACQUIRE_TIMEOUT_SECS", 10u64)?);
        let seed_sample_data = parse_or(&lookup, "NESPAK_SEED_SAMPLE_DATA", false)?;

        let bind_addr = parse_or(
            &lookup,
            "NESPAK_BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 8080)),
        )?;

        let log_level = lookup("NESPAK_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format = match lookup("NESPAK_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError {
                    variable: "NESPAK_LOG_FORMAT",
                    message: format!("expected 'pretty' or 'json', got '{}'", other),
                })
            }
        };

        let admin_username =
            lookup("NESPAK_ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());
        let admin_password_hash = lookup("NESPAK_ADMIN_PASSWORD_HASH").filter(|h| !h.is_empty());
        let admin_password = lookup("NESPAK_ADMIN_PASSWORD").filter(|p| !p.is_empty());

        let token_secret = lookup("NESPAK_TOKEN_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(generate_secret);
        let token_ttl =
            Duration::from_secs(parse_or(&lookup, "NESPAK_TOKEN_TTL_MINUTES", 60u64)? * 60);

        Ok(Self {
            store_backend,
            db_path,
            db_max_connections,
            db_acquire_timeout,
            seed_sample_data,
            bind_addr,
            log_level,
            log_format,
            admin_username,
            admin_password_hash,
            admin_password,
            token_secret,
            token_ttl,
        })
    }

    /// Whether any admin credential has been configured.
    pub fn has_admin_credential(&self) -> bool {
        self.admin_password_hash.is_some() || self.admin_password.is_some()
    }
}

fn parse_or<F, T>(lookup: &F, variable: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(variable) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            variable,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Per-process signing secret; tokens do not survive a restart without NESPAK_TOKEN_SECRET.
fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
