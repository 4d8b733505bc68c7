/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and
 * the optional PostgreSQL connection.
 *
 * # Configuration Sources
 *
 * Later sources override earlier ones:
 *
 * 1. Built-in defaults (see [`ServerConfig::default`])
 * 2. A TOML file, when `SCHOOLHUB_CONFIG` names one
 * 3. Environment variables (a `.env` file is loaded by `main`)
 *
 * | Variable                  | Default                  |
 * |---------------------------|--------------------------|
 * | `PORT`                    | 5000                     |
 * | `DATABASE_URL`            | unset (in-memory store)  |
 * | `JWT_SECRET`              | development secret       |
 * | `CORS_ORIGIN`             | `http://localhost:3000`  |
 * | `HEARTBEAT_INTERVAL_SECS` | 30                       |
 * | `MAX_MESSAGE_LENGTH`      | 5000                     |
 * | `RECENT_MESSAGES_LIMIT`   | 10                       |
 * | `TOKEN_TTL_HOURS`         | 720                      |
 *
 * # Error Handling
 *
 * Unreadable files, malformed values and failed validation are reported as
 * [`ConfigError`] and abort startup.
 */

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::backend::messaging::MessagingSettings;
use crate::backend::store::{PgStore, StoreResult};

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_FILE_ENV: &str = "SCHOOLHUB_CONFIG";

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Secret used when `JWT_SECRET` is not configured
pub const DEV_JWT_SECRET: &str = "schoolhub-development-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime configuration of the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// PostgreSQL connection string; the in-memory store is used without one
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Origin allowed by CORS
    pub cors_origin: String,
    pub heartbeat_interval_secs: u64,
    /// Longest accepted message, in characters
    pub max_message_length: usize,
    pub recent_messages_limit: usize,
    pub token_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            heartbeat_interval_secs: 30,
            max_message_length: 5000,
            recent_messages_limit: 10,
            token_ttl_hours: 720,
        }
    }
}

impl ServerConfig {
    /// Load configuration from all sources and validate it
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;

        if config.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("JWT_SECRET not set; using the development secret");
        }
        Ok(config)
    }

    /// Read a TOML file; keys it omits keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Override fields from environment variables that are set
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(port) = env_parse("PORT")? {
            self.port = port;
        }
        if let Some(url) = env_string("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(secret) = env_string("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(origin) = env_string("CORS_ORIGIN") {
            self.cors_origin = origin;
        }
        if let Some(secs) = env_parse("HEARTBEAT_INTERVAL_SECS")? {
            self.heartbeat_interval_secs = secs;
        }
        if let Some(length) = env_parse("MAX_MESSAGE_LENGTH")? {
            self.max_message_length = length;
        }
        if let Some(limit) = env_parse("RECENT_MESSAGES_LIMIT")? {
            self.recent_messages_limit = limit;
        }
        if let Some(hours) = env_parse("TOKEN_TTL_HOURS")? {
            self.token_ttl_hours = hours;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".into()));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "heartbeat_interval_secs must be non-zero".into(),
            ));
        }
        if self.max_message_length == 0 {
            return Err(ConfigError::Invalid(
                "max_message_length must be non-zero".into(),
            ));
        }
        if self.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid("token_ttl_hours must be positive".into()));
        }
        if self.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_TTL_HOURS",
                value: self.token_ttl_hours.to_string(),
            });
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("jwt_secret must not be empty".into()));
        }
        if self.cors_origin != "*" && HeaderValue::from_str(&self.cors_origin).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ORIGIN",
                value: self.cors_origin.clone(),
            });
        }
        Ok(())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }

    pub fn messaging_settings(&self) -> MessagingSettings {
        MessagingSettings {
            max_message_length: self.max_message_length,
            recent_limit: self.recent_messages_limit,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env_string(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Connect to PostgreSQL and apply migrations
///
/// Returns `None` when no database is configured. A configured database that
/// cannot be reached is an error.
pub async fn load_database(config: &ServerConfig) -> StoreResult<Option<PgStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Data is kept in memory and lost on restart.");
        return Ok(None);
    };

    tracing::info!("Connecting to database...");
    let store = PgStore::connect(database_url).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    store.migrate().await?;
    tracing::info!("Database migrations completed successfully");

    Ok(Some(store))
}
