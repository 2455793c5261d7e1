//! Configuration loading — TOML file with environment variable overrides.
//!
//! Every field has a sensible default so the file is optional. Environment
//! variables take precedence over file values.

use std::path::Path;

use serde::Deserialize;

use inventory_app::config::LiveQueryConfig;

use crate::error::StorageError;
use crate::pool::Database;

/// Top-level adapter configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Live-query buffer sizes.
    pub live_query: LiveQueryConfig,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL (e.g. `sqlite:inventory.db` or `sqlite::memory:`).
    pub url: String,
    /// Pool size for file-backed databases; in-memory ones always use one.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:inventory.db?mode=rwc".to_string(),
            max_connections: 4,
        }
    }
}

impl Config {
    /// Configuration for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                ..DatabaseConfig::default()
            },
            live_query: LiveQueryConfig::default(),
        }
    }

    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with(path.as_ref(), |key| std::env::var(key).ok())
    }

    fn load_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("INVENTORY_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(max) = lookup("INVENTORY_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.database.max_connections = max;
        }
        if let Some(capacity) = lookup("INVENTORY_FEED_CAPACITY").and_then(|v| v.parse().ok()) {
            self.live_query.feed_capacity = capacity;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Validation(
                "database url must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be non-zero".to_string(),
            ));
        }
        if self.live_query.feed_capacity == 0 || self.live_query.observer_buffer == 0 {
            return Err(ConfigError::Validation(
                "live query buffers must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Open the database described by this configuration.
    ///
    /// Creates the database file if missing and the `items` table if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or table creation fails.
    pub async fn build(&self) -> Result<Database, StorageError> {
        Database::initialize(&self.database, self.live_query).await
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
