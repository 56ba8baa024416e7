//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BIOCOACH_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use biocoach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}:{}", config.server.host, config.server.port);
//! ```

mod cache;
mod error;
mod ingest;
mod server;
mod store;

pub use cache::CacheConfig;
pub use error::{ConfigError, ValidationError};
pub use ingest::IngestConfig;
pub use server::{Environment, ServerConfig};
pub use store::{StoreConfig, StoreKind};

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the biocoach service.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Profile store configuration (backend selection, retries)
    #[serde(default)]
    pub store: StoreConfig,

    /// Profile cache configuration (TTL)
    #[serde(default)]
    pub cache: CacheConfig,

    /// Biometric ingestion configuration (heartbeat, channels)
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BIOCOACH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `BIOCOACH__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `BIOCOACH__STORE__KIND=postgres` -> `store.kind = postgres`
    /// - `BIOCOACH__STORE__DATABASE_URL=...` -> `store.database_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BIOCOACH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.store.validate()?;
        self.cache.validate()?;
        self.ingest.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
