//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PROFILE_REGISTRATION` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use profile_registration::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let addr = config.server.web_addr().expect("Invalid bind address");
//! println!("Server running on {}", addr);
//! ```

mod error;
mod function;
mod server;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use function::FunctionConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{AzureStorageConfig, PostgresStorageConfig, StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a development
/// server on the in-memory store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Table store backend
    #[serde(default)]
    pub storage: StorageConfig,

    /// Function host authorization
    #[serde(default)]
    pub function: FunctionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PROFILE_REGISTRATION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PROFILE_REGISTRATION__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PROFILE_REGISTRATION__SERVER__FUNCTION_PORT=7071` -> `server.function_port = 7071`
    /// - `PROFILE_REGISTRATION__STORAGE__BACKEND=azure` -> `storage.backend = azure`
    /// - `PROFILE_REGISTRATION__STORAGE__AZURE__CONNECTION_STRING=...`
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
                    .prefix("PROFILE_REGISTRATION")
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
    /// Returns `ValidationError` naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.storage.validate()?;
        self.function.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
