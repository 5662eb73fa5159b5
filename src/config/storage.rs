//! Storage backend configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which table store the service writes to
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local tables, lost on restart
    #[default]
    Memory,
    Postgres,
    Azure,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub postgres: PostgresStorageConfig,

    #[serde(default)]
    pub azure: AzureStorageConfig,
}

impl StorageConfig {
    /// Validate the settings of the selected backend only
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.backend {
            StorageBackend::Memory => Ok(()),
            StorageBackend::Postgres => self.postgres.validate(),
            StorageBackend::Azure => self.azure.validate(),
        }
    }
}

/// PostgreSQL table store settings
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresStorageConfig {
    /// PostgreSQL connection URL
    #[serde(default)]
    pub url: String,

    /// Maximum connections allowed
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl PostgresStorageConfig {
    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__POSTGRES__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

impl Default for PostgresStorageConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

/// Azure Table Storage settings
///
/// Either `connection_string`, or `account_name` together with `account_key`.
/// A connection string wins when both are given. The key itself is decoded
/// when the credentials are built at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AzureStorageConfig {
    pub connection_string: Option<Secret<String>>,
    pub account_name: Option<String>,
    pub account_key: Option<Secret<String>>,
    /// Table endpoint override, e.g. for the storage emulator
    pub endpoint: Option<String>,
}

impl AzureStorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(ValidationError::InvalidEndpoint);
            }
        }

        if let Some(connection_string) = &self.connection_string {
            let connection_string = connection_string.expose_secret();
            if connection_string.trim().is_empty() {
                return Err(ValidationError::MissingRequired(
                    "STORAGE__AZURE__CONNECTION_STRING",
                ));
            }
            if !connection_string.contains("UseDevelopmentStorage=")
                && !connection_string.contains("AccountName=")
            {
                return Err(ValidationError::InvalidConnectionString(
                    "expected AccountName or UseDevelopmentStorage".to_string(),
                ));
            }
            return Ok(());
        }

        match (&self.account_name, &self.account_key) {
            (Some(name), Some(key))
                if !name.trim().is_empty() && !key.expose_secret().trim().is_empty() =>
            {
                Ok(())
            }
            (None, _) => Err(ValidationError::MissingRequired("STORAGE__AZURE__ACCOUNT_NAME")),
            (Some(name), _) if name.trim().is_empty() => {
                Err(ValidationError::MissingRequired("STORAGE__AZURE__ACCOUNT_NAME"))
            }
            _ => Err(ValidationError::MissingRequired("STORAGE__AZURE__ACCOUNT_KEY")),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}
