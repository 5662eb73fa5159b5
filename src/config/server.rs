//! HTTP listener settings for the web host and the function host.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Longest request budget accepted, in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where the hosts listen and how requests are handled.
///
/// Both binaries bind the same `host`. The web host listens on `port`, the
/// function host on `function_port`, so the two can run side by side on one
/// machine (7071 is the usual local port of a function runtime).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address to bind, e.g. `0.0.0.0` or `::1`
    pub host: String,

    /// Web host port
    pub port: u16,

    /// Function host port
    pub function_port: u16,

    pub environment: Environment,

    /// `EnvFilter` directive for the tracing subscriber
    pub log_level: String,

    /// Budget for one whole request; slower requests are answered with
    /// `408 Request Timeout`.
    pub request_timeout_secs: u64,

    /// Browser origins allowed to call the API, comma-separated. Unset means
    /// no CORS layer at all.
    pub cors_origins: Option<String>,
}

/// Deployment environment; selects the log format.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            function_port: 7071,
            environment: Environment::Development,
            log_level: "info,profile_registration=debug,sqlx=warn".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Listen address of the web host.
    pub fn web_addr(&self) -> Result<SocketAddr, ValidationError> {
        self.bind(self.port)
    }

    /// Listen address of the function host.
    pub fn function_addr(&self) -> Result<SocketAddr, ValidationError> {
        self.bind(self.function_port)
    }

    fn bind(&self, port: u16) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, port))
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Non-blank entries of `cors_origins`.
    pub fn allowed_origins(&self) -> impl Iterator<Item = &str> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bind(self.port)?;
        if self.port == 0 || self.function_port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout {
                max: MAX_REQUEST_TIMEOUT_SECS,
            });
        }
        Ok(())
    }
}
