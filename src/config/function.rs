//! Function host configuration

use serde::Deserialize;
use secrecy::{ExposeSecret, Secret};

use super::error::ValidationError;

/// Settings for the standalone function host
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunctionConfig {
    /// Function key callers must present; anonymous when unset
    pub key: Option<Secret<String>>,
}

impl FunctionConfig {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(Secret::new(key.into())),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.key.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.key {
            Some(key) if key.expose_secret().trim().is_empty() => {
                Err(ValidationError::BlankFunctionKey)
            }
            _ => Ok(()),
        }
    }
}
