//! HTTP client for a running profile service.
//!
//! Talks to either the web host's API controller or the function host; both
//! expose the same `/api/profile/...` routes. A function key, when given,
//! is sent in the `x-functions-key` header.
//!
//! ```ignore
//! let client = ProfileClient::new("http://localhost:8080")?;
//! let saved = client
//!     .save_profile(&Profile::new("John", "Doe", "john.doe@example.com", "30"))
//!     .await?;
//! println!("stored as {}", saved.row_key);
//! ```

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::http::middleware::FUNCTION_KEY_HEADER;
use crate::adapters::http::profile::dto::{
    ErrorResponse, HealthResponse, ListProfilesResponse, SaveProfileResponse,
};
use crate::domain::profile::Profile;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned by [`ProfileClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Service returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        error: Option<String>,
    },
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the profile endpoints.
pub struct ProfileClient {
    http_client: Client,
    base_url: String,
    function_key: Option<SecretString>,
}

impl ProfileClient {
    /// Create a client for the service at `base_url` (no trailing path).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_client(http_client, base_url)
    }

    /// Create a client on top of an existing reqwest client.
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Configuration(format!(
                "base URL must be http(s): {}",
                base_url
            )));
        }
        Ok(Self {
            http_client,
            base_url,
            function_key: None,
        })
    }

    /// Send a function key with every request.
    pub fn with_function_key(mut self, key: impl Into<String>) -> Self {
        self.function_key = Some(SecretString::new(key.into()));
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/profile/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.function_key {
            Some(key) => request.header(FUNCTION_KEY_HEADER, key.expose_secret().as_str()),
            None => request,
        }
    }

    /// GET /api/profile/test
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .authorize(self.http_client.get(self.url("test")))
            .send()
            .await?;
        decode(response).await
    }

    /// POST /api/profile/save
    pub async fn save_profile(&self, profile: &Profile) -> Result<SaveProfileResponse, ClientError> {
        let response = self
            .authorize(self.http_client.post(self.url("save")))
            .json(profile)
            .send()
            .await?;

        let saved: SaveProfileResponse = decode(response).await?;
        tracing::info!(row_key = %saved.row_key, "Profile saved through service");
        Ok(saved)
    }

    /// GET /api/profile/all
    pub async fn list_profiles(&self) -> Result<ListProfilesResponse, ClientError> {
        let response = self
            .authorize(self.http_client.get(self.url("all")))
            .send()
            .await?;
        decode(response).await
    }
}

/// Decodes a success body, or turns an error body into [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let (message, error) = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => (body.message, body.error),
        Err(_) => (text, None),
    };
    tracing::warn!(status = status.as_u16(), message = %message, "Profile service returned an error");

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
        error,
    })
}
