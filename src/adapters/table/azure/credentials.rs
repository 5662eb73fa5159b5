//! Storage account credentials and SharedKeyLite request signing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

use crate::ports::TableStoreError;

/// Account name of the local storage emulator.
pub const DEVELOPMENT_ACCOUNT_NAME: &str = "devstoreaccount1";

/// Well-known, public key of the local storage emulator.
pub const DEVELOPMENT_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

const DEVELOPMENT_TABLE_ENDPOINT: &str = "http://127.0.0.1:10002/devstoreaccount1";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
const DEFAULT_PROTOCOL: &str = "https";

/// Credentials for one storage account's table service.
#[derive(Debug, Clone)]
pub struct AzureTableCredentials {
    account_name: String,
    account_key: Secret<String>,
    /// Table service base URL without a trailing slash.
    endpoint: String,
}

impl AzureTableCredentials {
    /// Creates credentials from an account name and base64 key.
    ///
    /// Surrounding whitespace in the key is ignored; keys pasted into env
    /// files often carry a trailing newline.
    ///
    /// Without an explicit endpoint the public cloud endpoint
    /// `https://{account}.table.core.windows.net` is used.
    pub fn new(
        account_name: impl Into<String>,
        account_key: impl Into<String>,
        endpoint: Option<&str>,
    ) -> Result<Self, TableStoreError> {
        let account_name = account_name.into();
        if account_name.is_empty() {
            return Err(invalid("account name is empty"));
        }
        let account_key = account_key.into().trim().to_string();
        decode_key(&account_key)?;

        let endpoint = match endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "{}://{}.table.{}",
                DEFAULT_PROTOCOL, account_name, DEFAULT_ENDPOINT_SUFFIX
            ),
        };
        Url::parse(&endpoint).map_err(|e| invalid(&format!("endpoint is not a URL: {}", e)))?;

        Ok(Self {
            account_name,
            account_key: Secret::new(account_key),
            endpoint,
        })
    }

    /// Parses a storage connection string.
    ///
    /// Supports `AccountName`/`AccountKey` with optional
    /// `DefaultEndpointsProtocol`, `EndpointSuffix` and `TableEndpoint`, as
    /// well as `UseDevelopmentStorage=true` for the local emulator.
    pub fn from_connection_string(connection_string: &str) -> Result<Self, TableStoreError> {
        let mut account_name = None;
        let mut account_key = None;
        let mut protocol = DEFAULT_PROTOCOL;
        let mut suffix = DEFAULT_ENDPOINT_SUFFIX;
        let mut table_endpoint = None;
        let mut development = false;

        for part in connection_string.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Only split on the first '=': base64 keys end in '=' padding.
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid(&format!("malformed segment '{}'", part)))?;
            match key {
                "AccountName" => account_name = Some(value),
                "AccountKey" => account_key = Some(value),
                "DefaultEndpointsProtocol" => protocol = value,
                "EndpointSuffix" => suffix = value,
                "TableEndpoint" => table_endpoint = Some(value),
                "UseDevelopmentStorage" => development = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        if development {
            return Self::new(
                DEVELOPMENT_ACCOUNT_NAME,
                DEVELOPMENT_ACCOUNT_KEY,
                Some(table_endpoint.unwrap_or(DEVELOPMENT_TABLE_ENDPOINT)),
            );
        }

        let account_name = account_name.ok_or_else(|| invalid("AccountName is missing"))?;
        let account_key = account_key.ok_or_else(|| invalid("AccountKey is missing"))?;
        let endpoint = table_endpoint
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}://{}.table.{}", protocol, account_name, suffix));

        Self::new(account_name, account_key, Some(&endpoint))
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds `{endpoint}/{resource}`.
    pub fn resource_url(&self, resource: &str) -> Result<Url, TableStoreError> {
        Url::parse(&format!("{}/{}", self.endpoint, resource))
            .map_err(|e| TableStoreError::RequestFailed(format!("invalid resource URL: {}", e)))
    }

    /// Computes the `Authorization` header value for a request.
    ///
    /// SharedKeyLite for the table service signs
    /// `{x-ms-date}\n/{account}{path}` with HMAC-SHA256 under the decoded
    /// account key.
    pub fn authorization(&self, date: &str, url: &Url) -> Result<String, TableStoreError> {
        let mut canonical = format!("/{}{}", self.account_name, url.path());
        if let Some((_, comp)) = url.query_pairs().find(|(k, _)| k == "comp") {
            canonical.push_str("?comp=");
            canonical.push_str(&comp);
        }
        let string_to_sign = format!("{}\n{}", date, canonical);

        let key = decode_key(self.account_key.expose_secret())?;
        let mut mac = Hmac::<Sha256>::new_from_slice(&key)
            .map_err(|e| TableStoreError::RequestFailed(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        Ok(format!("SharedKeyLite {}:{}", self.account_name, signature))
    }
}

fn decode_key(key: &str) -> Result<Vec<u8>, TableStoreError> {
    if key.is_empty() {
        return Err(invalid("account key is empty"));
    }
    BASE64
        .decode(key.as_bytes())
        .map_err(|_| invalid("account key is not valid base64"))
}

fn invalid(reason: &str) -> TableStoreError {
    TableStoreError::RequestFailed(format!("invalid storage credentials: {}", reason))
}
