//! Function-level authorization for the function host.
//!
//! When a function key is configured, every request must present it either
//! as the `code` query parameter or in the `x-functions-key` header. Keys
//! are compared in constant time. Without a configured key the functions
//! are anonymous and the middleware passes everything through.
//!
//! ```text
//! Request → function_key_middleware → key matches? → handler
//!                                   ↘ 401 {success:false, message:"Unauthorized"}
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use crate::adapters::http::profile::dto::{ErrorResponse, UNAUTHORIZED_MESSAGE};
use crate::config::FunctionConfig;

/// Header carrying the function key.
pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";

/// Query parameter carrying the function key.
pub const FUNCTION_KEY_QUERY: &str = "code";

/// Middleware state - the configured key, if any.
#[derive(Clone, Default)]
pub struct FunctionKeyState {
    key: Option<Arc<Secret<String>>>,
}

impl FunctionKeyState {
    pub fn new(config: &FunctionConfig) -> Self {
        Self {
            key: config.key.clone().map(Arc::new),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Checks a presented key against the configured one.
    fn accepts(&self, presented: Option<&str>) -> bool {
        match (&self.key, presented) {
            (None, _) => true,
            (Some(expected), Some(presented)) => expected
                .expose_secret()
                .as_bytes()
                .ct_eq(presented.as_bytes())
                .into(),
            (Some(_), None) => false,
        }
    }
}

/// Rejects requests that do not carry the configured function key.
pub async fn function_key_middleware(
    State(state): State<FunctionKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = presented_key(&request);

    if !state.accepts(presented.as_deref()) {
        tracing::warn!(path = %request.uri().path(), "Rejected request without a valid function key");
        return FunctionKeyRejection.into_response();
    }

    next.run(request).await
}

/// Reads the key from the header first, then from the query string.
fn presented_key(request: &Request) -> Option<String> {
    if let Some(header) = request
        .headers()
        .get(FUNCTION_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        return Some(header.to_string());
    }

    let query = request.uri().query()?;
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(name, _)| name == FUNCTION_KEY_QUERY)
        .map(|(_, value)| value)
}

/// Rejection for a missing or wrong function key.
#[derive(Debug)]
pub struct FunctionKeyRejection;

impl IntoResponse for FunctionKeyRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::client(UNAUTHORIZED_MESSAGE)),
        )
            .into_response()
    }
}
