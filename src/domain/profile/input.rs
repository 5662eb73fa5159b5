//! Parsing of inbound profile payloads.
//!
//! Every entry point turns its raw request body into a [`Profile`] through
//! these functions, so the accepted shapes and the error messages are the
//! same no matter which door a request came through.

use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode};

use super::Profile;

pub const EMPTY_BODY_MESSAGE: &str = "Request body is empty";
pub const INVALID_PROFILE_MESSAGE: &str = "Invalid profile data";

impl Profile {
    /// Parses a JSON request body.
    ///
    /// Field names match case-insensitively. Missing or `null` fields become
    /// empty strings and scalar values are kept as their text form.
    ///
    /// # Errors
    ///
    /// - `EmptyBody` when the body is blank
    /// - `ValidationFailed` for `null`, non-object or malformed JSON, and
    ///   for array/object field values
    pub fn from_json_body(body: &str) -> Result<Self, DomainError> {
        if body.trim().is_empty() {
            return Err(DomainError::new(ErrorCode::EmptyBody, EMPTY_BODY_MESSAGE));
        }

        let value: Value = serde_json::from_str(body).map_err(|e| {
            DomainError::new(ErrorCode::ValidationFailed, INVALID_PROFILE_MESSAGE)
                .with_detail("reason", e.to_string())
        })?;

        let Value::Object(fields) = value else {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                INVALID_PROFILE_MESSAGE,
            ));
        };

        let mut profile = Profile::default();
        for (key, value) in fields {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(DomainError::validation(key, INVALID_PROFILE_MESSAGE));
                }
            };
            profile.set_field(&key, text);
        }
        Ok(profile)
    }

    /// Parses an `application/x-www-form-urlencoded` body.
    pub fn from_form_body(body: &str) -> Result<Self, DomainError> {
        if body.trim().is_empty() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                INVALID_PROFILE_MESSAGE,
            ));
        }

        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body).map_err(|e| {
            DomainError::new(ErrorCode::ValidationFailed, INVALID_PROFILE_MESSAGE)
                .with_detail("reason", e.to_string())
        })?;

        let mut profile = Profile::default();
        for (key, value) in pairs {
            profile.set_field(&key, value);
        }
        Ok(profile)
    }
}
