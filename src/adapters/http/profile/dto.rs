//! HTTP DTOs (Data Transfer Objects) for profile endpoints.
//!
//! These types define the JSON response structure shared by the API
//! controller and the function host. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::profile::ProfileRecord;

pub const API_WORKING_MESSAGE: &str = "API is working!";
pub const PROFILE_SAVED_MESSAGE: &str = "Profile saved successfully";
pub const PROFILES_RETRIEVED_MESSAGE: &str = "Profiles retrieved successfully";
pub const SAVE_FAILED_MESSAGE: &str = "An error occurred while saving the profile";
pub const LIST_FAILED_MESSAGE: &str = "An error occurred while retrieving profiles";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for `GET /test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// Server time (ISO 8601).
    pub timestamp: String,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            success: true,
            message: API_WORKING_MESSAGE.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }
}

/// Response for a successful save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileResponse {
    pub success: bool,
    pub message: String,
    pub row_key: String,
}

impl SaveProfileResponse {
    pub fn new(row_key: impl Into<String>) -> Self {
        Self {
            success: true,
            message: PROFILE_SAVED_MESSAGE.to_string(),
            row_key: row_key.into(),
        }
    }
}

/// Response for a successful listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProfilesResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub profiles: Vec<ProfileRecordResponse>,
}

impl ListProfilesResponse {
    pub fn new(profiles: Vec<ProfileRecordResponse>) -> Self {
        Self {
            success: true,
            message: PROFILES_RETRIEVED_MESSAGE.to_string(),
            count: profiles.len(),
            profiles,
        }
    }
}

/// One stored profile with its storage metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecordResponse {
    pub partition_key: String,
    pub row_key: String,
    /// Backend write time (ISO 8601), absent if the backend reported none.
    pub timestamp: Option<String>,
    #[serde(rename = "eTag")]
    pub e_tag: Option<String>,
    /// When the record was built (ISO 8601).
    pub created_date: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub age: String,
}

impl From<&ProfileRecord> for ProfileRecordResponse {
    fn from(record: &ProfileRecord) -> Self {
        let profile = record.profile();
        Self {
            partition_key: record.partition_key().to_string(),
            row_key: record.row_key().to_string(),
            timestamp: record.timestamp().map(|t| t.to_rfc3339()),
            e_tag: record.etag().map(str::to_string),
            created_date: record.created_date().to_rfc3339(),
            name: profile.name.clone(),
            surname: profile.surname.clone(),
            email: profile.email.clone(),
            age: profile.age.clone(),
        }
    }
}

/// Failure body: `{success: false, message, error?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Underlying error text, only for server-side failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    pub fn server(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
        }
    }
}
