//! HTTP handlers for profile endpoints.
//!
//! These handlers connect Axum routes to the shared save/list handlers. The
//! API controller and the function host mount the same functions, so both
//! doors parse and answer identically.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::profile::{
    ListProfilesHandler, ListProfilesQuery, SaveProfileCommand, SaveProfileHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::profile::{Profile, INVALID_PROFILE_MESSAGE};
use crate::ports::ProfileStore;

use super::dto::{
    ErrorResponse, HealthResponse, ListProfilesResponse, ProfileRecordResponse,
    SaveProfileResponse, LIST_FAILED_MESSAGE, SAVE_FAILED_MESSAGE,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for every profile entry point.
///
/// Holds the single long-lived store handle built at startup.
#[derive(Clone)]
pub struct ProfileAppState {
    pub profile_store: Arc<dyn ProfileStore>,
}

impl ProfileAppState {
    pub fn new(profile_store: Arc<dyn ProfileStore>) -> Self {
        Self { profile_store }
    }

    pub fn save_profile_handler(&self) -> SaveProfileHandler {
        SaveProfileHandler::new(self.profile_store.clone())
    }

    pub fn list_profiles_handler(&self) -> ListProfilesHandler {
        ListProfilesHandler::new(self.profile_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/profile/test - Liveness check
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::now())
}

/// POST /api/profile/save - Register a profile from a JSON body
pub async fn save_profile(
    State(state): State<ProfileAppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ProfileApiError> {
    tracing::info!("SaveProfile called");

    let body = std::str::from_utf8(&body).map_err(|_| {
        ProfileApiError::BadRequest(DomainError::new(
            ErrorCode::ValidationFailed,
            INVALID_PROFILE_MESSAGE,
        ))
    })?;
    let profile = Profile::from_json_body(body).map_err(ProfileApiError::BadRequest)?;

    let result = state
        .save_profile_handler()
        .handle(SaveProfileCommand { profile })
        .await
        .map_err(ProfileApiError::SaveFailed)?;

    Ok(Json(SaveProfileResponse::new(result.row_key.to_string())))
}

/// GET /api/profile/all - List every stored profile
pub async fn list_profiles(
    State(state): State<ProfileAppState>,
) -> Result<impl IntoResponse, ProfileApiError> {
    tracing::info!("GetAllProfiles called");

    let result = state
        .list_profiles_handler()
        .handle(ListProfilesQuery)
        .await
        .map_err(ProfileApiError::ListFailed)?;

    let profiles = result
        .profiles
        .iter()
        .map(ProfileRecordResponse::from)
        .collect();

    Ok(Json(ListProfilesResponse::new(profiles)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Failure outcome of a profile endpoint.
#[derive(Debug)]
pub enum ProfileApiError {
    /// The request could not be turned into a profile; the store was not touched.
    BadRequest(DomainError),
    SaveFailed(DomainError),
    ListFailed(DomainError),
}

impl IntoResponse for ProfileApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ProfileApiError::BadRequest(err) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::client(err.message))
            }
            ProfileApiError::SaveFailed(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, ErrorResponse::client(err.message))
            }
            ProfileApiError::SaveFailed(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::server(SAVE_FAILED_MESSAGE, err.message),
            ),
            ProfileApiError::ListFailed(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::server(LIST_FAILED_MESSAGE, err.message),
            ),
        };
        (status, Json(body)).into_response()
    }
}
