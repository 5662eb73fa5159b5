//! HTTP adapter for the standalone function host.
//!
//! Hosts only the two profile functions, independently deployable from the
//! web host:
//! - `POST /api/profile/save` - SaveProfile
//! - `GET /api/profile/all` - GetAllProfiles
//!
//! Both reuse the API controller's handlers; the only difference is the
//! function-key check in front of them.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{function_key_middleware, FunctionKeyState};
use crate::adapters::http::profile::handlers::{list_profiles, save_profile, ProfileAppState};

/// Create the function routes.
///
/// # Routes
/// - `POST /save` - SaveProfile
/// - `GET /all` - GetAllProfiles
pub fn function_routes() -> Router<ProfileAppState> {
    Router::new()
        .route("/save", post(save_profile))
        .route("/all", get(list_profiles))
}

/// Create the function host router mounted at `/api/profile`, guarded by
/// the function key.
pub fn function_router(keys: FunctionKeyState) -> Router<ProfileAppState> {
    Router::new()
        .nest("/api/profile", function_routes())
        .layer(middleware::from_fn_with_state(keys, function_key_middleware))
}
