//! HTTP adapter for the profile JSON API.
//!
//! Exposes the profile core via REST API:
//! - `GET /api/profile/test` - Liveness check
//! - `POST /api/profile/save` - Register a profile
//! - `GET /api/profile/all` - List every stored profile

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{ProfileApiError, ProfileAppState};
pub use routes::{profile_api_router, profile_routes};
