//! HTTP adapters - the three front doors of the service.
//!
//! - `profile` - JSON API controller (`/api/profile/...`)
//! - `web` - Server-rendered registration form (`/profile/...`)
//! - `function` - Standalone function host routes, guarded by a function key
//!
//! All three translate requests into calls on the same application handlers.

pub mod function;
pub mod middleware;
pub mod profile;
pub mod web;

// Re-export key types for convenience
pub use function::function_router;
pub use middleware::FunctionKeyState;
pub use profile::{profile_api_router, ProfileAppState};
pub use web::web_router;
