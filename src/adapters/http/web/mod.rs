//! HTTP adapter for the server-rendered registration form.
//!
//! - `GET /` - Redirect to `/profile`
//! - `GET /profile` - Landing page with flash message
//! - `GET|POST /profile/register` - Registration form
//! - `GET /profile/all` - All profiles

pub mod flash;
pub mod handlers;
pub mod routes;
pub mod views;

pub use routes::web_router;
