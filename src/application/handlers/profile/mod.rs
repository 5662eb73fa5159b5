//! Profile application handlers.
//!
//! The single save/list core shared by every entry point.

mod list_profiles;
mod save_profile;

pub use list_profiles::{ListProfilesHandler, ListProfilesQuery, ListProfilesResult};
pub use save_profile::{SaveProfileCommand, SaveProfileHandler, SaveProfileResult};
