//! Profile module - the registration value object and its stored form.

mod input;
#[allow(clippy::module_inception)]
mod profile;
mod record;

pub use input::{EMPTY_BODY_MESSAGE, INVALID_PROFILE_MESSAGE};
pub use profile::Profile;
pub use record::{ProfileRecord, PROFILES_TABLE, PROFILE_PARTITION_KEY};
