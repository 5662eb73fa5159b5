//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, timestamps, errors)
//! - `profile` - The registration profile and its stored record

pub mod foundation;
pub mod profile;
