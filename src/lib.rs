//! Profile Registration - a small profile-registration service
//!
//! Accepts a person's profile (name, surname, email, age) and stores it in a
//! cloud table store. The same save/list core is exposed through three front
//! doors: a server-rendered web form, a JSON API and a standalone function
//! host.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
