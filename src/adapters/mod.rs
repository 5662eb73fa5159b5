//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `table` - Table store backends (in-memory, PostgreSQL, Azure) and the
//!   table-backed profile store
//! - `http` - Axum routers for the API, web form and function host
//! - `client` - HTTP client for a running profile service

pub mod client;
pub mod http;
pub mod table;

pub use client::{ClientError, ProfileClient};
pub use table::{
    AzureTableCredentials, AzureTableStore, InMemoryTableStore, PgTableStore, TableProfileStore,
};
