//! Table store adapters and the table-backed profile store.

pub mod azure;
mod in_memory;
mod postgres;
mod profile_store;

pub use azure::{AzureTableCredentials, AzureTableStore};
pub use in_memory::InMemoryTableStore;
pub use postgres::PgTableStore;
pub use profile_store::TableProfileStore;
