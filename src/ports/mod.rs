//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TableStore` - Generic table service client (create, insert, scan)
//! - `ProfileStore` - Profile data access built on a table store

mod profile_store;
mod table_store;

pub use profile_store::ProfileStore;
pub use table_store::{TableEntity, TableName, TableStore, TableStoreError};
