//! ProfileStore port for profile persistence operations

use async_trait::async_trait;

use crate::domain::{foundation::DomainError, profile::ProfileRecord};

/// Data access for profile records.
///
/// There is deliberately no update or delete: records are immutable once
/// inserted.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Ensure the backing table exists. Idempotent.
    async fn ensure_table(&self) -> Result<(), DomainError>;

    /// Write one new record. The record's row key is already assigned.
    async fn insert(&self, record: &ProfileRecord) -> Result<(), DomainError>;

    /// Read every record. A table that does not exist yet reads as empty.
    async fn scan_all(&self) -> Result<Vec<ProfileRecord>, DomainError>;
}
