//! TableStore port - the generic wide-column table collaborator.
//!
//! Models the small surface of a cloud table service that the application
//! needs: create a table on demand, add one entity, and read every entity
//! back. Adapters exist for an in-memory map, PostgreSQL and Azure Table
//! Storage.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, ValidationError};

const MIN_TABLE_NAME_LEN: usize = 3;
const MAX_TABLE_NAME_LEN: usize = 63;

/// A validated table name.
///
/// Follows cloud table naming rules: ASCII alphanumerics only, starting
/// with a letter, 3 to 63 characters. These rules also make the name safe to
/// use as a quoted SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::empty_field("table"));
        }
        if !(MIN_TABLE_NAME_LEN..=MAX_TABLE_NAME_LEN).contains(&name.len()) {
            return Err(ValidationError::invalid_length(
                "table",
                MIN_TABLE_NAME_LEN,
                MAX_TABLE_NAME_LEN,
                name.len(),
            ));
        }
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "table",
                "must start with a letter",
            ));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::invalid_format(
                "table",
                "only ASCII letters and digits are allowed",
            ));
        }
        if name.eq_ignore_ascii_case("tables") {
            return Err(ValidationError::invalid_format("table", "name is reserved"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of a table: keys, backend metadata and a bag of properties.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    /// Last-write time, owned by the backend.
    pub timestamp: Option<Timestamp>,
    /// Concurrency tag, owned by the backend.
    pub etag: Option<String>,
    pub properties: Map<String, Value>,
    /// Names of properties holding RFC 3339 date-times rather than text.
    /// Backends with a typed wire format (Azure `Edm.DateTime`) annotate them.
    pub datetime_properties: BTreeSet<String>,
}

impl TableEntity {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            timestamp: None,
            etag: None,
            properties: Map::new(),
            datetime_properties: BTreeSet::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Adds a date-time property, stored as RFC 3339 text.
    pub fn with_datetime_property(mut self, name: impl Into<String>, value: Timestamp) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), value.to_rfc3339().into());
        self.datetime_properties.insert(name);
        self
    }

    pub fn is_datetime_property(&self, name: &str) -> bool {
        self.datetime_properties.contains(name)
    }

    /// Returns a string property, if present and a string.
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str)
    }
}

/// Errors reported by table store adapters.
#[derive(Debug, thiserror::Error)]
pub enum TableStoreError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Entity already exists: {partition_key}/{row_key}")]
    EntityAlreadyExists {
        partition_key: String,
        row_key: String,
    },

    #[error("Storage request failed: {0}")]
    RequestFailed(String),

    #[error("Unexpected storage response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    #[error("Failed to decode entity: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<TableStoreError> for DomainError {
    fn from(err: TableStoreError) -> Self {
        let code = match &err {
            TableStoreError::TableNotFound(_) => ErrorCode::NotFound,
            TableStoreError::EntityAlreadyExists { .. } => ErrorCode::Conflict,
            TableStoreError::Serialization(_) => ErrorCode::InternalError,
            TableStoreError::RequestFailed(_)
            | TableStoreError::UnexpectedResponse { .. }
            | TableStoreError::Database(_) => ErrorCode::DatabaseError,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Port for a table service client.
///
/// Implementations are shared across concurrent requests behind an `Arc`.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Creates the table, succeeding if it already exists.
    async fn create_table_if_not_exists(&self, table: &TableName) -> Result<(), TableStoreError>;

    /// Inserts one entity.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    /// - `EntityAlreadyExists` on a duplicate partition/row key pair
    async fn add_entity(&self, table: &TableName, entity: &TableEntity)
        -> Result<(), TableStoreError>;

    /// Returns every entity in the table, in backend order.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    async fn query_entities(&self, table: &TableName) -> Result<Vec<TableEntity>, TableStoreError>;
}
