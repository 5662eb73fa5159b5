//! In-Memory Table Store Adapter
//!
//! Keeps tables in process memory, ordered by partition key then row key
//! like a real table service. Useful for testing and development.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::Timestamp;
use crate::ports::{TableEntity, TableName, TableStore, TableStoreError};

type Table = BTreeMap<(String, String), TableEntity>;

/// In-memory table store
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableStore {
    tables: Arc<RwLock<HashMap<TableName, Table>>>,
}

impl InMemoryTableStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of tables
    pub async fn table_count(&self) -> usize {
        self.tables.read().await.len()
    }

    /// Get the number of entities in a table, `None` if the table is missing
    pub async fn entity_count(&self, table: &TableName) -> Option<usize> {
        self.tables.read().await.get(table).map(BTreeMap::len)
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn create_table_if_not_exists(&self, table: &TableName) -> Result<(), TableStoreError> {
        self.tables
            .write()
            .await
            .entry(table.clone())
            .or_default();
        Ok(())
    }

    async fn add_entity(
        &self,
        table: &TableName,
        entity: &TableEntity,
    ) -> Result<(), TableStoreError> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| TableStoreError::TableNotFound(table.to_string()))?;

        let key = (entity.partition_key.clone(), entity.row_key.clone());
        if rows.contains_key(&key) {
            return Err(TableStoreError::EntityAlreadyExists {
                partition_key: entity.partition_key.clone(),
                row_key: entity.row_key.clone(),
            });
        }

        let mut stored = entity.clone();
        stored.timestamp = Some(Timestamp::now());
        stored.etag = Some(format!("W/\"{}\"", Uuid::new_v4()));
        rows.insert(key, stored);
        Ok(())
    }

    async fn query_entities(&self, table: &TableName) -> Result<Vec<TableEntity>, TableStoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| TableStoreError::TableNotFound(table.to_string()))?;
        Ok(rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableName {
        TableName::new("Profiles").unwrap()
    }

    #[tokio::test]
    async fn create_table_is_idempotent() {
        let store = InMemoryTableStore::new();
        store.create_table_if_not_exists(&table()).await.unwrap();
        store.create_table_if_not_exists(&table()).await.unwrap();

        assert_eq!(store.table_count().await, 1);
        assert_eq!(store.entity_count(&table()).await, Some(0));
    }

    #[tokio::test]
    async fn create_table_keeps_existing_rows() {
        let store = InMemoryTableStore::new();
        store.create_table_if_not_exists(&table()).await.unwrap();
        store
            .add_entity(&table(), &TableEntity::new("Profile", "1"))
            .await
            .unwrap();
        store.create_table_if_not_exists(&table()).await.unwrap();

        assert_eq!(store.entity_count(&table()).await, Some(1));
    }

    #[tokio::test]
    async fn add_entity_requires_table() {
        let store = InMemoryTableStore::new();
        let result = store.add_entity(&table(), &TableEntity::new("Profile", "1")).await;
        assert!(matches!(result, Err(TableStoreError::TableNotFound(_))));
    }

    #[tokio::test]
    async fn add_entity_rejects_duplicate_keys() {
        let store = InMemoryTableStore::new();
        store.create_table_if_not_exists(&table()).await.unwrap();
        let entity = TableEntity::new("Profile", "1");
        store.add_entity(&table(), &entity).await.unwrap();

        let result = store.add_entity(&table(), &entity).await;
        assert!(matches!(
            result,
            Err(TableStoreError::EntityAlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn add_entity_assigns_backend_metadata() {
        let store = InMemoryTableStore::new();
        store.create_table_if_not_exists(&table()).await.unwrap();
        let entity = TableEntity::new("Profile", "1").with_property("Name", "John");
        store.add_entity(&table(), &entity).await.unwrap();

        let rows = store.query_entities(&table()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].timestamp.is_some());
        assert!(rows[0].etag.is_some());
        assert_eq!(rows[0].property_str("Name"), Some("John"));
    }

    #[tokio::test]
    async fn query_missing_table_reports_not_found() {
        let store = InMemoryTableStore::new();
        let result = store.query_entities(&table()).await;
        assert!(matches!(result, Err(TableStoreError::TableNotFound(_))));
    }

    #[tokio::test]
    async fn query_orders_by_partition_then_row_key() {
        let store = InMemoryTableStore::new();
        store.create_table_if_not_exists(&table()).await.unwrap();
        for (pk, rk) in [("b", "1"), ("a", "2"), ("a", "1")] {
            store
                .add_entity(&table(), &TableEntity::new(pk, rk))
                .await
                .unwrap();
        }

        let keys: Vec<(String, String)> = store
            .query_entities(&table())
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.partition_key, e.row_key))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string()),
                ("b".to_string(), "1".to_string()),
            ]
        );
    }
}
