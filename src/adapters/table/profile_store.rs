//! ProfileStore implementation over any TableStore.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, RowKey, Timestamp};
use crate::domain::profile::{Profile, ProfileRecord, PROFILES_TABLE, PROFILE_PARTITION_KEY};
use crate::ports::{ProfileStore, TableEntity, TableName, TableStore, TableStoreError};

const NAME: &str = "Name";
const SURNAME: &str = "Surname";
const EMAIL: &str = "Email";
const AGE: &str = "Age";
const CREATED_DATE: &str = "CreatedDate";

/// Maps profile records onto the `Profiles` table of a table store.
#[derive(Clone)]
pub struct TableProfileStore {
    tables: Arc<dyn TableStore>,
    table: TableName,
}

impl TableProfileStore {
    pub fn new(tables: Arc<dyn TableStore>) -> Result<Self, DomainError> {
        Ok(Self {
            tables,
            table: TableName::new(PROFILES_TABLE)?,
        })
    }

    /// Convert a record to a table entity
    fn to_entity(record: &ProfileRecord) -> TableEntity {
        let profile = record.profile();
        TableEntity::new(record.partition_key(), record.row_key().as_str())
            .with_property(NAME, profile.name.clone())
            .with_property(SURNAME, profile.surname.clone())
            .with_property(EMAIL, profile.email.clone())
            .with_property(AGE, profile.age.clone())
            .with_datetime_property(CREATED_DATE, record.created_date())
    }

    /// Build a record from a table entity
    ///
    /// Rows written by other tools may lack properties; those read as empty
    /// strings. A missing `CreatedDate` falls back to the backend timestamp.
    /// The caller has already checked the partition.
    fn from_entity(entity: TableEntity) -> ProfileRecord {
        let text = |name: &str| entity.property_str(name).unwrap_or_default().to_string();
        let profile = Profile::new(text(NAME), text(SURNAME), text(EMAIL), text(AGE));

        let created_date = entity
            .property_str(CREATED_DATE)
            .and_then(Timestamp::parse_rfc3339)
            .or(entity.timestamp)
            .unwrap_or_else(Timestamp::epoch);

        ProfileRecord::from_stored(
            profile,
            RowKey::from_stored(entity.row_key),
            created_date,
            entity.timestamp,
            entity.etag,
        )
    }

    /// Profiles only live in their own partition; anything else sharing the
    /// table belongs to another writer.
    fn in_profile_partition(entity: &TableEntity) -> bool {
        if entity.partition_key == PROFILE_PARTITION_KEY {
            return true;
        }
        tracing::warn!(
            partition_key = %entity.partition_key,
            row_key = %entity.row_key,
            "Skipping row outside the profile partition"
        );
        false
    }
}

#[async_trait]
impl ProfileStore for TableProfileStore {
    async fn ensure_table(&self) -> Result<(), DomainError> {
        self.tables.create_table_if_not_exists(&self.table).await?;
        Ok(())
    }

    async fn insert(&self, record: &ProfileRecord) -> Result<(), DomainError> {
        self.tables
            .add_entity(&self.table, &Self::to_entity(record))
            .await?;
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<ProfileRecord>, DomainError> {
        let entities = match self.tables.query_entities(&self.table).await {
            Ok(entities) => entities,
            Err(TableStoreError::TableNotFound(_)) => {
                tracing::warn!(table = %self.table, "Profiles table does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(entities
            .into_iter()
            .filter(Self::in_profile_partition)
            .map(Self::from_entity)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::table::InMemoryTableStore;
    use crate::domain::foundation::ErrorCode;

    fn store() -> (TableProfileStore, InMemoryTableStore) {
        let tables = InMemoryTableStore::new();
        let store = TableProfileStore::new(Arc::new(tables.clone())).unwrap();
        (store, tables)
    }

    fn john() -> Profile {
        Profile::new("John", "Doe", "john.doe@example.com", "30")
    }

    #[tokio::test]
    async fn insert_then_scan_returns_record() {
        let (store, _) = store();
        let record = ProfileRecord::new(john());

        store.ensure_table().await.unwrap();
        store.insert(&record).await.unwrap();

        let records = store.scan_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].profile(), &john());
        assert_eq!(records[0].row_key(), record.row_key());
        assert_eq!(records[0].partition_key(), PROFILE_PARTITION_KEY);
        assert!(records[0].timestamp().is_some());
        assert!(records[0].etag().is_some());
    }

    #[tokio::test]
    async fn created_date_survives_round_trip_at_millisecond_precision() {
        let (store, _) = store();
        let record = ProfileRecord::new(john());
        store.ensure_table().await.unwrap();
        store.insert(&record).await.unwrap();

        let stored = &store.scan_all().await.unwrap()[0];
        assert_eq!(
            stored.created_date().to_rfc3339(),
            record.created_date().to_rfc3339()
        );
    }

    #[tokio::test]
    async fn scan_without_table_is_empty() {
        let (store, tables) = store();
        assert!(store.scan_all().await.unwrap().is_empty());
        assert_eq!(tables.table_count().await, 0);
    }

    #[tokio::test]
    async fn ensure_table_twice_creates_one_table() {
        let (store, tables) = store();
        store.ensure_table().await.unwrap();
        store.ensure_table().await.unwrap();
        assert_eq!(tables.table_count().await, 1);
    }

    #[tokio::test]
    async fn insert_without_table_fails() {
        let (store, _) = store();
        let err = store.insert(&ProfileRecord::new(john())).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let (store, _) = store();
        let record = ProfileRecord::new(john());
        store.ensure_table().await.unwrap();
        store.insert(&record).await.unwrap();

        let err = store.insert(&record).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn sparse_rows_read_with_defaults() {
        let (store, tables) = store();
        let table = TableName::new(PROFILES_TABLE).unwrap();
        tables.create_table_if_not_exists(&table).await.unwrap();
        tables
            .add_entity(
                &table,
                &TableEntity::new("Profile", "legacy-1").with_property(NAME, "Ada"),
            )
            .await
            .unwrap();

        let records = store.scan_all().await.unwrap();
        assert_eq!(records[0].profile(), &Profile::new("Ada", "", "", ""));
        assert_eq!(records[0].row_key().as_str(), "legacy-1");
        assert_eq!(Some(records[0].created_date()), records[0].timestamp());
    }

    #[tokio::test]
    async fn rows_outside_profile_partition_are_skipped() {
        let (store, tables) = store();
        let table = TableName::new(PROFILES_TABLE).unwrap();
        tables.create_table_if_not_exists(&table).await.unwrap();
        tables
            .add_entity(&table, &TableEntity::new("Other", "x1").with_property(NAME, "Eve"))
            .await
            .unwrap();
        store.insert(&ProfileRecord::new(john())).await.unwrap();

        let records = store.scan_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].profile(), &john());
        assert_eq!(tables.entity_count(&table).await, Some(2));
    }

    #[tokio::test]
    async fn empty_row_key_still_lists() {
        let (store, tables) = store();
        let table = TableName::new(PROFILES_TABLE).unwrap();
        tables.create_table_if_not_exists(&table).await.unwrap();
        tables
            .add_entity(&table, &TableEntity::new("Profile", "").with_property(NAME, "Ada"))
            .await
            .unwrap();
        store.insert(&ProfileRecord::new(john())).await.unwrap();

        let records = store.scan_all().await.unwrap();
        assert_eq!(records.len(), 2);
        let blank = records
            .iter()
            .find(|r| r.row_key().as_str().is_empty())
            .unwrap();
        assert_eq!(blank.profile().name, "Ada");
    }

    #[test]
    fn entity_uses_stored_property_names() {
        let record = ProfileRecord::new(john());
        let entity = TableProfileStore::to_entity(&record);

        assert_eq!(entity.partition_key, "Profile");
        assert_eq!(entity.row_key, record.row_key().as_str());
        assert_eq!(entity.property_str("Name"), Some("John"));
        assert_eq!(entity.property_str("Surname"), Some("Doe"));
        assert_eq!(entity.property_str("Email"), Some("john.doe@example.com"));
        assert_eq!(entity.property_str("Age"), Some("30"));
        assert_eq!(
            entity.property_str("CreatedDate"),
            Some(record.created_date().to_rfc3339().as_str())
        );
        assert!(entity.is_datetime_property("CreatedDate"));
        assert!(entity.timestamp.is_none());
    }
}
