//! PostgreSQL adapter for TableStore
//!
//! Each logical table maps to one SQL table keyed by
//! `(partition_key, row_key)`, with entity properties kept in a JSONB
//! column. Table names are validated by [`TableName`], so quoting them as
//! identifiers is safe.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use crate::config::PostgresStorageConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{TableEntity, TableName, TableStore, TableStoreError};

const UNIQUE_VIOLATION: &str = "23505";
const UNDEFINED_TABLE: &str = "42P01";
const DUPLICATE_TABLE: &str = "42P07";

/// PostgreSQL implementation of TableStore
#[derive(Debug, Clone)]
pub struct PgTableStore {
    pool: PgPool,
}

impl PgTableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool from configuration.
    pub async fn connect(config: &PostgresStorageConfig) -> Result<Self, TableStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| TableStoreError::Database(e.to_string()))?;
        Ok(Self::new(pool))
    }
}

fn quoted(table: &TableName) -> String {
    format!("\"{}\"", table.as_str())
}

fn create_table_sql(table: &TableName) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         partition_key TEXT NOT NULL, \
         row_key TEXT NOT NULL, \
         properties JSONB NOT NULL DEFAULT '{{}}'::jsonb, \
         timestamp TIMESTAMPTZ NOT NULL DEFAULT now(), \
         etag TEXT NOT NULL, \
         PRIMARY KEY (partition_key, row_key))",
        quoted(table)
    )
}

fn insert_sql(table: &TableName) -> String {
    format!(
        "INSERT INTO {} (partition_key, row_key, properties, timestamp, etag) \
         VALUES ($1, $2, $3, now(), $4)",
        quoted(table)
    )
}

fn select_all_sql(table: &TableName) -> String {
    format!(
        "SELECT partition_key, row_key, properties, timestamp, etag FROM {} \
         ORDER BY partition_key, row_key",
        quoted(table)
    )
}

fn database_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

fn from_row(row: &PgRow) -> Result<TableEntity, TableStoreError> {
    let decode = |e: sqlx::Error| TableStoreError::Serialization(e.to_string());

    let properties: Json<Map<String, Value>> = row.try_get("properties").map_err(decode)?;
    let timestamp: DateTime<Utc> = row.try_get("timestamp").map_err(decode)?;

    Ok(TableEntity {
        partition_key: row.try_get("partition_key").map_err(decode)?,
        row_key: row.try_get("row_key").map_err(decode)?,
        timestamp: Some(Timestamp::from_datetime(timestamp)),
        etag: Some(row.try_get("etag").map_err(decode)?),
        properties: properties.0,
        datetime_properties: Default::default(),
    })
}

#[async_trait]
impl TableStore for PgTableStore {
    async fn create_table_if_not_exists(&self, table: &TableName) -> Result<(), TableStoreError> {
        match sqlx::query(&create_table_sql(table)).execute(&self.pool).await {
            Ok(_) => Ok(()),
            // Concurrent CREATE TABLE IF NOT EXISTS can still race on the catalog.
            Err(e)
                if matches!(
                    database_code(&e).as_deref(),
                    Some(UNIQUE_VIOLATION) | Some(DUPLICATE_TABLE)
                ) =>
            {
                Ok(())
            }
            Err(e) => Err(TableStoreError::Database(e.to_string())),
        }
    }

    async fn add_entity(
        &self,
        table: &TableName,
        entity: &TableEntity,
    ) -> Result<(), TableStoreError> {
        let etag = format!("W/\"{}\"", Uuid::new_v4());

        sqlx::query(&insert_sql(table))
            .bind(&entity.partition_key)
            .bind(&entity.row_key)
            .bind(Json(&entity.properties))
            .bind(etag)
            .execute(&self.pool)
            .await
            .map_err(|e| match database_code(&e).as_deref() {
                Some(UNDEFINED_TABLE) => TableStoreError::TableNotFound(table.to_string()),
                Some(UNIQUE_VIOLATION) => TableStoreError::EntityAlreadyExists {
                    partition_key: entity.partition_key.clone(),
                    row_key: entity.row_key.clone(),
                },
                _ => TableStoreError::Database(e.to_string()),
            })?;

        Ok(())
    }

    async fn query_entities(&self, table: &TableName) -> Result<Vec<TableEntity>, TableStoreError> {
        let sql = select_all_sql(table);
        let mut rows = sqlx::query(&sql).fetch(&self.pool);
        let mut entities = Vec::new();

        while let Some(row) = rows.try_next().await.map_err(|e| {
            match database_code(&e).as_deref() {
                Some(UNDEFINED_TABLE) => TableStoreError::TableNotFound(table.to_string()),
                _ => TableStoreError::Database(e.to_string()),
            }
        })? {
            entities.push(from_row(&row)?);
        }

        Ok(entities)
    }
}
