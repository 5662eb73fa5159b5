//! Azure Table Storage adapter for TableStore
//!
//! Talks to the table service REST API directly with reqwest, signing each
//! request with SharedKeyLite. Works against the public cloud and the local
//! storage emulator.
//!
//! # Protocol notes
//!
//! - `POST /Tables` creates a table; `409 Conflict` means it already exists
//! - `POST /{table}` inserts; `409` is a duplicate key, `404` a missing table
//! - Date-time properties carry an `@odata.type: Edm.DateTime` annotation
//! - `GET /{table}()` queries; large results are paged through the
//!   `x-ms-continuation-NextPartitionKey` / `NextRowKey` headers

mod credentials;

pub use credentials::{AzureTableCredentials, DEVELOPMENT_ACCOUNT_KEY, DEVELOPMENT_ACCOUNT_NAME};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::ports::{TableEntity, TableName, TableStore, TableStoreError};

const API_VERSION: &str = "2019-02-02";
const JSON_MINIMAL_METADATA: &str = "application/json;odata=minimalmetadata";
const NEXT_PARTITION_KEY_HEADER: &str = "x-ms-continuation-NextPartitionKey";
const NEXT_ROW_KEY_HEADER: &str = "x-ms-continuation-NextRowKey";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ODATA_TYPE_SUFFIX: &str = "@odata.type";
const EDM_DATETIME: &str = "Edm.DateTime";

/// Table service client for one storage account.
#[derive(Debug, Clone)]
pub struct AzureTableStore {
    http: Client,
    credentials: AzureTableCredentials,
}

impl AzureTableStore {
    pub fn new(credentials: AzureTableCredentials) -> Result<Self, TableStoreError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| TableStoreError::RequestFailed(e.to_string()))?;
        Ok(Self::with_client(http, credentials))
    }

    pub fn with_client(http: Client, credentials: AzureTableCredentials) -> Self {
        Self { http, credentials }
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, TableStoreError> {
        let date = Timestamp::now().to_rfc1123();
        let authorization = self.credentials.authorization(&date, &url)?;

        Ok(self
            .http
            .request(method, url)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .header("DataServiceVersion", "3.0;NetFx")
            .header("MaxDataServiceVersion", "3.0;NetFx")
            .header(ACCEPT, JSON_MINIMAL_METADATA)
            .header(AUTHORIZATION, authorization))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, TableStoreError> {
        builder
            .send()
            .await
            .map_err(|e| TableStoreError::RequestFailed(e.to_string()))
    }
}

#[async_trait]
impl TableStore for AzureTableStore {
    async fn create_table_if_not_exists(&self, table: &TableName) -> Result<(), TableStoreError> {
        let url = self.credentials.resource_url("Tables")?;
        let body = json!({ "TableName": table.as_str() });

        let response = self
            .send(
                self.request(Method::POST, url)?
                    .header(CONTENT_TYPE, "application/json")
                    .header("Prefer", "return-no-content")
                    .body(body.to_string()),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => {
                tracing::debug!(table = %table, "Table already exists");
                Ok(())
            }
            _ => Err(unexpected(response).await),
        }
    }

    async fn add_entity(
        &self,
        table: &TableName,
        entity: &TableEntity,
    ) -> Result<(), TableStoreError> {
        let url = self.credentials.resource_url(table.as_str())?;

        let response = self
            .send(
                self.request(Method::POST, url)?
                    .header(CONTENT_TYPE, "application/json")
                    .header("Prefer", "return-no-content")
                    .body(entity_to_json(entity).to_string()),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(TableStoreError::TableNotFound(table.to_string())),
            StatusCode::CONFLICT => Err(TableStoreError::EntityAlreadyExists {
                partition_key: entity.partition_key.clone(),
                row_key: entity.row_key.clone(),
            }),
            _ => Err(unexpected(response).await),
        }
    }

    async fn query_entities(&self, table: &TableName) -> Result<Vec<TableEntity>, TableStoreError> {
        let mut entities = Vec::new();
        let mut continuation: Option<(String, Option<String>)> = None;

        loop {
            let mut url = self.credentials.resource_url(&format!("{}()", table.as_str()))?;
            if let Some((next_partition, next_row)) = &continuation {
                let mut query = url.query_pairs_mut();
                query.append_pair("NextPartitionKey", next_partition);
                if let Some(next_row) = next_row {
                    query.append_pair("NextRowKey", next_row);
                }
            }

            let response = self.send(self.request(Method::GET, url)?).await?;
            match response.status() {
                status if status.is_success() => {}
                StatusCode::NOT_FOUND => {
                    return Err(TableStoreError::TableNotFound(table.to_string()))
                }
                _ => return Err(unexpected(response).await),
            }

            continuation = continuation_from(response.headers());

            let page: Value = response
                .json()
                .await
                .map_err(|e| TableStoreError::Serialization(e.to_string()))?;
            let rows = page
                .get("value")
                .and_then(Value::as_array)
                .ok_or_else(|| TableStoreError::Serialization("missing 'value' array".into()))?;
            for row in rows {
                entities.push(entity_from_json(row)?);
            }

            if continuation.is_none() {
                break;
            }
        }

        Ok(entities)
    }
}

fn continuation_from(headers: &HeaderMap) -> Option<(String, Option<String>)> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    header(NEXT_PARTITION_KEY_HEADER).map(|partition| (partition, header(NEXT_ROW_KEY_HEADER)))
}

async fn unexpected(response: Response) -> TableStoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    TableStoreError::UnexpectedResponse {
        status,
        message: error_message(&body),
    }
}

/// Extracts `odata.error.message.value` from an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/odata.error/message/value")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn entity_to_json(entity: &TableEntity) -> Value {
    let mut object = Map::new();
    object.insert("PartitionKey".into(), entity.partition_key.clone().into());
    object.insert("RowKey".into(), entity.row_key.clone().into());
    for (name, value) in &entity.properties {
        if entity.is_datetime_property(name) {
            object.insert(format!("{}{}", name, ODATA_TYPE_SUFFIX), EDM_DATETIME.into());
        }
        object.insert(name.clone(), value.clone());
    }
    Value::Object(object)
}

fn entity_from_json(row: &Value) -> Result<TableEntity, TableStoreError> {
    let object = row
        .as_object()
        .ok_or_else(|| TableStoreError::Serialization("entity is not an object".into()))?;

    let key = |name: &str| {
        object
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TableStoreError::Serialization(format!("entity has no {}", name)))
    };

    let mut entity = TableEntity::new(key("PartitionKey")?, key("RowKey")?);
    entity.timestamp = object
        .get("Timestamp")
        .and_then(Value::as_str)
        .and_then(Timestamp::parse_rfc3339);
    entity.etag = object
        .get("odata.etag")
        .and_then(Value::as_str)
        .map(str::to_string);

    for (name, value) in object {
        if let Some(property) = name.strip_suffix(ODATA_TYPE_SUFFIX) {
            if value.as_str() == Some(EDM_DATETIME) {
                entity.datetime_properties.insert(property.to_string());
            }
            continue;
        }
        let reserved = matches!(name.as_str(), "PartitionKey" | "RowKey" | "Timestamp");
        if reserved || name.starts_with("odata.") || name.contains("@odata.") {
            continue;
        }
        entity.properties.insert(name.clone(), value.clone());
    }

    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_json_carries_keys_and_properties() {
        let entity = TableEntity::new("Profile", "abc").with_property("Name", "John");
        let json = entity_to_json(&entity);
        assert_eq!(json["PartitionKey"], "Profile");
        assert_eq!(json["RowKey"], "abc");
        assert_eq!(json["Name"], "John");
        assert!(json.get("Name@odata.type").is_none());
    }

    #[test]
    fn entity_json_types_datetime_properties() {
        let created = Timestamp::parse_rfc3339("2024-01-15T10:29:59Z").unwrap();
        let entity = TableEntity::new("Profile", "abc").with_datetime_property("CreatedDate", created);
        let json = entity_to_json(&entity);

        assert_eq!(json["CreatedDate@odata.type"], "Edm.DateTime");
        assert_eq!(json["CreatedDate"], "2024-01-15T10:29:59.000Z");
    }

    #[test]
    fn entity_from_json_splits_metadata() {
        let row = json!({
            "odata.etag": "W/\"datetime'2024-01-15T10%3A30%3A00.1234567Z'\"",
            "PartitionKey": "Profile",
            "RowKey": "abc",
            "Timestamp": "2024-01-15T10:30:00.1234567Z",
            "Name": "John",
            "CreatedDate@odata.type": "Edm.DateTime",
            "CreatedDate": "2024-01-15T10:29:59Z"
        });
        let entity = entity_from_json(&row).unwrap();

        assert_eq!(entity.partition_key, "Profile");
        assert_eq!(entity.row_key, "abc");
        assert!(entity.timestamp.is_some());
        assert!(entity.etag.as_deref().unwrap().starts_with("W/"));
        assert_eq!(entity.property_str("Name"), Some("John"));
        assert_eq!(entity.property_str("CreatedDate"), Some("2024-01-15T10:29:59Z"));
        assert!(!entity.properties.contains_key("CreatedDate@odata.type"));
        assert!(entity.is_datetime_property("CreatedDate"));
        assert!(!entity.is_datetime_property("Name"));
        assert!(!entity.properties.contains_key("Timestamp"));
    }

    #[test]
    fn entity_from_json_requires_keys() {
        assert!(entity_from_json(&json!({ "RowKey": "abc" })).is_err());
        assert!(entity_from_json(&json!("abc")).is_err());
    }

    #[test]
    fn error_message_prefers_odata_error() {
        let body = r#"{"odata.error":{"code":"AuthenticationFailed","message":{"lang":"en-US","value":"Server failed to authenticate the request."}}}"#;
        assert_eq!(error_message(body), "Server failed to authenticate the request.");
        assert_eq!(error_message(" plain text "), "plain text");
    }

    #[test]
    fn continuation_requires_partition_header() {
        let mut headers = HeaderMap::new();
        assert!(continuation_from(&headers).is_none());

        headers.insert("x-ms-continuation-nextpartitionkey", "1!8!UHJvZmlsZQ--".parse().unwrap());
        headers.insert("x-ms-continuation-nextrowkey", "1!12!YWJj".parse().unwrap());
        assert_eq!(
            continuation_from(&headers),
            Some(("1!8!UHJvZmlsZQ--".to_string(), Some("1!12!YWJj".to_string())))
        );
    }
}
