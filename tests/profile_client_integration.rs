//! Integration tests for `ProfileClient` against live, ephemeral hosts.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use profile_registration::adapters::client::{ClientError, ProfileClient};
use profile_registration::adapters::table::InMemoryTableStore;
use profile_registration::bootstrap;
use profile_registration::config::{AppConfig, FunctionConfig, ServerConfig};
use profile_registration::domain::profile::Profile;

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_web_host() -> SocketAddr {
    let state = bootstrap::profile_state(Arc::new(InMemoryTableStore::new())).unwrap();
    spawn(bootstrap::web_app(state, &ServerConfig::default())).await
}

async fn spawn_function_host(key: &str) -> SocketAddr {
    let state = bootstrap::profile_state(Arc::new(InMemoryTableStore::new())).unwrap();
    let config = AppConfig {
        function: FunctionConfig::with_key(key),
        ..Default::default()
    };
    spawn(bootstrap::function_app(state, &config)).await
}

fn john() -> Profile {
    Profile::new("John", "Doe", "john.doe@example.com", "30")
}

#[tokio::test]
async fn client_health_check() {
    let addr = spawn_web_host().await;
    let client = ProfileClient::new(format!("http://{}", addr)).unwrap();

    let health = client.health().await.unwrap();
    assert!(health.success);
    assert_eq!(health.message, "API is working!");
}

#[tokio::test]
async fn client_saves_and_lists() {
    let addr = spawn_web_host().await;
    let client = ProfileClient::new(format!("http://{}", addr)).unwrap();

    let saved = client.save_profile(&john()).await.unwrap();
    assert!(saved.success);

    let listed = client.list_profiles().await.unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.profiles[0].row_key, saved.row_key);
    assert_eq!(listed.profiles[0].name, "John");
    assert_eq!(listed.profiles[0].partition_key, "Profile");
}

#[tokio::test]
async fn client_uses_function_key() {
    let addr = spawn_function_host("abc123").await;

    let anonymous = ProfileClient::new(format!("http://{}", addr)).unwrap();
    let err = anonymous.save_profile(&john()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, ClientError::Api { ref message, .. } if message == "Unauthorized"));

    let keyed = ProfileClient::new(format!("http://{}", addr))
        .unwrap()
        .with_function_key("abc123");
    keyed.save_profile(&john()).await.unwrap();
    assert_eq!(keyed.list_profiles().await.unwrap().count, 1);
}

#[tokio::test]
async fn client_reports_unreachable_service() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ProfileClient::new(format!("http://{}", addr)).unwrap();
    let err = client.list_profiles().await.unwrap_err();
    assert!(matches!(err, ClientError::Request(_)));
}
