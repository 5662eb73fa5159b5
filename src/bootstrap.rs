//! Process startup shared by the web host and the function host.
//!
//! Loads configuration, installs the tracing subscriber, connects the
//! configured table store once and wires it into the routers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::adapters::http::{
    function_router, profile_api_router, web_router, FunctionKeyState, ProfileAppState,
};
use crate::adapters::table::{
    AzureTableCredentials, AzureTableStore, InMemoryTableStore, PgTableStore, TableProfileStore,
};
use crate::config::{AppConfig, AzureStorageConfig, ConfigError, ServerConfig, StorageBackend, StorageConfig};
use crate::domain::foundation::DomainError;
use crate::ports::{TableStore, TableStoreError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] crate::config::ValidationError),

    #[error("Table store unavailable: {0}")]
    Storage(#[from] TableStoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads and validates configuration.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

/// Installs the global tracing subscriber.
///
/// JSON lines in production, compact text elsewhere. A second call is a
/// no-op.
pub fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_new(&server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if server.is_production() {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Connects the configured table store.
pub async fn connect_table_store(
    storage: &StorageConfig,
) -> Result<Arc<dyn TableStore>, StartupError> {
    let store: Arc<dyn TableStore> = match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory table store; profiles are lost on restart");
            Arc::new(InMemoryTableStore::new())
        }
        StorageBackend::Postgres => {
            tracing::info!("Connecting to PostgreSQL table store");
            Arc::new(PgTableStore::connect(&storage.postgres).await?)
        }
        StorageBackend::Azure => {
            let credentials = azure_credentials(&storage.azure)?;
            tracing::info!(
                account = credentials.account_name(),
                endpoint = credentials.endpoint(),
                "Using Azure Table Storage"
            );
            Arc::new(AzureTableStore::new(credentials)?)
        }
    };
    Ok(store)
}

fn azure_credentials(azure: &AzureStorageConfig) -> Result<AzureTableCredentials, StartupError> {
    use secrecy::ExposeSecret;

    if let Some(connection_string) = &azure.connection_string {
        return Ok(AzureTableCredentials::from_connection_string(
            connection_string.expose_secret(),
        )?);
    }

    match (&azure.account_name, &azure.account_key) {
        (Some(name), Some(key)) => Ok(AzureTableCredentials::new(
            name.clone(),
            key.expose_secret().clone(),
            azure.endpoint.as_deref(),
        )?),
        _ => Err(crate::config::ValidationError::MissingRequired(
            "STORAGE__AZURE__ACCOUNT_NAME",
        )
        .into()),
    }
}

/// Builds the shared profile state over a table store.
pub fn profile_state(tables: Arc<dyn TableStore>) -> Result<ProfileAppState, StartupError> {
    let store = TableProfileStore::new(tables)?;
    Ok(ProfileAppState::new(Arc::new(store)))
}

/// The web host: registration form plus JSON API.
pub fn web_app(state: ProfileAppState, server: &ServerConfig) -> Router {
    let router = web_router()
        .merge(profile_api_router())
        .with_state(state);
    with_http_layers(router, server)
}

/// The function host: only the two function routes.
pub fn function_app(state: ProfileAppState, config: &AppConfig) -> Router {
    if config.function.is_anonymous() {
        tracing::warn!("No function key configured; functions accept anonymous requests");
    }
    let router = function_router(FunctionKeyState::new(&config.function)).with_state(state);
    with_http_layers(router, &config.server)
}

fn with_http_layers(router: Router, server: &ServerConfig) -> Router {
    let router = router.layer(TimeoutLayer::new(server.request_timeout()));

    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let router = if origins.is_empty() {
        router
    } else {
        router.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
    };

    router.layer(TraceLayer::new_for_http())
}

/// Serves `router` until Ctrl-C.
pub async fn serve(router: Router, addr: SocketAddr) -> Result<(), StartupError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
