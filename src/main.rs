//! Web host: registration form and JSON API.

use profile_registration::bootstrap::{self, StartupError};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = bootstrap::load_config()?;
    bootstrap::init_tracing(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        backend = ?config.storage.backend,
        "Starting profile registration web host"
    );

    let tables = bootstrap::connect_table_store(&config.storage).await?;
    let state = bootstrap::profile_state(tables)?;
    let app = bootstrap::web_app(state, &config.server);

    bootstrap::serve(app, config.server.web_addr()?).await
}
