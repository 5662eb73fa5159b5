//! Function host: the SaveProfile and GetAllProfiles functions, deployable
//! on their own.

use profile_registration::bootstrap::{self, StartupError};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = bootstrap::load_config()?;
    bootstrap::init_tracing(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        backend = ?config.storage.backend,
        "Starting profile function host"
    );

    let tables = bootstrap::connect_table_store(&config.storage).await?;
    let state = bootstrap::profile_state(tables)?;
    let app = bootstrap::function_app(state, &config);

    bootstrap::serve(app, config.server.function_addr()?).await
}
