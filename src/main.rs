//! Eventify REST API
//!
//! Main application entry point

use tracing::info;

use eventify::config::Settings;
use eventify::database::{connection, DatabaseService};
use eventify::handlers;
use eventify::state::AppState;
use eventify::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must outlive the server
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting Eventify API server...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool_config = connection::PoolConfig::from_settings(&settings.database);
    let pool = connection::create_pool(&pool_config).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Wire up repositories, services, and routes
    let database = DatabaseService::new(pool);
    let state = AppState::new(settings.clone(), database);
    let app = handlers::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Eventify API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Eventify API has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
