use anyhow::Context;
use axum::ServiceExt;
use axum::extract::Request;
use dotenvy::dotenv;
use tracing::info;

use edutrack::router::init_app;
use edutrack::state::AppState;
use edutrack_config::{DatabaseConfig, ServerConfig};
use edutrack_db::{init_db_pool, run_migrations};
use edutrack_observability::{init_metrics, init_tracing, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let db_config = DatabaseConfig::from_env()?;
    let server_config = ServerConfig::from_env();

    let db = init_db_pool(&db_config)
        .await
        .context("Failed to connect to database")?;
    if db_config.run_migrations {
        run_migrations(&db).await.context("Failed to run migrations")?;
    }

    let metrics = init_metrics();
    let state = AppState::from_env(db);
    let app = init_app(state, metrics);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(%address, "Server running");
    info!("Swagger UI available at http://{}/docs", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
