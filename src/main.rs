use anyhow::Context;
use dotenvy::dotenv;

use schoolbook::router::init_router;
use schoolbook::state::AppState;
use schoolbook_config::{DatabaseConfig, ServerConfig};
use schoolbook_db::{init_db_pool, run_migrations};
use schoolbook_observability::{init_metrics, init_tracing, metrics_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guards = init_tracing()?;

    let db_config = DatabaseConfig::from_env()?;
    let db = init_db_pool(&db_config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("failed to run database migrations")?;

    let state = AppState::from_env(db);
    let mut app = init_router(state);

    if let Some(handle) = init_metrics()? {
        app = app.merge(metrics_router(handle));
        tracing::info!("Prometheus metrics available at /metrics");
    }

    let server = ServerConfig::from_env();
    let address = server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!("Server running on http://{address}");
    tracing::info!("Swagger UI available at http://{address}/swagger-ui");
    tracing::info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app).await?;
    Ok(())
}
