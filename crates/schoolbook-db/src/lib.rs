//! # Schoolbook DB
//!
//! PostgreSQL pool construction and schema migrations.
//!
//! ```no_run
//! use schoolbook_config::DatabaseConfig;
//! use schoolbook_db::{init_db_pool, run_migrations};
//!
//! # async fn start() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_db_pool(&config).await?;
//! run_migrations(&pool).await?;
//! # Ok(())
//! # }
//! ```

use schoolbook_config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

pub use sqlx::PgPool;

/// Schema shared by the server, the CLI and `#[sqlx::test]`.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a connection pool sized by `DATABASE_MAX_CONNECTIONS`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
