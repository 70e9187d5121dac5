use rolegate_core::{AppError, AppResult};
use rolegate_infrastructure::PgPools;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::PostgresConfig;

pub async fn connect_pools(config: &PostgresConfig) -> AppResult<PgPools> {
    let write = connect(config.database_url.as_str(), config.max_connections).await?;

    let Some(read_database_url) = config.read_database_url.as_deref() else {
        return Ok(PgPools::single(write));
    };

    let read = connect(read_database_url, config.max_connections).await?;
    info!("using separate read database pool");
    Ok(PgPools::new(write, read))
}

pub async fn run_migrations(pools: &PgPools) -> AppResult<()> {
    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(pools.write())
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))
}

async fn connect(database_url: &str, max_connections: u32) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}
