use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::PgPools;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connects to `DATABASE_URL` and migrates it, or returns `None` when the
/// variable is unset so database tests are skipped.
pub(crate) async fn test_pools() -> Option<PgPools> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres repository tests: {error}");
    }

    Some(PgPools::single(pool))
}

/// Role name unique across test runs sharing one database.
pub(crate) fn unique_role_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
