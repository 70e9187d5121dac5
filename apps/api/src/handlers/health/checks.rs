use rolegate_infrastructure::{PgPools, RedisAggregateCache};

use crate::dto::HealthDependencyStatus;

pub(super) async fn check_postgres(pools: Option<&PgPools>) -> HealthDependencyStatus {
    let Some(pools) = pools else {
        return disabled();
    };

    let check = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pools.write())
        .await;

    match check {
        Ok(_) => healthy(),
        Err(error) => failed(format!("postgres check failed: {error}")),
    }
}

pub(super) async fn check_redis(cache: Option<&RedisAggregateCache>) -> HealthDependencyStatus {
    let Some(cache) = cache else {
        return disabled();
    };

    match cache.ping().await {
        Ok(()) => healthy(),
        Err(error) => failed(error.to_string()),
    }
}

fn healthy() -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "ok",
        detail: None,
    }
}

fn disabled() -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "disabled",
        detail: None,
    }
}

fn failed(detail: String) -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "error",
        detail: Some(detail),
    }
}
