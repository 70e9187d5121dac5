//! Rolegate user provisioning worker.
//!
//! Drains `UserCreated` events from a Redis list and grants each new user
//! the role named in the event.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use rolegate_application::{ProvisioningOutcome, UserProvisioningService, UserRoleService};
use rolegate_core::{AppError, AppResult};
use rolegate_infrastructure::{PgPools, PostgresUserRoleRepository};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_QUEUE_KEY: &str = "rolegate:events:user_created";
const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct WorkerConfig {
    database_url: String,
    max_connections: u32,
    redis_url: String,
    queue_key: String,
    poll_interval_ms: u64,
    drain_once: bool,
}

/// What to do with a payload after one handling attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadDisposition {
    Done,
    Requeue,
    Drop,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let provisioning_service = build_provisioning_service(&config).await?;
    let mut connection = connect_queue(config.redis_url.as_str()).await?;

    info!(
        queue_key = %config.queue_key,
        poll_interval_ms = config.poll_interval_ms,
        drain_once = config.drain_once,
        "rolegate-worker started"
    );

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let mut backoff = RetryBackoff::new(poll_interval);

    loop {
        let popped: redis::RedisResult<Option<Vec<u8>>> =
            connection.lpop(config.queue_key.as_str(), None).await;

        let payload = match popped {
            Ok(Some(payload)) => {
                backoff.reset();
                payload
            }
            Ok(None) => {
                backoff.reset();
                if config.drain_once {
                    info!(queue_key = %config.queue_key, "queue drained");
                    return Ok(());
                }
                tokio::time::sleep(poll_interval).await;
                continue;
            }
            Err(error) => {
                let delay = backoff.next_delay();
                warn!(
                    queue_key = %config.queue_key,
                    error = %error,
                    retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "failed to pop user created event"
                );
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        if handle_payload(&provisioning_service, payload.as_slice()).await
            == PayloadDisposition::Requeue
        {
            let pushed: redis::RedisResult<()> =
                connection.rpush(config.queue_key.as_str(), payload).await;
            if let Err(error) = pushed {
                warn!(
                    queue_key = %config.queue_key,
                    error = %error,
                    "failed to requeue user created event"
                );
            }
            tokio::time::sleep(backoff.next_delay()).await;
        }
    }
}

async fn handle_payload(
    service: &UserProvisioningService,
    payload: &[u8],
) -> PayloadDisposition {
    match service.handle_user_created_payload(payload).await {
        Ok(ProvisioningOutcome::Assigned | ProvisioningOutcome::AlreadyAssigned) => {
            PayloadDisposition::Done
        }
        Err(error) if error.is_retryable() => {
            warn!(error = %error, "user created event failed, requeueing");
            PayloadDisposition::Requeue
        }
        Err(error) => {
            warn!(error = %error, "dropping unprocessable user created event");
            PayloadDisposition::Drop
        }
    }
}

async fn build_provisioning_service(config: &WorkerConfig) -> AppResult<UserProvisioningService> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    let repository = Arc::new(PostgresUserRoleRepository::new(PgPools::single(pool)));
    Ok(UserProvisioningService::new(UserRoleService::new(
        repository,
    )))
}

async fn connect_queue(redis_url: &str) -> AppResult<ConnectionManager> {
    let client = redis::Client::open(redis_url)
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;

    client
        .get_connection_manager()
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
}

/// Exponential retry delay starting at the poll interval.
#[derive(Debug)]
struct RetryBackoff {
    base: Duration,
    current: Duration,
}

impl RetryBackoff {
    fn new(base: Duration) -> Self {
        Self {
            base,
            current: base,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.current.min(MAX_BACKOFF);
        self.current = self.current.saturating_mul(2).min(MAX_BACKOFF);
        delay
    }

    fn reset(&mut self) {
        self.current = self.base;
    }
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let redis_url = required_env("REDIS_URL")?;
        let queue_key = env::var("USER_CREATED_QUEUE_KEY")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_QUEUE_KEY.to_owned());
        let max_connections = parse_env_u32("DATABASE_MAX_CONNECTIONS", 5)?;
        let poll_interval_ms = parse_env_u64("WORKER_POLL_INTERVAL_MS", 1000)?;
        let drain_once = env::args().nth(1).as_deref() == Some("once");

        if max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        if poll_interval_ms == 0 {
            return Err(AppError::Validation(
                "WORKER_POLL_INTERVAL_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            redis_url,
            queue_key,
            poll_interval_ms,
            drain_once,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
