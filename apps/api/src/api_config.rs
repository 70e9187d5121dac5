use std::env;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rolegate_application::EnrichedRoleCacheSettings;
use rolegate_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

const DEFAULT_REDIS_KEY_PREFIX: &str = "rolegate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub database_url: String,
    pub read_database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres(PostgresConfig),
    Memory,
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub store_backend: StoreBackend,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub enriched_role_cache: EnrichedRoleCacheSettings,
    pub cors_allowed_origin: Option<String>,
    pub api_host: String,
    pub api_port: u16,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn load() -> AppResult<Self> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_source(migrate_only, &EnvSource::new(|name: &str| env::var(name).ok()))
    }

    fn from_source<F>(migrate_only: bool, source: &EnvSource<F>) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match source
            .optional("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres(PostgresConfig {
                database_url: source.required("DATABASE_URL")?,
                read_database_url: source.optional("DATABASE_READ_URL"),
                max_connections: source.positive("DATABASE_MAX_CONNECTIONS", 10_u32)?,
            }),
            "memory" => StoreBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && store_backend == StoreBackend::Memory {
            return Err(AppError::Validation(
                "the migrate command requires STORE_BACKEND=postgres".to_owned(),
            ));
        }

        let enriched_role_cache = EnrichedRoleCacheSettings {
            ttl: Duration::from_secs(source.parse_or("ENRICHED_ROLE_CACHE_TTL_SECONDS", 300_u64)?),
            operation_timeout: Duration::from_millis(
                source.positive("CACHE_OPERATION_TIMEOUT_MS", 250_u64)?,
            ),
        };

        Ok(Self {
            migrate_only,
            store_backend,
            redis_url: source.optional("REDIS_URL"),
            redis_key_prefix: source
                .optional("REDIS_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_REDIS_KEY_PREFIX.to_owned()),
            enriched_role_cache,
            cors_allowed_origin: source.optional("CORS_ALLOWED_ORIGIN"),
            api_host: source
                .optional("API_HOST")
                .unwrap_or_else(|| "127.0.0.1".to_owned()),
            api_port: source.parse_or("API_PORT", 3001_u16)?,
            request_timeout: Duration::from_millis(
                source.positive("REQUEST_TIMEOUT_MS", 5000_u64)?,
            ),
        })
    }

    pub fn socket_address(&self) -> AppResult<SocketAddr> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Variable lookup with blank values treated as unset.
struct EnvSource<F> {
    lookup: F,
}

impl<F> EnvSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self { lookup }
    }

    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &str) -> AppResult<String> {
        self.optional(name)
            .ok_or_else(|| AppError::Validation(format!("{name} is required")))
    }

    fn parse_or<T>(&self, name: &str, default: T) -> AppResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(name) {
            Some(value) => value.parse::<T>().map_err(|error| {
                AppError::Validation(format!("invalid {name} value '{value}': {error}"))
            }),
            None => Ok(default),
        }
    }

    fn positive<T>(&self, name: &str, default: T) -> AppResult<T>
    where
        T: FromStr + Default + PartialEq,
        T::Err: Display,
    {
        let value = self.parse_or(name, default)?;
        if value == T::default() {
            return Err(AppError::Validation(format!(
                "{name} must be greater than zero"
            )));
        }

        Ok(value)
    }
}
