//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod constraint_violation;
mod in_memory_aggregate_cache;
mod in_memory_rbac_store;
mod pg_pools;
mod postgres_permission_repository;
mod postgres_role_permission_repository;
mod postgres_role_repository;
mod postgres_rows;
mod postgres_user_role_repository;
mod redis_aggregate_cache;

#[cfg(test)]
mod postgres_test_pool;

pub use in_memory_aggregate_cache::InMemoryAggregateCache;
pub use in_memory_rbac_store::InMemoryRbacStore;
pub use pg_pools::PgPools;
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_permission_repository::PostgresRolePermissionRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_user_role_repository::PostgresUserRoleRepository;
pub use redis_aggregate_cache::RedisAggregateCache;
