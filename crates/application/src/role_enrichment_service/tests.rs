use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use rolegate_core::AppError;
use rolegate_domain::{EnrichedRole, RoleId};

use crate::RoleRepository;
use crate::test_fakes::{FakeAggregateCache, FakeRbacStore};

use super::{EnrichedRoleCacheSettings, RoleEnrichmentService};

fn cached_service(
    store: &Arc<FakeRbacStore>,
    cache: &Arc<FakeAggregateCache>,
    settings: EnrichedRoleCacheSettings,
) -> RoleEnrichmentService {
    RoleEnrichmentService::new(store.clone(), store.clone()).with_cache(cache.clone(), settings)
}

fn fast_settings() -> EnrichedRoleCacheSettings {
    EnrichedRoleCacheSettings {
        ttl: Duration::from_secs(300),
        operation_timeout: Duration::from_millis(20),
    }
}

#[test]
fn cache_key_uses_enriched_role_namespace() {
    let role_id = RoleId::new();
    assert_eq!(
        RoleEnrichmentService::cache_key(role_id),
        format!("enriched_role:{role_id}")
    );
}

#[tokio::test]
async fn miss_populates_cache_and_hit_skips_store() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    let role = store.seed_role("admin").await;
    let permission = store.seed_permission("users", "read").await;
    store.link_permission(role.id(), permission.id()).await;
    let service = cached_service(&store, &cache, fast_settings());

    let first = service.get(role.id()).await;
    let second = service.get(role.id()).await;

    let (Ok(first), Ok(second)) = (first, second) else {
        panic!("both reads should succeed");
    };
    assert_eq!(first, second);
    assert_eq!(first.permissions(), &[permission]);
    assert_eq!(store.role_reads.load(Ordering::SeqCst), 1);
    assert_eq!(store.role_permission_reads.load(Ordering::SeqCst), 1);

    let Some((_, ttl)) = cache
        .entry(&RoleEnrichmentService::cache_key(role.id()))
        .await
    else {
        panic!("aggregate should be cached");
    };
    assert!(ttl <= Duration::from_secs(300));
    assert!(ttl > Duration::from_secs(290));
}

#[tokio::test]
async fn zero_ttl_bypasses_the_cache() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    let role = store.seed_role("admin").await;
    let service = cached_service(
        &store,
        &cache,
        EnrichedRoleCacheSettings {
            ttl: Duration::ZERO,
            ..fast_settings()
        },
    );

    assert!(service.get(role.id()).await.is_ok());
    assert!(service.get(role.id()).await.is_ok());
    service.invalidate(role.id()).await;

    assert_eq!(store.role_reads.load(Ordering::SeqCst), 2);
    assert_eq!(cache.gets.load(Ordering::SeqCst), 0);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    assert_eq!(cache.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cache_read_failure_falls_back_to_store() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    cache.fail_reads.store(true, Ordering::SeqCst);
    let role = store.seed_role("admin").await;

    let result = cached_service(&store, &cache, fast_settings())
        .get(role.id())
        .await;

    assert!(matches!(result, Ok(enriched) if enriched.role_id() == role.id()));
    assert_eq!(store.role_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cache_write_failure_does_not_fail_the_read() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    cache.fail_writes.store(true, Ordering::SeqCst);
    let role = store.seed_role("admin").await;

    let result = cached_service(&store, &cache, fast_settings())
        .get(role.id())
        .await;

    assert!(result.is_ok());
    assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stalled_cache_is_treated_as_a_miss() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    cache.stall.store(true, Ordering::SeqCst);
    let role = store.seed_role("admin").await;

    let result = cached_service(&store, &cache, fast_settings())
        .get(role.id())
        .await;

    assert!(matches!(result, Ok(enriched) if enriched.role_id() == role.id()));
    assert_eq!(store.role_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn undecodable_entry_is_replaced_with_fresh_aggregate() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    let role = store.seed_role("admin").await;
    let key = RoleEnrichmentService::cache_key(role.id());
    cache.insert_raw(&key, b"{\"garbage\":true}".to_vec()).await;
    let service = cached_service(&store, &cache, fast_settings());

    assert!(service.get(role.id()).await.is_ok());
    assert!(service.get(role.id()).await.is_ok());

    assert_eq!(store.role_reads.load(Ordering::SeqCst), 1);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_and_deleted_roles_are_not_found_and_not_cached() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    let role = store.seed_role("admin").await;
    assert!(store.soft_delete_role(role.id()).await.is_ok());
    let service = cached_service(&store, &cache, fast_settings());

    assert!(matches!(
        service.get(role.id()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.get(RoleId::new()).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_failure_propagates_on_miss() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    let role = store.seed_role("admin").await;
    store
        .fail(crate::test_fakes::FakeFailures {
            role_reads: true,
            ..Default::default()
        })
        .await;

    let result = cached_service(&store, &cache, fast_settings())
        .get(role.id())
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn put_rejects_expiry_in_the_past() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    let role = store.seed_role("admin").await;
    let service = cached_service(&store, &cache, fast_settings());
    let enriched = EnrichedRole::new(role, Vec::new());

    let result = service
        .put(&enriched, Utc::now() - TimeDelta::seconds(1))
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalidate_drops_stale_aggregate() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    let role = store.seed_role("admin").await;
    let service = cached_service(&store, &cache, fast_settings());
    assert!(service.get(role.id()).await.is_ok());

    store.rename_role_directly(role.id(), "operator").await;
    let stale = service.get(role.id()).await;
    assert!(matches!(stale, Ok(enriched) if enriched.role().name().as_str() == "admin"));

    service.invalidate(role.id()).await;
    let fresh = service.get(role.id()).await;
    assert!(matches!(fresh, Ok(enriched) if enriched.role().name().as_str() == "operator"));
}

#[tokio::test]
async fn invalidate_absorbs_cache_failures() {
    let store = Arc::new(FakeRbacStore::default());
    let cache = Arc::new(FakeAggregateCache::default());
    cache.fail_deletes.store(true, Ordering::SeqCst);
    let service = cached_service(&store, &cache, fast_settings());

    service.invalidate(RoleId::new()).await;

    assert_eq!(cache.deletes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn uncached_service_always_reads_store() {
    let store = Arc::new(FakeRbacStore::default());
    let role = store.seed_role("admin").await;
    let service = RoleEnrichmentService::new(store.clone(), store.clone());

    assert!(service.get(role.id()).await.is_ok());
    assert!(service.get(role.id()).await.is_ok());
    assert!(
        service
            .put(
                &EnrichedRole::new(role, Vec::new()),
                Utc::now() + TimeDelta::seconds(30)
            )
            .await
            .is_ok()
    );

    assert_eq!(store.role_reads.load(Ordering::SeqCst), 2);
}
