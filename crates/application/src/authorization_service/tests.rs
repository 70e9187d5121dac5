use std::sync::Arc;
use std::sync::atomic::Ordering;

use rolegate_core::AppError;
use rolegate_domain::{PermissionAction, PermissionResource, UserId};

use crate::test_fakes::{FakeFailures, FakeRbacStore};

use super::AuthorizationService;

fn service(store: &Arc<FakeRbacStore>) -> AuthorizationService {
    AuthorizationService::new(store.clone(), store.clone(), store.clone())
}

fn pair(resource: &str, action: &str) -> (PermissionResource, PermissionAction) {
    let (Ok(resource), Ok(action)) = (
        PermissionResource::new(resource),
        PermissionAction::new(action),
    ) else {
        panic!("valid permission pair");
    };
    (resource, action)
}

#[tokio::test]
async fn check_permission_allows_user_whose_second_role_grants() {
    let store = Arc::new(FakeRbacStore::default());
    let user_id = UserId::new();
    let auditor = store.seed_role("auditor").await;
    let editor = store.seed_role("editor").await;
    let permission = store.seed_permission("articles", "publish").await;
    store.link_user(user_id, auditor.id()).await;
    store.link_user(user_id, editor.id()).await;
    store.link_permission(editor.id(), permission.id()).await;

    let (resource, action) = pair("articles", "publish");
    let result = service(&store)
        .check_permission(user_id, &resource, &action)
        .await;

    assert!(result.is_ok());
    assert_eq!(store.grant_checks.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn check_permission_stops_at_first_granting_role() {
    let store = Arc::new(FakeRbacStore::default());
    let user_id = UserId::new();
    let admin = store.seed_role("admin").await;
    let editor = store.seed_role("editor").await;
    let permission = store.seed_permission("articles", "publish").await;
    store.link_user(user_id, admin.id()).await;
    store.link_user(user_id, editor.id()).await;
    store.link_permission(admin.id(), permission.id()).await;
    store.link_permission(editor.id(), permission.id()).await;

    let (resource, action) = pair("articles", "publish");
    let result = service(&store)
        .check_permission(user_id, &resource, &action)
        .await;

    assert!(result.is_ok());
    assert_eq!(store.grant_checks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_permission_denies_without_reading_user_roles() {
    let store = Arc::new(FakeRbacStore::default());
    let user_id = UserId::new();
    let admin = store.seed_role("admin").await;
    store.link_user(user_id, admin.id()).await;

    let (resource, action) = pair("articles", "delete");
    let result = service(&store)
        .check_permission(user_id, &resource, &action)
        .await;

    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    assert_eq!(store.user_role_reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn user_without_roles_is_denied() {
    let store = Arc::new(FakeRbacStore::default());
    store.seed_permission("articles", "read").await;

    let (resource, action) = pair("articles", "read");
    let result = service(&store)
        .check_permission(UserId::new(), &resource, &action)
        .await;

    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
}

#[tokio::test]
async fn denial_message_does_not_reveal_whether_permission_exists() {
    let user_id = UserId::new();
    let (resource, action) = pair("articles", "read");

    let known = Arc::new(FakeRbacStore::default());
    let viewer = known.seed_role("viewer").await;
    known.link_user(user_id, viewer.id()).await;
    known.seed_permission("articles", "read").await;
    let not_granted = service(&known)
        .check_permission(user_id, &resource, &action)
        .await;

    let unknown = Arc::new(FakeRbacStore::default());
    let missing = service(&unknown)
        .check_permission(user_id, &resource, &action)
        .await;

    let (Err(AppError::PermissionDenied(first)), Err(AppError::PermissionDenied(second))) =
        (not_granted, missing)
    else {
        panic!("expected both checks to deny");
    };
    assert_eq!(first, second);
}

#[tokio::test]
async fn permission_lookup_failure_propagates() {
    let store = Arc::new(FakeRbacStore::default());
    store
        .fail(FakeFailures {
            permission_lookup: true,
            ..FakeFailures::default()
        })
        .await;

    let (resource, action) = pair("articles", "read");
    let result = service(&store)
        .check_permission(UserId::new(), &resource, &action)
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn user_role_listing_failure_propagates() {
    let store = Arc::new(FakeRbacStore::default());
    store.seed_permission("articles", "read").await;
    store
        .fail(FakeFailures {
            user_roles: true,
            ..FakeFailures::default()
        })
        .await;

    let (resource, action) = pair("articles", "read");
    let result = service(&store)
        .check_permission(UserId::new(), &resource, &action)
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn grant_check_failure_propagates_instead_of_denying() {
    let store = Arc::new(FakeRbacStore::default());
    let user_id = UserId::new();
    let viewer = store.seed_role("viewer").await;
    store.link_user(user_id, viewer.id()).await;
    store.seed_permission("articles", "read").await;
    store
        .fail(FakeFailures {
            role_permission_check: true,
            ..FakeFailures::default()
        })
        .await;

    let (resource, action) = pair("articles", "read");
    let result = service(&store)
        .check_permission(user_id, &resource, &action)
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn has_permission_reports_denial_as_false() {
    let store = Arc::new(FakeRbacStore::default());
    let user_id = UserId::new();
    let viewer = store.seed_role("viewer").await;
    let permission = store.seed_permission("articles", "read").await;
    store.link_user(user_id, viewer.id()).await;
    store.link_permission(viewer.id(), permission.id()).await;
    let service = service(&store);

    let (resource, read) = pair("articles", "read");
    let (_, write) = pair("articles", "write");

    assert!(matches!(
        service.has_permission(user_id, &resource, &read).await,
        Ok(true)
    ));
    assert!(matches!(
        service.has_permission(user_id, &resource, &write).await,
        Ok(false)
    ));
}
