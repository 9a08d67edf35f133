//! Forking semantics: provenance, copied payloads, counters.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use inkwell_core::UserId;
use inkwell_integration_tests::{eventually_design, memory_service, seed_design};
use inkwell_storefront::services::DesignError;

#[tokio::test]
async fn test_fork_creates_independent_copy_with_provenance() {
    let (service, store) = memory_service();
    let canvas = json!({"front": [{"decal": "flame"}], "back": [], "color": "red"});
    let source = seed_design(
        &store,
        "a1b2c3d4",
        Some(UserId::new(1)),
        "Flame Tee",
        canvas.clone(),
    )
    .await;

    let fork = service
        .fork("a1b2c3d4", Some(UserId::new(2)))
        .await
        .unwrap();

    assert_ne!(fork.id, source.id);
    assert_ne!(fork.share_id, source.share_id);
    assert_eq!(fork.name, "Flame Tee (Copy)");
    assert_eq!(fork.canvas_data, canvas);
    assert_eq!(fork.parent_design_id, Some(source.id));
    assert_eq!(fork.owner_id, Some(UserId::new(2)));
    assert_eq!(fork.view_count, 0);
    assert_eq!(fork.fork_count, 0);
}

#[tokio::test]
async fn test_fork_bumps_source_fork_count_async() {
    let (service, store) = memory_service();
    let source = seed_design(&store, "a1b2c3d4", None, "Tee", json!({})).await;

    let fork = service.fork("a1b2c3d4", None).await.unwrap();
    assert_eq!(fork.fork_count, 0);

    eventually_design(&store, source.id, "source fork count reaches 1", |d| {
        d.fork_count == 1
    })
    .await;
}

#[tokio::test]
async fn test_anonymous_fork_has_no_owner() {
    let (service, store) = memory_service();
    seed_design(&store, "a1b2c3d4", Some(UserId::new(1)), "Tee", json!({})).await;

    let fork = service.fork("a1b2c3d4", None).await.unwrap();
    assert_eq!(fork.owner_id, None);
}

#[tokio::test]
async fn test_fork_of_fork_chains_provenance() {
    let (service, store) = memory_service();
    let root = seed_design(&store, "a1b2c3d4", None, "Tee", json!({})).await;

    let first = service.fork("a1b2c3d4", None).await.unwrap();
    let second = service
        .fork(first.share_id.as_str(), None)
        .await
        .unwrap();

    assert_eq!(first.parent_design_id, Some(root.id));
    assert_eq!(second.parent_design_id, Some(first.id));
    assert_eq!(second.name, "Tee (Copy) (Copy)");
}

#[tokio::test]
async fn test_fork_unknown_source_is_not_found() {
    let (service, _store) = memory_service();
    let err = service.fork("zzzzzzzz", None).await.unwrap_err();
    assert!(matches!(err, DesignError::NotFound));
}

#[tokio::test]
async fn test_fork_survives_parent_deletion() {
    let (service, store) = memory_service();
    let owner = UserId::new(1);
    let source = seed_design(&store, "a1b2c3d4", Some(owner), "Tee", json!({})).await;

    let fork = service.fork("a1b2c3d4", Some(owner)).await.unwrap();
    service.delete(owner, source.id).await.unwrap();

    // The fork remains resolvable; its provenance edge now dangles
    let view = service
        .resolve_share(fork.share_id.as_str())
        .await
        .unwrap();
    assert_eq!(view.id, fork.id);
}
