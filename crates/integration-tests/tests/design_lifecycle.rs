//! Save, list, and delete through the design service.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use inkwell_core::UserId;
use inkwell_integration_tests::{memory_service, seed_design};
use inkwell_storefront::services::{CreateDesign, DesignError};

fn fields(name: Option<&str>) -> CreateDesign {
    CreateDesign {
        name: name.map(str::to_owned),
        description: Some("studio save".to_owned()),
        canvas_data: json!({"front": [], "back": [], "color": "white"}),
        thumbnail: None,
    }
}

#[tokio::test]
async fn test_create_defaults_blank_name() {
    let (service, _store) = memory_service();

    let unnamed = service.create(UserId::new(1), fields(None)).await.unwrap();
    assert_eq!(unnamed.name, "Untitled Design");

    let whitespace = service
        .create(UserId::new(1), fields(Some("   ")))
        .await
        .unwrap();
    assert_eq!(whitespace.name, "Untitled Design");

    let named = service
        .create(UserId::new(1), fields(Some("Club Hoodie")))
        .await
        .unwrap();
    assert_eq!(named.name, "Club Hoodie");
}

#[tokio::test]
async fn test_list_scopes_to_owner_newest_first() {
    let (service, _store) = memory_service();
    let alice = UserId::new(1);
    let bob = UserId::new(2);

    let first = service.create(alice, fields(Some("First"))).await.unwrap();
    let second = service.create(alice, fields(Some("Second"))).await.unwrap();
    service.create(bob, fields(Some("Other"))).await.unwrap();

    let listed = service.list_for_owner(alice).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].created_at >= listed[1].created_at);
    let ids: Vec<_> = listed.iter().map(|d| d.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let (service, store) = memory_service();
    let owner = UserId::new(1);
    let stranger = UserId::new(2);
    let design = seed_design(&store, "a1b2c3d4", Some(owner), "Tee", json!({})).await;

    let err = service.delete(stranger, design.id).await.unwrap_err();
    assert!(matches!(err, DesignError::Forbidden));

    service.delete(owner, design.id).await.unwrap();
    let err = service.delete(owner, design.id).await.unwrap_err();
    assert!(matches!(err, DesignError::NotFound));
}

#[tokio::test]
async fn test_delete_anonymous_design_is_forbidden() {
    let (service, store) = memory_service();
    let design = seed_design(&store, "a1b2c3d4", None, "Tee", json!({})).await;

    // Anonymous designs have no owner to match, so nobody may delete them
    let err = service.delete(UserId::new(1), design.id).await.unwrap_err();
    assert!(matches!(err, DesignError::Forbidden));
}
