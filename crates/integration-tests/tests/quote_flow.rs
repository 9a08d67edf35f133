//! End-to-end quote flow: share a design, fork it, build a quote cart.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;

use inkwell_core::UserId;
use inkwell_integration_tests::{eventually_design, memory_service, seed_design};
use inkwell_storefront::cart::{
    BlankItemInput, CustomItemInput, LineItemKind, QuoteCart, SizeRun,
};

fn sizes(pairs: &[(&str, u32)]) -> SizeRun {
    pairs
        .iter()
        .map(|(label, count)| ((*label).to_owned(), *count))
        .collect()
}

#[tokio::test]
async fn test_shared_design_to_quote() {
    let (service, store) = memory_service();

    // A designer saves and shares a tee design
    let source = seed_design(
        &store,
        "a1b2c3d4",
        Some(UserId::new(1)),
        "Club Tee",
        json!({"front": [{"decal": "crest"}], "back": [], "color": "green"}),
    )
    .await;

    // A visitor opens the share link and forks it to customize
    let view = service.resolve_share("a1b2c3d4").await.unwrap();
    assert_eq!(view.name, "Club Tee");

    let fork = service.fork("a1b2c3d4", None).await.unwrap();
    assert_eq!(fork.parent_design_id, Some(source.id));

    // They quote a screen-print run of the fork plus some blanks
    let mut cart = QuoteCart::new();
    let custom = cart.add_custom_item(CustomItemInput {
        name: fork.name.clone(),
        design_share_id: Some(fork.share_id.clone()),
        service: "screen-print".to_owned(),
        sizes: sizes(&[("S", 2), ("M", 3)]),
        unit_price: Decimal::from(10),
    });
    cart.add_blank_item(BlankItemInput {
        name: "Plain Tee".to_owned(),
        product_id: "g5000".to_owned(),
        variant_id: None,
        supplier: "gildan".to_owned(),
        sizes: sizes(&[("L", 10)]),
        unit_price: Decimal::from(6),
        price_tiers: Vec::new(),
    });

    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total_items(), 15);
    assert_eq!(cart.subtotal(), Decimal::from(110));

    // The custom line remembers which saved design it prints
    let item = cart.get(custom).unwrap();
    match item.kind() {
        LineItemKind::Custom {
            design_share_id, ..
        } => assert_eq!(design_share_id.as_ref(), Some(&fork.share_id)),
        LineItemKind::Blank { .. } => panic!("expected a custom line"),
    }

    // Doubling the run scales the size split and the totals
    cart.update_quantity(custom, 10);
    let item = cart.get(custom).unwrap();
    assert_eq!(item.sizes(), &sizes(&[("S", 4), ("M", 6)]));
    assert_eq!(cart.subtotal(), Decimal::from(160));

    // The share/fork counters catch up in the background
    eventually_design(&store, source.id, "source counters reflect the visit", |d| {
        d.view_count == 1 && d.fork_count == 1
    })
    .await;
}

#[tokio::test]
async fn test_cart_state_round_trips_like_the_session_does() {
    let mut cart = QuoteCart::new();
    cart.add_blank_item(BlankItemInput {
        name: "Plain Tee".to_owned(),
        product_id: "g5000".to_owned(),
        variant_id: None,
        supplier: "gildan".to_owned(),
        sizes: sizes(&[("S", 2), ("M", 3)]),
        unit_price: Decimal::from(10),
        price_tiers: Vec::new(),
    });
    cart.open();

    // The session layer serializes the cart between requests
    let stored = serde_json::to_value(&cart).unwrap();
    let restored: QuoteCart = serde_json::from_value(stored).unwrap();

    assert_eq!(restored.item_count(), 1);
    assert_eq!(restored.total_items(), 5);
    assert_eq!(restored.subtotal(), Decimal::from(50));
    // Drawer visibility is presentation state and does not survive
    assert!(!restored.is_open());
}
