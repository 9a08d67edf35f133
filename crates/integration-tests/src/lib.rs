//! Integration tests for Inkwell Press.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p inkwell-integration-tests
//! ```
//!
//! The tests in `tests/` exercise the storefront service layer over the
//! in-memory design store, so no database or running server is required.
//! This crate's library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use inkwell_core::{DesignId, ShareId, UserId};
use inkwell_storefront::db::{DesignStore, MemoryDesignStore, RepositoryError};
use inkwell_storefront::models::{Design, DesignPatch, NewDesign};
use inkwell_storefront::services::DesignService;

/// A design service over a fresh in-memory store, plus a handle to the
/// store for direct inspection.
#[must_use]
pub fn memory_service() -> (DesignService, MemoryDesignStore) {
    let store = MemoryDesignStore::new();
    let service = DesignService::new(Arc::new(store.clone()));
    (service, store)
}

/// Seed a design directly into the store, bypassing the service.
///
/// # Panics
///
/// Panics if the store rejects the insert (duplicate share id).
#[allow(clippy::unwrap_used)]
pub async fn seed_design(
    store: &MemoryDesignStore,
    share_id: &str,
    owner: Option<UserId>,
    name: &str,
    canvas: serde_json::Value,
) -> Design {
    store
        .create(NewDesign {
            share_id: ShareId::parse(share_id).unwrap(),
            owner_id: owner,
            name: name.to_owned(),
            description: None,
            canvas_data: canvas,
            thumbnail: None,
            is_public: true,
            parent_design_id: None,
        })
        .await
        .unwrap()
}

/// Poll a design until `check` passes or the deadline runs out.
///
/// Counter bumps are spawned fire-and-forget, so tests observing them
/// have to wait for the runtime to run the spawned task.
///
/// # Panics
///
/// Panics if the condition does not hold within roughly two seconds, or
/// if the design disappears from the store.
pub async fn eventually_design<F>(store: &MemoryDesignStore, id: DesignId, what: &str, check: F)
where
    F: Fn(&Design) -> bool,
{
    for _ in 0..200 {
        let design = store
            .find_by_id(id)
            .await
            .unwrap_or_else(|e| panic!("store error while waiting for {what}: {e}"))
            .unwrap_or_else(|| panic!("design {id} vanished while waiting for {what}"));
        if check(&design) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition never held: {what}");
}

/// Store wrapper that reports the next `n` candidate share ids as taken.
///
/// Lets tests drive the minting loop through collisions without having
/// to occupy real identifiers.
pub struct CollidingStore {
    inner: MemoryDesignStore,
    remaining_collisions: AtomicU32,
}

impl CollidingStore {
    #[must_use]
    pub fn new(inner: MemoryDesignStore, collisions: u32) -> Self {
        Self {
            inner,
            remaining_collisions: AtomicU32::new(collisions),
        }
    }
}

#[async_trait]
impl DesignStore for CollidingStore {
    async fn find_by_share_id(
        &self,
        share_id: &ShareId,
    ) -> Result<Option<Design>, RepositoryError> {
        self.inner.find_by_share_id(share_id).await
    }

    async fn find_by_id(&self, id: DesignId) -> Result<Option<Design>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn share_id_exists(&self, share_id: &ShareId) -> Result<bool, RepositoryError> {
        let pending = self
            .remaining_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if pending {
            return Ok(true);
        }
        self.inner.share_id_exists(share_id).await
    }

    async fn create(&self, new: NewDesign) -> Result<Design, RepositoryError> {
        self.inner.create(new).await
    }

    async fn update(&self, id: DesignId, patch: DesignPatch) -> Result<Design, RepositoryError> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: DesignId) -> Result<bool, RepositoryError> {
        self.inner.delete(id).await
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Design>, RepositoryError> {
        self.inner.list_by_owner(owner_id).await
    }

    async fn increment_view_count(&self, id: DesignId) -> Result<(), RepositoryError> {
        self.inner.increment_view_count(id).await
    }

    async fn increment_fork_count(&self, id: DesignId) -> Result<(), RepositoryError> {
        self.inner.increment_fork_count(id).await
    }
}
