//! In-memory design store.
//!
//! Backs local development without Postgres and the service-level tests.
//! Mirrors the Postgres store's semantics: unique share ids, single-record
//! atomicity, `updated_at` bumped on update.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use inkwell_core::{DesignId, ShareId, UserId};

use super::{DesignStore, RepositoryError};
use crate::models::{Design, DesignPatch, NewDesign};

#[derive(Default)]
struct Inner {
    next_id: i32,
    designs: HashMap<DesignId, Design>,
}

/// In-memory implementation of [`DesignStore`].
///
/// Cheaply cloneable; clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryDesignStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDesignStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-mutation in another task;
        // the map itself is still structurally valid.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl DesignStore for MemoryDesignStore {
    async fn find_by_share_id(
        &self,
        share_id: &ShareId,
    ) -> Result<Option<Design>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .designs
            .values()
            .find(|d| &d.share_id == share_id)
            .cloned())
    }

    async fn find_by_id(&self, id: DesignId) -> Result<Option<Design>, RepositoryError> {
        Ok(self.lock().designs.get(&id).cloned())
    }

    async fn share_id_exists(&self, share_id: &ShareId) -> Result<bool, RepositoryError> {
        let inner = self.lock();
        Ok(inner.designs.values().any(|d| &d.share_id == share_id))
    }

    async fn create(&self, new: NewDesign) -> Result<Design, RepositoryError> {
        let mut inner = self.lock();
        if inner.designs.values().any(|d| d.share_id == new.share_id) {
            return Err(RepositoryError::Conflict(
                "share id already exists".to_owned(),
            ));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let design = Design {
            id: DesignId::new(inner.next_id),
            share_id: new.share_id,
            owner_id: new.owner_id,
            name: new.name,
            description: new.description,
            canvas_data: new.canvas_data,
            thumbnail: new.thumbnail,
            is_public: new.is_public,
            parent_design_id: new.parent_design_id,
            view_count: 0,
            fork_count: 0,
            created_at: now,
            updated_at: now,
        };
        inner.designs.insert(design.id, design.clone());
        Ok(design)
    }

    async fn update(&self, id: DesignId, patch: DesignPatch) -> Result<Design, RepositoryError> {
        let mut inner = self.lock();
        let design = inner
            .designs
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = patch.name {
            design.name = name;
        }
        if let Some(description) = patch.description {
            design.description = Some(description);
        }
        if let Some(canvas_data) = patch.canvas_data {
            design.canvas_data = canvas_data;
        }
        if let Some(thumbnail) = patch.thumbnail {
            design.thumbnail = Some(thumbnail);
        }
        design.updated_at = Utc::now();

        Ok(design.clone())
    }

    async fn delete(&self, id: DesignId) -> Result<bool, RepositoryError> {
        Ok(self.lock().designs.remove(&id).is_some())
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Design>, RepositoryError> {
        let inner = self.lock();
        let mut designs: Vec<Design> = inner
            .designs
            .values()
            .filter(|d| d.owner_id == Some(owner_id))
            .cloned()
            .collect();
        designs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(designs)
    }

    async fn increment_view_count(&self, id: DesignId) -> Result<(), RepositoryError> {
        if let Some(design) = self.lock().designs.get_mut(&id) {
            design.view_count += 1;
        }
        Ok(())
    }

    async fn increment_fork_count(&self, id: DesignId) -> Result<(), RepositoryError> {
        if let Some(design) = self.lock().designs.get_mut(&id) {
            design.fork_count += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_design(share_id: &str) -> NewDesign {
        NewDesign {
            share_id: ShareId::parse(share_id).unwrap(),
            owner_id: None,
            name: "Untitled Design".to_owned(),
            description: None,
            canvas_data: json!({"front": []}),
            thumbnail: None,
            is_public: true,
            parent_design_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryDesignStore::new();
        let created = store.create(new_design("a1b2c3d4")).await.unwrap();
        assert_eq!(created.view_count, 0);

        let by_share = store
            .find_by_share_id(&ShareId::parse("a1b2c3d4").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_share.id, created.id);

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.share_id.as_str(), "a1b2c3d4");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_share_id() {
        let store = MemoryDesignStore::new();
        store.create(new_design("a1b2c3d4")).await.unwrap();
        let err = store.create(new_design("a1b2c3d4")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let store = MemoryDesignStore::new();
        let created = store.create(new_design("a1b2c3d4")).await.unwrap();

        let patch = DesignPatch {
            name: Some("Renamed".to_owned()),
            ..DesignPatch::default()
        };
        let updated = store.update(created.id, patch).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert!(updated.updated_at >= created.updated_at);
        // Untouched fields survive
        assert_eq!(updated.canvas_data, created.canvas_data);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryDesignStore::new();
        let created = store.create(new_design("a1b2c3d4")).await.unwrap();
        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let store = MemoryDesignStore::new();
        let owner = UserId::new(1);

        for share_id in ["aaaaaaaa", "bbbbbbbb", "cccccccc"] {
            let mut new = new_design(share_id);
            new.owner_id = Some(owner);
            store.create(new).await.unwrap();
        }
        let mut other = new_design("dddddddd");
        other.owner_id = Some(UserId::new(2));
        store.create(other).await.unwrap();

        let designs = store.list_by_owner(owner).await.unwrap();
        assert_eq!(designs.len(), 3);
        // Newest first; ids are monotonically assigned
        assert!(designs[0].id > designs[1].id);
        assert!(designs[1].id > designs[2].id);
    }

    #[tokio::test]
    async fn test_counters() {
        let store = MemoryDesignStore::new();
        let created = store.create(new_design("a1b2c3d4")).await.unwrap();

        store.increment_view_count(created.id).await.unwrap();
        store.increment_view_count(created.id).await.unwrap();
        store.increment_fork_count(created.id).await.unwrap();

        let design = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(design.view_count, 2);
        assert_eq!(design.fork_count, 1);

        // Incrementing a missing design is a silent no-op
        store
            .increment_view_count(DesignId::new(999))
            .await
            .unwrap();
    }
}
