//! Design service: creation, share resolution, and forking.
//!
//! Sits between the HTTP handlers and the [`DesignStore`] seam. Owns the
//! share-id minting loop and the fire-and-forget counter side effects.
//!
//! # Counter semantics
//!
//! View and fork counters are analytics-grade: increments are spawned onto
//! the runtime after the primary result is in hand, never awaited, and
//! their failures are logged but never surfaced. A reader must never be
//! blocked or failed by a counter-update fault.

use std::sync::Arc;

use thiserror::Error;

use inkwell_core::{DesignId, ShareId, ShareIdError, UserId};

use crate::db::{DesignStore, RepositoryError};
use crate::models::{DEFAULT_DESIGN_NAME, Design, DesignView, NewDesign, fork_name};

/// Upper bound on share-id minting attempts before giving up.
///
/// With a 36^8 identifier space, ten collisions in a row means either the
/// table is absurdly saturated or the RNG is broken; both deserve an
/// operational error rather than more spinning.
pub const MAX_MINT_ATTEMPTS: u32 = 10;

/// Errors from design operations.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The supplied identifier does not have the 8-char share shape.
    #[error("malformed share identifier: {0}")]
    MalformedIdentifier(#[from] ShareIdError),

    /// No design matches the (well-formed) identifier.
    #[error("design not found")]
    NotFound,

    /// The caller does not own the design it tried to mutate.
    #[error("design belongs to a different owner")]
    Forbidden,

    /// The minting loop exhausted its attempt budget.
    #[error("could not mint a unique share id in {attempts} attempts")]
    IdentifierExhausted { attempts: u32 },

    /// Storage-layer fault.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Fields accepted when saving a design from the studio.
#[derive(Debug, Clone)]
pub struct CreateDesign {
    pub name: Option<String>,
    pub description: Option<String>,
    pub canvas_data: serde_json::Value,
    pub thumbnail: Option<String>,
}

/// Service for design creation, resolution, and forking.
///
/// Cheaply cloneable; clones share the underlying store handle.
#[derive(Clone)]
pub struct DesignService {
    store: Arc<dyn DesignStore>,
}

impl DesignService {
    /// Create a new service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DesignStore>) -> Self {
        Self { store }
    }

    /// Resolve a public share link to its read-only projection.
    ///
    /// Bumps the design's view counter fire-and-forget; the returned view
    /// reflects the counter value before this resolution.
    ///
    /// # Errors
    ///
    /// `MalformedIdentifier` if the input fails validation, `NotFound` if
    /// no design carries the identifier.
    pub async fn resolve_share(&self, raw_share_id: &str) -> Result<DesignView, DesignError> {
        let share_id = ShareId::parse(raw_share_id)?;
        let design = self
            .store
            .find_by_share_id(&share_id)
            .await?
            .ok_or(DesignError::NotFound)?;

        self.spawn_view_count_bump(design.id);
        Ok(design.into())
    }

    /// Fork a public design into a new, independently editable copy.
    ///
    /// The copy gets a freshly minted share id, `"<source name> (Copy)"`
    /// as its name, a verbatim copy of the canvas payload, and a
    /// provenance edge back to the source. Authentication is optional;
    /// anonymous forks have no owner. The source's fork counter is bumped
    /// fire-and-forget.
    ///
    /// # Errors
    ///
    /// `MalformedIdentifier`, `NotFound` for the source, or
    /// `IdentifierExhausted` if minting runs out of attempts.
    pub async fn fork(
        &self,
        raw_share_id: &str,
        requesting_user: Option<UserId>,
    ) -> Result<Design, DesignError> {
        let share_id = ShareId::parse(raw_share_id)?;
        let source = self
            .store
            .find_by_share_id(&share_id)
            .await?
            .ok_or(DesignError::NotFound)?;

        let minted = self.mint_share_id().await?;
        let forked = self
            .store
            .create(NewDesign {
                share_id: minted,
                owner_id: requesting_user,
                name: fork_name(&source.name),
                description: source.description.clone(),
                canvas_data: source.canvas_data.clone(),
                thumbnail: source.thumbnail.clone(),
                is_public: true,
                parent_design_id: Some(source.id),
            })
            .await?;

        self.spawn_fork_count_bump(source.id);
        Ok(forked)
    }

    /// Save a new design for an authenticated user.
    ///
    /// # Errors
    ///
    /// `IdentifierExhausted` if minting runs out of attempts, or a
    /// repository error.
    pub async fn create(
        &self,
        owner_id: UserId,
        fields: CreateDesign,
    ) -> Result<Design, DesignError> {
        let minted = self.mint_share_id().await?;
        let design = self
            .store
            .create(NewDesign {
                share_id: minted,
                owner_id: Some(owner_id),
                name: fields
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DESIGN_NAME.to_owned()),
                description: fields.description,
                canvas_data: fields.canvas_data,
                thumbnail: fields.thumbnail,
                is_public: true,
                parent_design_id: None,
            })
            .await?;

        Ok(design)
    }

    /// All designs owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the query fails.
    pub async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Design>, DesignError> {
        Ok(self.store.list_by_owner(owner_id).await?)
    }

    /// Delete a design owned by the caller.
    ///
    /// # Errors
    ///
    /// `NotFound` if the design doesn't exist, `Forbidden` if it belongs
    /// to a different owner (anonymous designs included: they have no
    /// owner to match).
    pub async fn delete(&self, caller: UserId, id: DesignId) -> Result<(), DesignError> {
        let design = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(DesignError::NotFound)?;

        if design.owner_id != Some(caller) {
            return Err(DesignError::Forbidden);
        }

        if self.store.delete(id).await? {
            Ok(())
        } else {
            // Deleted out from under us between lookup and delete.
            Err(DesignError::NotFound)
        }
    }

    /// Mint a share id not currently assigned to any design.
    ///
    /// Sequential bounded retry: each candidate costs one existence check
    /// against the store before the next is generated. The log on
    /// exhaustion records the attempt budget, not the candidates.
    async fn mint_share_id(&self) -> Result<ShareId, DesignError> {
        for attempt in 1..=MAX_MINT_ATTEMPTS {
            let candidate = ShareId::generate();
            if !self.store.share_id_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(attempt, "share id collision, retrying");
        }

        tracing::error!(
            attempts = MAX_MINT_ATTEMPTS,
            "share id minting exhausted; identifier space may be saturating"
        );
        Err(DesignError::IdentifierExhausted {
            attempts: MAX_MINT_ATTEMPTS,
        })
    }

    fn spawn_view_count_bump(&self, id: DesignId) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.increment_view_count(id).await {
                tracing::warn!(design_id = %id, error = %e, "view count increment failed");
            }
        });
    }

    fn spawn_fork_count_bump(&self, id: DesignId) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.increment_fork_count(id).await {
                tracing::warn!(design_id = %id, error = %e, "fork count increment failed");
            }
        });
    }
}
