//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `inkwell_storefront`
//!
//! ## Tables
//!
//! - `storefront.design` - Saved studio designs with share/fork metadata
//! - `storefront.user` - Site accounts (managed by the auth collaborator)
//! - `sessions` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p inkwell-cli -- migrate storefront
//! ```
//!
//! # Store seam
//!
//! The design record store is a trait ([`DesignStore`]) so the service
//! layer can run against Postgres in production and the in-memory store
//! in tests and local development.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use inkwell_core::{DesignId, ShareId, UserId};

use crate::models::{Design, DesignPatch, NewDesign};

pub mod designs;
pub mod memory;

pub use designs::PgDesignStore;
pub use memory::MemoryDesignStore;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate share id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence interface for design records.
///
/// All operations are atomic at the single-record level; no cross-record
/// transaction is required by the sharing core. Counter increments are
/// separate operations because they are invoked fire-and-forget, off the
/// primary request path.
#[async_trait]
pub trait DesignStore: Send + Sync {
    /// Look up a design by its public share identifier.
    async fn find_by_share_id(
        &self,
        share_id: &ShareId,
    ) -> Result<Option<Design>, RepositoryError>;

    /// Look up a design by its internal ID.
    async fn find_by_id(&self, id: DesignId) -> Result<Option<Design>, RepositoryError>;

    /// Whether a share identifier is already assigned.
    ///
    /// Used by the minting loop; must not count as a view.
    async fn share_id_exists(&self, share_id: &ShareId) -> Result<bool, RepositoryError>;

    /// Persist a new design. The store assigns the ID and timestamps.
    ///
    /// Returns `RepositoryError::Conflict` if the share identifier is
    /// already taken.
    async fn create(&self, new: NewDesign) -> Result<Design, RepositoryError>;

    /// Apply a partial update, bumping `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` if the design doesn't exist.
    async fn update(&self, id: DesignId, patch: DesignPatch) -> Result<Design, RepositoryError>;

    /// Delete a design. Returns `false` if it didn't exist.
    async fn delete(&self, id: DesignId) -> Result<bool, RepositoryError>;

    /// All designs owned by a user, newest first.
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Design>, RepositoryError>;

    /// Bump the view counter by one. Atomic, tolerates lost updates.
    async fn increment_view_count(&self, id: DesignId) -> Result<(), RepositoryError>;

    /// Bump the fork counter by one. Atomic, tolerates lost updates.
    async fn increment_fork_count(&self, id: DesignId) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
