//! Postgres-backed design repository.
//!
//! Queries use the runtime sqlx API (not the compile-time macros) so the
//! workspace builds without a live database. Row mapping is centralized in
//! `design_from_row`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use inkwell_core::{DesignId, ShareId, UserId};

use super::{DesignStore, RepositoryError};
use crate::models::{Design, DesignPatch, NewDesign};

/// Columns selected for every design query, in `design_from_row` order.
const DESIGN_COLUMNS: &str = "id, share_id, owner_id, name, description, canvas_data, \
     thumbnail, is_public, parent_design_id, view_count, fork_count, created_at, updated_at";

/// Postgres implementation of [`DesignStore`].
#[derive(Clone)]
pub struct PgDesignStore {
    pool: PgPool,
}

impl PgDesignStore {
    /// Create a new store backed by the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a database row to the domain type.
fn design_from_row(row: &PgRow) -> Result<Design, RepositoryError> {
    Ok(Design {
        id: row.try_get::<DesignId, _>("id")?,
        share_id: row.try_get::<ShareId, _>("share_id")?,
        owner_id: row.try_get::<Option<UserId>, _>("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        canvas_data: row.try_get::<serde_json::Value, _>("canvas_data")?,
        thumbnail: row.try_get("thumbnail")?,
        is_public: row.try_get("is_public")?,
        parent_design_id: row.try_get::<Option<DesignId>, _>("parent_design_id")?,
        view_count: row.try_get("view_count")?,
        fork_count: row.try_get("fork_count")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl DesignStore for PgDesignStore {
    async fn find_by_share_id(
        &self,
        share_id: &ShareId,
    ) -> Result<Option<Design>, RepositoryError> {
        let sql = format!("SELECT {DESIGN_COLUMNS} FROM storefront.design WHERE share_id = $1");
        let row = sqlx::query(&sql)
            .bind(share_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(design_from_row).transpose()
    }

    async fn find_by_id(&self, id: DesignId) -> Result<Option<Design>, RepositoryError> {
        let sql = format!("SELECT {DESIGN_COLUMNS} FROM storefront.design WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(design_from_row).transpose()
    }

    async fn share_id_exists(&self, share_id: &ShareId) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM storefront.design WHERE share_id = $1")
            .bind(share_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn create(&self, new: NewDesign) -> Result<Design, RepositoryError> {
        let sql = format!(
            "INSERT INTO storefront.design \
                 (share_id, owner_id, name, description, canvas_data, thumbnail, \
                  is_public, parent_design_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {DESIGN_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(new.share_id.as_str())
            .bind(new.owner_id)
            .bind(&new.name)
            .bind(&new.description)
            .bind(&new.canvas_data)
            .bind(&new.thumbnail)
            .bind(new.is_public)
            .bind(new.parent_design_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("share id already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        design_from_row(&row)
    }

    async fn update(&self, id: DesignId, patch: DesignPatch) -> Result<Design, RepositoryError> {
        let sql = format!(
            "UPDATE storefront.design \
             SET name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 canvas_data = COALESCE($4, canvas_data), \
                 thumbnail = COALESCE($5, thumbnail), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {DESIGN_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(&patch.canvas_data)
            .bind(&patch.thumbnail)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        design_from_row(&row)
    }

    async fn delete(&self, id: DesignId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.design WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Design>, RepositoryError> {
        let sql = format!(
            "SELECT {DESIGN_COLUMNS} FROM storefront.design \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(design_from_row).collect()
    }

    async fn increment_view_count(&self, id: DesignId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE storefront.design SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn increment_fork_count(&self, id: DesignId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE storefront.design SET fork_count = fork_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
