//! Design domain types.
//!
//! A design is a saved studio canvas with a public share identifier.
//! The canvas payload (decal layers, garment color, product type) is an
//! opaque JSON document: the storefront stores and copies it verbatim and
//! never interprets its contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inkwell_core::{DesignId, ShareId, UserId};

/// Name given to designs saved without an explicit name.
pub const DEFAULT_DESIGN_NAME: &str = "Untitled Design";

/// Display name for a fork of `parent_name`.
#[must_use]
pub fn fork_name(parent_name: &str) -> String {
    format!("{parent_name} (Copy)")
}

/// A saved design (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    /// Internal database ID, owned by the store.
    pub id: DesignId,
    /// Public 8-character identifier, immutable once assigned.
    pub share_id: ShareId,
    /// Owning user; `None` for anonymous designs.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Opaque canvas payload, stored verbatim.
    pub canvas_data: serde_json::Value,
    /// Optional rendered preview (URL or data URI).
    pub thumbnail: Option<String>,
    /// Reserved flag: every design is currently created public, and this
    /// is not consulted as an access-control gate.
    pub is_public: bool,
    /// Design this one was forked from, if any. One-way provenance edge:
    /// the parent may later be deleted, orphaning the link.
    pub parent_design_id: Option<DesignId>,
    /// Times the share link was resolved. Analytics-grade, not exact.
    pub view_count: i64,
    /// Times this design was forked. Analytics-grade, not exact.
    pub fork_count: i64,
    /// When the design was created.
    pub created_at: DateTime<Utc>,
    /// When the design was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a design. The store assigns the ID and timestamps;
/// the caller supplies the (already minted) share ID.
#[derive(Debug, Clone)]
pub struct NewDesign {
    pub share_id: ShareId,
    pub owner_id: Option<UserId>,
    pub name: String,
    pub description: Option<String>,
    pub canvas_data: serde_json::Value,
    pub thumbnail: Option<String>,
    pub is_public: bool,
    pub parent_design_id: Option<DesignId>,
}

/// Partial update for a design. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub canvas_data: Option<serde_json::Value>,
    pub thumbnail: Option<String>,
}

impl DesignPatch {
    /// Whether the patch changes anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.canvas_data.is_none()
            && self.thumbnail.is_none()
    }
}

/// Read-only projection served on the public share path.
///
/// Deliberately excludes `owner_id` and `is_public`: viewers of a share
/// link never learn whether the design is anonymous or who saved it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignView {
    pub id: DesignId,
    pub share_id: ShareId,
    pub name: String,
    pub description: Option<String>,
    pub canvas_data: serde_json::Value,
    pub thumbnail: Option<String>,
    pub view_count: i64,
    pub fork_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Design> for DesignView {
    fn from(design: Design) -> Self {
        Self {
            id: design.id,
            share_id: design.share_id,
            name: design.name,
            description: design.description,
            canvas_data: design.canvas_data,
            thumbnail: design.thumbnail,
            view_count: design.view_count,
            fork_count: design.fork_count,
            created_at: design.created_at,
            updated_at: design.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_design() -> Design {
        Design {
            id: DesignId::new(1),
            share_id: ShareId::parse("a1b2c3d4").unwrap(),
            owner_id: Some(UserId::new(9)),
            name: "Team Tee".to_owned(),
            description: None,
            canvas_data: json!({"front": [], "back": [], "color": "black", "type": "tshirt"}),
            thumbnail: None,
            is_public: true,
            parent_design_id: None,
            view_count: 3,
            fork_count: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fork_name() {
        assert_eq!(fork_name("Team Tee"), "Team Tee (Copy)");
        assert_eq!(
            fork_name("Team Tee (Copy)"),
            "Team Tee (Copy) (Copy)"
        );
    }

    #[test]
    fn test_view_excludes_owner() {
        let view = DesignView::from(sample_design());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("ownerId").is_none());
        assert!(json.get("isPublic").is_none());
        assert_eq!(json["shareId"], "a1b2c3d4");
        assert_eq!(json["canvasData"]["color"], "black");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(DesignPatch::default().is_empty());
        let patch = DesignPatch {
            name: Some("New".to_owned()),
            ..DesignPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
