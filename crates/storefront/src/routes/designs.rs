//! Design route handlers.
//!
//! JSON API for saving, sharing, forking, listing, and deleting designs.
//! Share resolution and forking are public paths; everything owner-scoped
//! goes through [`RequireAuth`].

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use inkwell_core::DesignId;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Design, DesignView};
use crate::services::designs::CreateDesign;
use crate::services::{share_base_url, share_url};
use crate::state::AppState;

/// A design plus its public share URL, returned from save and fork.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignWithUrl {
    #[serde(flatten)]
    pub design: Design,
    pub share_url: String,
}

/// Request body for saving a design from the studio.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDesignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub canvas_data: serde_json::Value,
    pub thumbnail: Option<String>,
}

/// Query parameters for design deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<i32>,
}

/// Derive the share-link base from the request, config as fallback.
fn request_base_url(headers: &HeaderMap, state: &AppState) -> String {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    share_base_url(origin, host, &state.config().base_url)
}

/// Resolve a public share link.
///
/// GET /designs/share/{share_id}
///
/// No auth. Returns the read-only projection (owner identity is never
/// exposed here) and bumps the view counter in the background.
#[instrument(skip(state))]
pub async fn share(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> Result<Json<DesignView>> {
    let view = state.designs().resolve_share(&share_id).await?;
    Ok(Json(view))
}

/// Fork a shared design into the caller's own editable copy.
///
/// POST /designs/{share_id}/fork
///
/// Auth optional: anonymous visitors can fork too.
#[instrument(skip(state, headers, user))]
pub async fn fork(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(share_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let forked = state
        .designs()
        .fork(&share_id, user.map(|u| u.id))
        .await?;

    let base = request_base_url(&headers, &state);
    let url = share_url(&base, &forked.share_id);

    Ok((
        StatusCode::CREATED,
        Json(DesignWithUrl {
            design: forked,
            share_url: url,
        }),
    ))
}

/// Save a new design.
///
/// POST /designs
///
/// Auth required. The canvas payload must carry front and back decal
/// layers; beyond that shape check it is stored verbatim.
#[instrument(skip(state, headers, user, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Json(req): Json<CreateDesignRequest>,
) -> Result<impl IntoResponse> {
    if !req.canvas_data.is_object()
        || req.canvas_data.get("front").is_none()
        || req.canvas_data.get("back").is_none()
    {
        return Err(AppError::BadRequest(
            "canvasData must include front and back layers".to_owned(),
        ));
    }

    let design = state
        .designs()
        .create(
            user.id,
            CreateDesign {
                name: req.name,
                description: req.description,
                canvas_data: req.canvas_data,
                thumbnail: req.thumbnail,
            },
        )
        .await?;

    let base = request_base_url(&headers, &state);
    let url = share_url(&base, &design.share_id);

    Ok((
        StatusCode::CREATED,
        Json(DesignWithUrl {
            design,
            share_url: url,
        }),
    ))
}

/// List the caller's designs, newest first.
///
/// GET /designs
#[instrument(skip(state, user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Design>>> {
    let designs = state.designs().list_for_owner(user.id).await?;
    Ok(Json(designs))
}

/// Delete an owned design.
///
/// DELETE /designs?id={id}
///
/// 400 if the id is missing, 404 if unknown, 403 if the design belongs
/// to a different owner.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<DeleteParams>,
) -> Result<Json<serde_json::Value>> {
    let id = params
        .id
        .ok_or_else(|| AppError::BadRequest("missing design id".to_owned()))?;

    state.designs().delete(user.id, DesignId::new(id)).await?;
    Ok(Json(json!({"success": true})))
}
