//! Admin catalog endpoints
//!
//! Every handler takes [`AdminUser`], so non-admins get 403 before any
//! body is read.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use pathways_common::catalog::{
    BulkEntryError, BulkPathwayUpdate, CatalogAdmin, CatalogDiagnostics,
};
use pathways_common::models::PathwayUpdate;
use pathways_common::Pathway;
use serde::{Deserialize, Serialize};

use super::{parse_path_id, ApiJson};
use super::pathways::PathwayResponse;
use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/pathways/all
pub async fn list_all(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
) -> ApiResult<Json<Vec<Pathway>>> {
    let pathways = CatalogAdmin::new(state.catalog.as_ref()).list(&actor).await?;
    Ok(Json(pathways))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResponse {
    pub success: bool,
    pub modified_count: usize,
    pub errors: Vec<BulkEntryError>,
}

/// PUT /api/pathways/all
///
/// Best-effort: each entry is applied on its own and failures are listed.
pub async fn bulk_update(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    ApiJson(updates): ApiJson<Vec<BulkPathwayUpdate>>,
) -> ApiResult<Json<BulkUpdateResponse>> {
    let result = CatalogAdmin::new(state.catalog.as_ref())
        .bulk_update(&actor, updates)
        .await?;
    Ok(Json(BulkUpdateResponse {
        success: true,
        modified_count: result.modified_count,
        errors: result.errors,
    }))
}

/// PUT /api/pathways/:id
pub async fn update_pathway(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<PathwayUpdate>,
) -> ApiResult<Json<PathwayResponse>> {
    let id = parse_path_id(&id)?;
    let pathway = CatalogAdmin::new(state.catalog.as_ref())
        .update(&actor, id, fields)
        .await?;
    Ok(Json(PathwayResponse {
        success: true,
        pathway,
    }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// DELETE /api/pathways/:id
pub async fn delete_pathway(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_path_id(&id)?;
    CatalogAdmin::new(state.catalog.as_ref())
        .delete(&actor, id)
        .await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[derive(Debug, Serialize)]
pub struct PathwayTextResponse {
    pub pathway: Pathway,
    pub text: String,
}

/// GET /api/pathways/:id/text
///
/// The pathway with its cards rendered in the checklist text format.
pub async fn get_pathway_text(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PathwayTextResponse>> {
    let id = parse_path_id(&id)?;
    let (pathway, text) = CatalogAdmin::new(state.catalog.as_ref())
        .cards_text(&actor, id)
        .await?;
    Ok(Json(PathwayTextResponse { pathway, text }))
}

#[derive(Debug, Deserialize)]
pub struct PathwayTextRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
}

/// PUT /api/pathways/:id/text
///
/// Replaces name, description and all cards from the text editor.
pub async fn put_pathway_text(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PathwayTextRequest>,
) -> ApiResult<Json<PathwayResponse>> {
    let id = parse_path_id(&id)?;
    let pathway = CatalogAdmin::new(state.catalog.as_ref())
        .edit_from_text(&actor, id, &request.name, &request.description, &request.text)
        .await?;
    Ok(Json(PathwayResponse {
        success: true,
        pathway,
    }))
}

/// GET /api/diagnostics
pub async fn diagnostics(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
) -> ApiResult<Json<CatalogDiagnostics>> {
    let report = CatalogAdmin::new(state.catalog.as_ref())
        .diagnostics(&actor)
        .await?;
    Ok(Json(report))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/pathways/all", get(list_all).put(bulk_update))
        .route(
            "/api/pathways/:id",
            put(update_pathway).delete(delete_pathway),
        )
        .route(
            "/api/pathways/:id/text",
            get(get_pathway_text).put(put_pathway_text),
        )
        .route("/api/diagnostics", get(diagnostics))
}
