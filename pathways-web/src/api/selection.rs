//! Pathway selection endpoints

use axum::{extract::State, routing::get, Json, Router};
use pathways_common::selection::{parse_pathway_ids, select_pathways, selected_pathways};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiJson;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPathwaysResponse {
    pub selected_pathways: Vec<Uuid>,
}

/// GET /api/selected-pathways
///
/// The caller's stored selection; empty before the first choice.
pub async fn get_selected_pathways(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SelectedPathwaysResponse>> {
    let ids = selected_pathways(state.users.as_ref(), &auth.actor).await?;
    Ok(Json(SelectedPathwaysResponse {
        selected_pathways: ids,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPathwaysRequest {
    #[serde(default)]
    pub pathway_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPathwaysResponse {
    pub success: bool,
    pub selected_pathways: Vec<Uuid>,
}

/// POST /api/selected-pathways
///
/// Replaces the selection with exactly three distinct existing pathways.
pub async fn post_selected_pathways(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<SelectPathwaysRequest>,
) -> ApiResult<Json<SelectPathwaysResponse>> {
    let ids = parse_pathway_ids(&request.pathway_ids)?;
    select_pathways(
        state.catalog.as_ref(),
        state.users.as_ref(),
        &auth.actor,
        &ids,
    )
    .await?;

    Ok(Json(SelectPathwaysResponse {
        success: true,
        selected_pathways: ids,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAdminResponse {
    pub is_admin: bool,
}

/// GET /api/check-admin
pub async fn check_admin(auth: AuthUser) -> Json<CheckAdminResponse> {
    Json(CheckAdminResponse {
        is_admin: auth.actor.is_admin,
    })
}

pub fn selection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/selected-pathways",
            get(get_selected_pathways).post(post_selected_pathways),
        )
        .route("/api/check-admin", get(check_admin))
}
