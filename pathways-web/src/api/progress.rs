//! The caller's own progress record, regardless of role

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use pathways_common::models::cards_from_json;
use pathways_common::progress::ProgressService;
use pathways_common::ProgressRecord;
use serde::Serialize;

use super::{parse_path_id, ApiJson, CardsBody};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub success: bool,
    pub progress: Option<ProgressRecord>,
}

/// GET /api/user/progress/:pathway_id
///
/// `progress` is null until the caller saves a private copy.
pub async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pathway_id): Path<String>,
) -> ApiResult<Json<ProgressResponse>> {
    let pathway_id = parse_path_id(&pathway_id)?;
    let service = ProgressService::new(state.catalog.as_ref(), state.users.as_ref());
    let progress = service.progress(&auth.actor, pathway_id).await?;
    Ok(Json(ProgressResponse {
        success: true,
        progress,
    }))
}

#[derive(Debug, Serialize)]
pub struct SaveProgressResponse {
    pub success: bool,
}

/// PUT /api/user/progress/:pathway_id
pub async fn put_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pathway_id): Path<String>,
    ApiJson(body): ApiJson<CardsBody>,
) -> ApiResult<Json<SaveProgressResponse>> {
    let pathway_id = parse_path_id(&pathway_id)?;
    let cards = cards_from_json(body.cards)?;

    let service = ProgressService::new(state.catalog.as_ref(), state.users.as_ref());
    service.save_progress(&auth.actor, pathway_id, cards).await?;

    Ok(Json(SaveProgressResponse { success: true }))
}

pub fn progress_routes() -> Router<AppState> {
    Router::new().route(
        "/api/user/progress/:pathway_id",
        get(get_progress).put(put_progress),
    )
}
