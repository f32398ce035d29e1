//! Canvas endpoints: the cards a user works on for one pathway
//!
//! Reads return the caller's private copy when one exists, else the shared
//! catalog cards. Writes route by role.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use pathways_common::models::cards_from_json;
use pathways_common::progress::{DisplayCards, ProgressService, SaveTarget};
use serde::Serialize;

use super::{parse_path_id, ApiJson, CardsBody};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/canvas/:pathway_id
pub async fn get_canvas(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pathway_id): Path<String>,
) -> ApiResult<Json<DisplayCards>> {
    let pathway_id = parse_path_id(&pathway_id)?;
    let service = ProgressService::new(state.catalog.as_ref(), state.users.as_ref());
    Ok(Json(service.display_cards(auth.actor.user_id, pathway_id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCanvasResponse {
    pub success: bool,
    pub saved_to: SaveTarget,
}

/// PUT /api/canvas/:pathway_id
///
/// Admins replace the shared catalog cards; everyone else replaces their own
/// progress record.
pub async fn put_canvas(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pathway_id): Path<String>,
    ApiJson(body): ApiJson<CardsBody>,
) -> ApiResult<Json<SaveCanvasResponse>> {
    let pathway_id = parse_path_id(&pathway_id)?;
    let cards = cards_from_json(body.cards)?;

    let service = ProgressService::new(state.catalog.as_ref(), state.users.as_ref());
    let saved_to = service.save_cards(&auth.actor, pathway_id, cards).await?;

    Ok(Json(SaveCanvasResponse {
        success: true,
        saved_to,
    }))
}

pub fn canvas_routes() -> Router<AppState> {
    Router::new().route("/api/canvas/:pathway_id", get(get_canvas).put(put_canvas))
}
