//! Catalog endpoints
//!
//! Reading the catalog needs a login; writing it needs admin capability.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use pathways_common::catalog::CatalogAdmin;
use pathways_common::models::cards_from_json;
use pathways_common::progress::ProgressService;
use pathways_common::{Card, Pathway};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{parse_path_id, ApiJson, CardsBody};
use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiResult;
use crate::AppState;

/// GET /api/pathways
///
/// Full catalog sorted by name.
pub async fn list_pathways(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Pathway>>> {
    let pathways = state.catalog.find_all().await?;
    debug!(user = %auth.actor.email, count = pathways.len(), "Catalog listed");
    Ok(Json(pathways))
}

#[derive(Debug, Deserialize)]
pub struct CreatePathwayRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct PathwayResponse {
    pub success: bool,
    pub pathway: Pathway,
}

/// POST /api/pathways (admin)
pub async fn create_pathway(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    ApiJson(request): ApiJson<CreatePathwayRequest>,
) -> ApiResult<Json<PathwayResponse>> {
    let pathway = CatalogAdmin::new(state.catalog.as_ref())
        .create(&actor, &request.name, &request.description)
        .await?;
    Ok(Json(PathwayResponse {
        success: true,
        pathway,
    }))
}

/// GET /api/pathways/:id/state
///
/// The shared catalog cards, ignoring the caller's own progress.
pub async fn get_pathway_state(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Card>>> {
    let id = parse_path_id(&id)?;
    let service = ProgressService::new(state.catalog.as_ref(), state.users.as_ref());
    Ok(Json(service.catalog_cards(id).await?))
}

#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub success: bool,
    pub cards: Vec<Card>,
}

/// PUT /api/pathways/:id/state (admin)
///
/// Replaces the shared cards wholesale.
pub async fn put_pathway_state(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CardsBody>,
) -> ApiResult<Json<CardsResponse>> {
    let id = parse_path_id(&id)?;
    let cards = cards_from_json(body.cards)?;

    let service = ProgressService::new(state.catalog.as_ref(), state.users.as_ref());
    service.save_cards(&actor, id, cards).await?;

    Ok(Json(CardsResponse {
        success: true,
        cards: service.catalog_cards(id).await?,
    }))
}

pub fn pathway_routes() -> Router<AppState> {
    Router::new()
        .route("/api/pathways", get(list_pathways).post(create_pathway))
        .route(
            "/api/pathways/:id/state",
            get(get_pathway_state).put(put_pathway_state),
        )
}
