//! Profile endpoint

use axum::{extract::State, routing::get, Json, Router};
use pathways_common::{Pathway, User};
use serde::Serialize;
use tracing::debug;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: User,
    pub is_admin: bool,
    /// Selected pathways still present in the catalog, in selection order
    pub selected_pathways: Vec<Pathway>,
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let mut selected = Vec::with_capacity(auth.user.selected_pathways.len());
    for id in &auth.user.selected_pathways {
        match state.catalog.find_by_id(*id).await? {
            Some(pathway) => selected.push(pathway),
            None => debug!(pathway_id = %id, "Selected pathway no longer in catalog, skipping"),
        }
    }

    Ok(Json(ProfileResponse {
        is_admin: auth.actor.is_admin,
        user: auth.user,
        selected_pathways: selected,
    }))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/api/profile", get(get_profile))
}
