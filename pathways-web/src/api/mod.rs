//! HTTP API handlers for pathways-web

pub mod admin;
pub mod buildinfo;
pub mod canvas;
pub mod health;
pub mod pathways;
pub mod profile;
pub mod progress;
pub mod selection;

pub use admin::admin_routes;
pub use buildinfo::buildinfo_routes;
pub use canvas::canvas_routes;
pub use health::health_routes;
pub use pathways::pathway_routes;
pub use profile::profile_routes;
pub use progress::progress_routes;
pub use selection::selection_routes;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Request body carrying a full card sequence
///
/// `cards` is kept raw so a non-array value reports a validation error
/// instead of a generic JSON rejection.
#[derive(Debug, Deserialize)]
pub struct CardsBody {
    #[serde(default)]
    pub cards: serde_json::Value,
}

/// Parse a pathway id taken from the URL path
pub(crate) fn parse_path_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid pathway id '{}'", raw)))
}

/// JSON request body whose rejections use the API error body
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::BadRequest(rejection.body_text()))
            }
        }
    }
}
