//! `/auth/*` endpoints: Google login, logout and session status

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::extract::AuthUser;
use super::google::find_or_create_user;
use super::session::{
    build_cookie, expired_cookie, generate_token, read_cookie, OAUTH_STATE_COOKIE,
    OAUTH_STATE_MAX_AGE_SECS, SESSION_COOKIE,
};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const STATE_COOKIE_PATH: &str = "/auth";

/// GET /auth/google
///
/// Redirects to Google's consent screen with a fresh `state` value.
pub async fn google_login(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Google login is not configured".to_string()))?;

    let oauth_state = generate_token();
    let location = google.authorize_url(&oauth_state)?;
    let cookie = build_cookie(
        OAUTH_STATE_COOKIE,
        &oauth_state,
        STATE_COOKIE_PATH,
        OAUTH_STATE_MAX_AGE_SECS,
        state.secure_cookies,
    );

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(&location)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/google/callback
///
/// Verifies `state`, signs the user in and redirects home.
pub async fn google_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> ApiResult<impl IntoResponse> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Google login is not configured".to_string()))?;

    if let Some(error) = params.error {
        warn!("Google login declined: {}", error);
        return Err(ApiError::BadRequest(format!("login failed: {}", error)));
    }

    let expected = read_cookie(&headers, OAUTH_STATE_COOKIE);
    match (expected.as_deref(), params.state.as_deref()) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => {}
        _ => {
            warn!("OAuth state mismatch on callback");
            return Err(ApiError::BadRequest("OAuth state mismatch".to_string()));
        }
    }

    let code = params
        .code
        .ok_or_else(|| ApiError::BadRequest("missing authorization code".to_string()))?;

    let access_token = google.exchange_code(&code).await?;
    let profile = google.fetch_profile(&access_token).await?;
    let user = find_or_create_user(state.users.as_ref(), profile.into_new_user()?).await?;

    let token = state.sessions.create(user.id).await?;
    info!(user_id = %user.id, email = %user.email, "User logged in");

    let session = build_cookie(
        SESSION_COOKIE,
        &token,
        "/",
        state.sessions.ttl_secs(),
        state.secure_cookies,
    );
    let clear_state = expired_cookie(OAUTH_STATE_COOKIE, STATE_COOKIE_PATH, state.secure_cookies);

    Ok((
        AppendHeaders([(SET_COOKIE, session), (SET_COOKIE, clear_state)]),
        Redirect::to("/"),
    ))
}

/// GET /auth/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<impl IntoResponse> {
    if let Some(token) = read_cookie(&headers, SESSION_COOKIE) {
        state.sessions.delete(&token).await?;
        info!("User logged out");
    }

    let cleared = expired_cookie(SESSION_COOKIE, "/", state.secure_cookies);
    Ok((AppendHeaders([(SET_COOKIE, cleared)]), Redirect::to("/")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUser {
    pub id: Uuid,
    pub display_name: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<StatusUser>,
}

/// GET /auth/status
///
/// Never fails with 401; reports whether the caller has a live session.
pub async fn status(auth: Option<AuthUser>) -> Json<AuthStatus> {
    let user = auth.map(|AuthUser { user, .. }| StatusUser {
        id: user.id,
        display_name: user.display_name,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        image: user.image,
    });

    Json(AuthStatus {
        is_authenticated: user.is_some(),
        user,
    })
}

/// Build auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/logout", get(logout))
        .route("/auth/status", get(status))
}
