//! Request extractors that turn a session cookie into an [`Actor`]
//!
//! Handlers take [`AuthUser`] to require login and [`AdminUser`] to require
//! admin capability. Admin status is re-checked on every request.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use pathways_common::{Actor, User};
use tracing::debug;

use super::session::{read_cookie, SESSION_COOKIE};
use crate::error::ApiError;
use crate::AppState;

/// A logged-in caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub actor: Actor,
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| ApiError::Unauthenticated("not logged in".to_string()))?;

        let user_id = state
            .sessions
            .lookup(&token)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("session expired or invalid".to_string()))?;

        let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
            debug!(%user_id, "Session refers to a missing user");
            ApiError::Unauthenticated("account no longer exists".to_string())
        })?;

        let actor = Actor {
            user_id: user.id,
            email: user.email.clone(),
            is_admin: state.admins.is_admin(&user.email).await,
        };

        Ok(AuthUser { actor, user })
    }
}

/// A logged-in caller holding admin capability
#[derive(Debug, Clone)]
pub struct AdminUser(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser { actor, .. } = AuthUser::from_request_parts(parts, state).await?;
        actor.require_admin()?;
        Ok(AdminUser(actor))
    }
}
