//! pathways-web library - HTTP service for the career pathways canvas
//!
//! Learners sign in with Google, pick three career pathways and work through
//! each pathway's checklist cards. Admins curate the shared catalog.

use std::sync::Arc;

use axum::Router;
use pathways_common::config::{GoogleOAuthConfig, DEFAULT_SESSION_TTL_HOURS};
use pathways_common::db::{SqliteCatalog, SqliteUsers};
use pathways_common::store::{CatalogStore, UserStore};
use pathways_common::AdminAuthority;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod api;
pub mod auth;
pub mod error;

pub use error::{ApiError, ApiResult};

use auth::{GoogleOAuth, SessionStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared pathway catalog
    pub catalog: Arc<dyn CatalogStore>,
    /// User accounts, selections and progress records
    pub users: Arc<dyn UserStore>,
    /// Decides admin capability per request
    pub admins: Arc<dyn AdminAuthority>,
    pub sessions: SessionStore,
    /// `None` disables the `/auth/google` routes
    pub google: Option<Arc<GoogleOAuth>>,
    /// Mark cookies `Secure` (deployments behind HTTPS)
    pub secure_cookies: bool,
}

impl AppState {
    /// State backed by SQLite stores on `pool`
    pub fn new(pool: SqlitePool, admins: Arc<dyn AdminAuthority>) -> Self {
        Self {
            catalog: Arc::new(SqliteCatalog::new(pool.clone())),
            users: Arc::new(SqliteUsers::new(pool.clone())),
            admins,
            sessions: SessionStore::new(pool, DEFAULT_SESSION_TTL_HOURS),
            google: None,
            secure_cookies: false,
        }
    }

    pub fn with_session_ttl_hours(mut self, hours: i64) -> Self {
        self.sessions = self.sessions.with_ttl_hours(hours);
        self
    }

    pub fn with_google(mut self, config: GoogleOAuthConfig) -> Self {
        self.google = Some(Arc::new(GoogleOAuth::new(config)));
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

/// Build application router
///
/// Authentication is enforced per handler by the [`auth::AuthUser`] and
/// [`auth::AdminUser`] extractors, so public and protected routes share one
/// router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::buildinfo_routes())
        .merge(auth::auth_routes())
        .merge(api::pathway_routes())
        .merge(api::selection_routes())
        .merge(api::profile_routes())
        .merge(api::canvas_routes())
        .merge(api::progress_routes())
        .merge(api::admin_routes())
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            ),
        )
        .with_state(state)
}
