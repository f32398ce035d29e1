//! Server-side login sessions
//!
//! The browser holds a random token in the `pathways_session` cookie. Only its
//! SHA-256 digest is stored, so a leaked database cannot be replayed as a
//! cookie. Expired rows are ignored on lookup and removed lazily.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use pathways_common::Result;

/// Session cookie name
pub const SESSION_COOKIE: &str = "pathways_session";

/// Short-lived cookie carrying the OAuth `state` value
pub const OAUTH_STATE_COOKIE: &str = "pathways_oauth_state";

/// Lifetime of the OAuth state cookie in seconds
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;

/// Random 256-bit token, hex encoded
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

/// Digest stored in place of the raw token
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// SQLite-backed session table
#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(pool: SqlitePool, ttl_hours: i64) -> Self {
        Self {
            pool,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.ttl = Duration::hours(hours);
        self
    }

    /// Session lifetime in seconds, used for the cookie `Max-Age`
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Start a session for `user_id` and return the raw token
    pub async fn create(&self, user_id: Uuid) -> Result<String> {
        let token = generate_token();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(hash_token(&token))
        .bind(user_id.to_string())
        .bind(now.to_rfc3339())
        .bind((now + self.ttl).to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!(%user_id, "Session created");
        Ok(token)
    }

    /// User owning a live session, or `None` for unknown or expired tokens
    pub async fn lookup(&self, token: &str) -> Result<Option<Uuid>> {
        let token_hash = hash_token(token);
        let row = sqlx::query("SELECT user_id, expires_at FROM sessions WHERE token_hash = ?")
            .bind(&token_hash)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: String = row.try_get("user_id")?;
        let expires_at: String = row.try_get("expires_at")?;

        let expired = DateTime::parse_from_rfc3339(&expires_at)
            .map(|t| t.with_timezone(&Utc) <= Utc::now())
            .unwrap_or(true);
        if expired {
            debug!("Dropping expired session");
            sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
                .bind(&token_hash)
                .execute(&self.pool)
                .await?;
            return Ok(None);
        }

        match Uuid::parse_str(&user_id) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!("Session row has invalid user id '{}': {}", user_id, e);
                Ok(None)
            }
        }
    }

    /// End the session for `token`; unknown tokens are ignored
    pub async fn delete(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove every expired session, returning how many were dropped
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Value of cookie `name` from the request headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value for an HttpOnly, SameSite=Lax cookie
pub fn build_cookie(name: &str, value: &str, path: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite=Lax",
        name, value, path, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes cookie `name`
pub fn expired_cookie(name: &str, path: &str, secure: bool) -> String {
    build_cookie(name, "", path, 0, secure)
}
