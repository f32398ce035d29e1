//! Google OAuth 2.0 authorization-code client

use pathways_common::config::GoogleOAuthConfig;
use pathways_common::models::NewUser;
use pathways_common::store::UserStore;
use pathways_common::User;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ApiError;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid profile email";

/// OAuth flow errors
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("HTTP error talking to Google: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google rejected the request: {0}")]
    Rejected(String),

    #[error("Google profile has no email address")]
    MissingEmail,

    #[error("Invalid OAuth URL: {0}")]
    Url(String),
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        let message = err.to_string();
        match err {
            OAuthError::Url(_) => ApiError::Internal(message),
            OAuthError::MissingEmail => ApiError::BadRequest(message),
            OAuthError::Http(_) | OAuthError::Rejected(_) => ApiError::Upstream(message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Subset of the OpenID Connect userinfo document
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

impl GoogleProfile {
    /// Account fields for a first login; fails without an email
    pub fn into_new_user(self) -> Result<NewUser, OAuthError> {
        let email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(OAuthError::MissingEmail)?;
        let display_name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.clone());
        let first_name = self
            .given_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| display_name.clone());

        Ok(NewUser {
            provider_id: self.sub,
            display_name,
            first_name,
            last_name: self.family_name,
            email,
            image: self.picture,
        })
    }
}

/// Configured Google client
pub struct GoogleOAuth {
    config: GoogleOAuthConfig,
    http: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Consent screen URL carrying `state`
    pub fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
            ],
        )
        .map(|url| url.to_string())
        .map_err(|e| OAuthError::Url(e.to_string()))
    }

    /// Trade an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::Rejected(format!("token endpoint {}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        debug!("Exchanged authorization code for access token");
        Ok(token.access_token)
    }

    /// Profile of the account that granted `access_token`
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, OAuthError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OAuthError::Rejected(format!(
                "userinfo endpoint {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// Existing account for the provider id, or a newly created one
pub async fn find_or_create_user(
    users: &dyn UserStore,
    new_user: NewUser,
) -> pathways_common::Result<User> {
    if let Some(user) = users.find_by_provider_id(&new_user.provider_id).await? {
        debug!(user_id = %user.id, "Returning user signed in");
        return Ok(user);
    }

    let user = users.create(&new_user).await?;
    info!(user_id = %user.id, email = %user.email, "New user created");
    Ok(user)
}
