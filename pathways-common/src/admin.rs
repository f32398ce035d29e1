//! Admin capability checks
//!
//! An account is an admin when its email appears in an allow-list. The check
//! is case-insensitive. Callers depend on [`AdminAuthority`] only, so the
//! backing store can change without touching the core services.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{error, warn};

/// Decides whether an email holds admin capability
#[async_trait]
pub trait AdminAuthority: Send + Sync {
    async fn is_admin(&self, email: &str) -> bool;
}

/// Parse allow-list text: one email per line, `#` comments and blanks skipped
pub fn parse_allow_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Fixed in-memory allow-list
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }
}

#[async_trait]
impl AdminAuthority for AllowList {
    async fn is_admin(&self, email: &str) -> bool {
        let email = email.trim();
        !email.is_empty() && self.emails.contains(&email.to_lowercase())
    }
}

/// Allow-list file re-read on every check
///
/// Edits to the file take effect without a restart. A missing or unreadable
/// file grants nobody admin.
#[derive(Debug, Clone)]
pub struct AdminsFile {
    path: PathBuf,
}

impl AdminsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AdminAuthority for AdminsFile {
    async fn is_admin(&self, email: &str) -> bool {
        let email = email.trim();
        if email.is_empty() {
            warn!("No email provided for admin check");
            return false;
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => parse_allow_list(&text).contains(&email.to_lowercase()),
            Err(e) => {
                error!("Failed to read admins file {}: {}", self.path.display(), e);
                false
            }
        }
    }
}
