//! Persistence contracts for the pathway catalog and user progress
//!
//! The core services only see these traits. Apart from the seeding bulk
//! insert, each method targets a single document (one pathway row or one
//! user's data) and concurrent writers race last-write-wins.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Card, NewUser, Pathway, PathwayUpdate, ProgressRecord, User};
use crate::Result;

/// Shared, admin-owned pathway catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All pathways sorted by name
    async fn find_all(&self) -> Result<Vec<Pathway>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pathway>>;

    /// Create a pathway with no cards. Duplicate names fail with `Validation`.
    async fn create(&self, name: &str, description: &str) -> Result<Pathway>;

    /// Insert fully-populated pathways in one transaction (seeding).
    /// Either every pathway lands or none does.
    async fn insert_all(&self, pathways: &[Pathway]) -> Result<()>;

    /// Apply a partial update. `NotFound` when absent.
    async fn update(&self, id: Uuid, fields: &PathwayUpdate) -> Result<Pathway>;

    /// `NotFound` when absent
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Replace the card sequence wholesale. `NotFound` when absent.
    async fn replace_cards(&self, id: Uuid, cards: &[Card]) -> Result<()>;

    /// Replace name, description and cards in one write. `NotFound` when absent.
    async fn replace_content(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        cards: &[Card],
    ) -> Result<Pathway>;

    async fn count(&self) -> Result<i64>;
}

/// Per-user selections and private progress copies
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_provider_id(&self, provider_id: &str) -> Result<Option<User>>;

    async fn create(&self, user: &NewUser) -> Result<User>;

    /// Overwrite the selected set. `NotFound` when the user is absent.
    async fn update_selected_pathways(&self, id: Uuid, pathway_ids: &[Uuid]) -> Result<()>;

    /// Insert or fully replace the progress record for `(id, pathway_id)`.
    /// `NotFound` when the user is absent.
    async fn upsert_progress(&self, id: Uuid, pathway_id: Uuid, cards: &[Card]) -> Result<()>;

    async fn get_progress(&self, id: Uuid, pathway_id: Uuid) -> Result<Option<ProgressRecord>>;
}
