//! Progress reconciliation
//!
//! Each pathway has one shared card sequence in the catalog. A user who edits
//! their canvas gets a private copy (a progress record) that shadows the
//! catalog from then on. Users without a copy always see the latest catalog.
//!
//! Writes route by role: admins edit the catalog, everyone else edits their
//! own copy. Both paths replace the full card sequence.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{normalize_cards, Actor, Card, ProgressRecord};
use crate::store::{CatalogStore, UserStore};
use crate::{Error, Result};

/// Where a set of display cards came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSource {
    /// The user's private progress record
    Progress,
    /// The shared catalog entry
    Catalog,
    /// Neither exists (pathway deleted)
    None,
}

/// Cards to show on a user's canvas for one pathway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayCards {
    pub source: CardSource,
    pub cards: Vec<Card>,
}

/// Which document a save landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTarget {
    Catalog,
    Progress,
}

/// Reconciles per-user progress against the shared catalog
pub struct ProgressService<'a> {
    catalog: &'a dyn CatalogStore,
    users: &'a dyn UserStore,
}

impl<'a> ProgressService<'a> {
    pub fn new(catalog: &'a dyn CatalogStore, users: &'a dyn UserStore) -> Self {
        Self { catalog, users }
    }

    /// Cards to display for `(user_id, pathway_id)`
    ///
    /// A failed progress read falls back to the catalog; a failed catalog
    /// read is returned to the caller.
    pub async fn display_cards(&self, user_id: Uuid, pathway_id: Uuid) -> Result<DisplayCards> {
        match self.users.get_progress(user_id, pathway_id).await {
            Ok(Some(record)) => {
                debug!(%user_id, %pathway_id, "Serving private progress");
                return Ok(DisplayCards {
                    source: CardSource::Progress,
                    cards: record.cards,
                });
            }
            Ok(None) => {}
            Err(e) if e.is_store_unavailable() => {
                warn!(%user_id, %pathway_id, "Progress read failed, falling back to catalog: {}", e);
            }
            Err(e) => return Err(e),
        }

        match self.catalog.find_by_id(pathway_id).await? {
            Some(pathway) => Ok(DisplayCards {
                source: CardSource::Catalog,
                cards: pathway.cards,
            }),
            None => {
                debug!(%pathway_id, "Pathway absent from catalog, serving no cards");
                Ok(DisplayCards {
                    source: CardSource::None,
                    cards: Vec::new(),
                })
            }
        }
    }

    /// Replace the cards `actor` edits for `pathway_id`
    ///
    /// Admins replace the shared catalog entry; other users replace their own
    /// progress record. Cards are normalized before writing.
    pub async fn save_cards(
        &self,
        actor: &Actor,
        pathway_id: Uuid,
        cards: Vec<Card>,
    ) -> Result<SaveTarget> {
        if actor.is_admin {
            let cards = normalize_cards(cards);
            self.catalog.replace_cards(pathway_id, &cards).await?;
            info!(
                admin = %actor.email,
                %pathway_id,
                cards = cards.len(),
                "Catalog cards replaced"
            );
            return Ok(SaveTarget::Catalog);
        }

        self.save_progress(actor, pathway_id, cards).await?;
        Ok(SaveTarget::Progress)
    }

    /// Replace the actor's own progress record regardless of role
    pub async fn save_progress(
        &self,
        actor: &Actor,
        pathway_id: Uuid,
        cards: Vec<Card>,
    ) -> Result<()> {
        if self.catalog.find_by_id(pathway_id).await?.is_none() {
            return Err(Error::NotFound(format!("pathway {}", pathway_id)));
        }

        let cards = normalize_cards(cards);
        self.users
            .upsert_progress(actor.user_id, pathway_id, &cards)
            .await?;
        info!(
            user = %actor.email,
            %pathway_id,
            cards = cards.len(),
            "Private progress saved"
        );
        Ok(())
    }

    /// The actor's raw progress record, if any
    pub async fn progress(&self, actor: &Actor, pathway_id: Uuid) -> Result<Option<ProgressRecord>> {
        self.users.get_progress(actor.user_id, pathway_id).await
    }

    /// The catalog's shared cards; `NotFound` when the pathway is absent
    pub async fn catalog_cards(&self, pathway_id: Uuid) -> Result<Vec<Card>> {
        self.catalog
            .find_by_id(pathway_id)
            .await?
            .map(|p| p.cards)
            .ok_or_else(|| Error::NotFound(format!("pathway {}", pathway_id)))
    }
}
