//! Admin catalog operations
//!
//! Every operation here mutates or exposes the shared catalog and requires
//! admin capability on the acting user.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cards_text::{format_cards_text, parse_cards_text};
use crate::db::seed::DEFAULT_PATHWAYS;
use crate::models::{cards_from_json, validate_pathway_name, Actor, Pathway, PathwayUpdate};
use crate::store::CatalogStore;
use crate::{Error, Result};

/// One entry of a bulk catalog update
#[derive(Debug, Clone, Deserialize)]
pub struct BulkPathwayUpdate {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Raw cards payload; anything other than an array leaves cards untouched
    #[serde(default)]
    pub cards: Option<serde_json::Value>,
}

/// Failure of a single bulk entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEntryError {
    pub index: usize,
    pub id: Uuid,
    pub message: String,
}

/// Outcome of a best-effort bulk update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResult {
    pub modified_count: usize,
    pub errors: Vec<BulkEntryError>,
}

/// Catalog sync status against the built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDiagnostics {
    pub status: String,
    pub pathways_in_db: usize,
    pub default_pathways: usize,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

/// Admin-only operations over the shared catalog
pub struct CatalogAdmin<'a> {
    catalog: &'a dyn CatalogStore,
}

impl<'a> CatalogAdmin<'a> {
    pub fn new(catalog: &'a dyn CatalogStore) -> Self {
        Self { catalog }
    }

    /// Full catalog including cards
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Pathway>> {
        actor.require_admin()?;
        self.catalog.find_all().await
    }

    pub async fn create(&self, actor: &Actor, name: &str, description: &str) -> Result<Pathway> {
        actor.require_admin()?;
        let name = validate_pathway_name(name)?;
        let pathway = self.catalog.create(&name, description.trim()).await?;
        info!(admin = %actor.email, pathway_id = %pathway.id, name = %pathway.name, "Pathway created");
        Ok(pathway)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, fields: PathwayUpdate) -> Result<Pathway> {
        actor.require_admin()?;
        let fields = PathwayUpdate {
            name: fields.name.as_deref().map(validate_pathway_name).transpose()?,
            description: fields.description,
        };
        let pathway = self.catalog.update(id, &fields).await?;
        info!(admin = %actor.email, pathway_id = %id, "Pathway updated");
        Ok(pathway)
    }

    /// Delete a pathway. Users' selections and progress copies are left as-is.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        actor.require_admin()?;
        self.catalog.delete(id).await?;
        info!(admin = %actor.email, pathway_id = %id, "Pathway deleted");
        Ok(())
    }

    /// Cards of a pathway rendered in the editor text format
    pub async fn cards_text(&self, actor: &Actor, id: Uuid) -> Result<(Pathway, String)> {
        actor.require_admin()?;
        let pathway = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("pathway {}", id)))?;
        let text = format_cards_text(&pathway.cards);
        Ok((pathway, text))
    }

    /// Replace name, description and cards from the editor form
    pub async fn edit_from_text(
        &self,
        actor: &Actor,
        id: Uuid,
        name: &str,
        description: &str,
        cards_text: &str,
    ) -> Result<Pathway> {
        actor.require_admin()?;
        let name = validate_pathway_name(name)?;
        let cards = parse_cards_text(cards_text);
        let pathway = self
            .catalog
            .replace_content(id, &name, description.trim(), &cards)
            .await?;
        info!(
            admin = %actor.email,
            pathway_id = %id,
            cards = pathway.cards.len(),
            "Pathway updated from text"
        );
        Ok(pathway)
    }

    /// Apply each entry independently
    ///
    /// A failing entry does not stop the others and nothing is rolled back.
    /// Entries are counted as modified when their write succeeded.
    pub async fn bulk_update(
        &self,
        actor: &Actor,
        updates: Vec<BulkPathwayUpdate>,
    ) -> Result<BulkUpdateResult> {
        actor.require_admin()?;

        let mut result = BulkUpdateResult {
            modified_count: 0,
            errors: Vec::new(),
        };

        for (index, update) in updates.into_iter().enumerate() {
            let id = update.id;
            match self.apply_bulk_entry(update).await {
                Ok(()) => result.modified_count += 1,
                Err(e) => {
                    warn!(pathway_id = %id, "Bulk pathway update entry failed: {}", e);
                    result.errors.push(BulkEntryError {
                        index,
                        id,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            admin = %actor.email,
            modified = result.modified_count,
            failed = result.errors.len(),
            "Bulk pathway update finished"
        );
        Ok(result)
    }

    async fn apply_bulk_entry(&self, update: BulkPathwayUpdate) -> Result<()> {
        // Empty strings leave the field untouched
        let fields = PathwayUpdate {
            name: update.name.filter(|n| !n.trim().is_empty()),
            description: update.description.filter(|d| !d.is_empty()),
        };
        let fields = PathwayUpdate {
            name: fields.name.as_deref().map(validate_pathway_name).transpose()?,
            description: fields.description,
        };

        let cards = match update.cards {
            Some(value) if value.is_array() => Some(cards_from_json(value)?),
            _ => {
                warn!(
                    pathway_id = %update.id,
                    "Bulk entry has no valid 'cards' array, skipping card update"
                );
                None
            }
        };

        match (fields.is_empty(), cards) {
            (true, None) => {
                // Nothing to write; still confirm the target exists
                if self.catalog.find_by_id(update.id).await?.is_none() {
                    return Err(Error::NotFound(format!("pathway {}", update.id)));
                }
            }
            (true, Some(cards)) => self.catalog.replace_cards(update.id, &cards).await?,
            (false, None) => {
                self.catalog.update(update.id, &fields).await?;
            }
            (false, Some(cards)) => {
                let current = self
                    .catalog
                    .find_by_id(update.id)
                    .await?
                    .ok_or_else(|| Error::NotFound(format!("pathway {}", update.id)))?;
                let name = fields.name.unwrap_or(current.name);
                let description = fields.description.unwrap_or(current.description);
                self.catalog
                    .replace_content(update.id, &name, &description, &cards)
                    .await?;
            }
        }
        Ok(())
    }

    /// Compare the stored catalog with the built-in default list
    pub async fn diagnostics(&self, actor: &Actor) -> Result<CatalogDiagnostics> {
        actor.require_admin()?;
        let pathways = self.catalog.find_all().await?;

        let stored: HashSet<&str> = pathways.iter().map(|p| p.name.as_str()).collect();
        let defaults: HashSet<&str> = DEFAULT_PATHWAYS.iter().map(|(name, _)| *name).collect();

        let missing: Vec<String> = DEFAULT_PATHWAYS
            .iter()
            .filter(|(name, _)| !stored.contains(name))
            .map(|(name, _)| name.to_string())
            .collect();
        let extra: Vec<String> = pathways
            .iter()
            .filter(|p| !defaults.contains(p.name.as_str()))
            .map(|p| p.name.clone())
            .collect();

        let status = if missing.is_empty() {
            "Database is in sync with defaults"
        } else {
            "Database is missing default pathways"
        };

        Ok(CatalogDiagnostics {
            status: status.to_string(),
            pathways_in_db: pathways.len(),
            default_pathways: DEFAULT_PATHWAYS.len(),
            missing,
            extra,
        })
    }
}
