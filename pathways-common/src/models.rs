//! Domain models for the pathway catalog and per-user progress
//!
//! Cards and items carry no identity of their own: their position inside the
//! owning pathway or progress record is all there is, and every write replaces
//! the whole sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Placeholder used when a card arrives with an empty or missing title
pub const DEFAULT_CARD_TITLE: &str = "Card Title";

/// Placeholder used when an item arrives with empty or missing text
pub const DEFAULT_ITEM_TEXT: &str = "New Task...";

/// Number of pathways a user must commit to at once
pub const SELECTION_SIZE: usize = 3;

/// A single checklist task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default = "default_item_text")]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

fn default_item_text() -> String {
    DEFAULT_ITEM_TEXT.to_string()
}

impl Item {
    pub fn new(text: impl Into<String>, completed: bool) -> Self {
        Self {
            text: text.into(),
            completed,
        }
    }
}

/// A titled group of checklist items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default = "default_card_title")]
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

fn default_card_title() -> String {
    DEFAULT_CARD_TITLE.to_string()
}

impl Card {
    pub fn new(title: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// Replace blank titles and item texts with their placeholders
    pub fn normalized(mut self) -> Self {
        if self.title.trim().is_empty() {
            self.title = DEFAULT_CARD_TITLE.to_string();
        }
        for item in &mut self.items {
            if item.text.trim().is_empty() {
                item.text = DEFAULT_ITEM_TEXT.to_string();
            }
        }
        self
    }
}

/// Normalize a full card sequence before it is written
pub fn normalize_cards(cards: Vec<Card>) -> Vec<Card> {
    cards.into_iter().map(Card::normalized).collect()
}

/// Decode a client-supplied JSON value into a card sequence
///
/// Anything other than an array of `{title, items: [{text, completed}]}`
/// objects is a validation failure. Missing fields take their defaults.
pub fn cards_from_json(value: serde_json::Value) -> Result<Vec<Card>> {
    if !value.is_array() {
        return Err(Error::Validation("cards must be an array".to_string()));
    }
    let cards: Vec<Card> = serde_json::from_value(value)
        .map_err(|e| Error::Validation(format!("malformed cards: {}", e)))?;
    Ok(normalize_cards(cards))
}

/// A career pathway in the shared catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub cards: Vec<Card>,
}

/// Partial update of a pathway's descriptive fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathwayUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PathwayUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Validate and trim a pathway name
pub fn validate_pathway_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("pathway name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// A user's private, divergent copy of a pathway's cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub pathway_id: Uuid,
    pub cards: Vec<Card>,
    pub updated_at: DateTime<Utc>,
}

/// An authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Identity assigned by the OAuth provider
    pub provider_id: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    /// Either empty or exactly [`SELECTION_SIZE`] entries
    pub selected_pathways: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields needed to create a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub provider_id: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

/// The caller of a core operation
///
/// Built per request by the auth gateway and passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl Actor {
    /// Fail with [`Error::Forbidden`] unless the actor holds admin capability
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::Forbidden("admin access required".to_string()))
        }
    }
}
