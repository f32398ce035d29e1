//! # Pathways Common Library
//!
//! Shared code for the career pathways canvas service including:
//! - Domain models (pathways, cards, items, users, progress records)
//! - Error taxonomy
//! - Admin bulk-edit text parser
//! - Store traits and their SQLite implementations
//! - Progress reconciliation and pathway selection services
//! - Admin capability checks
//! - Configuration loading

pub mod admin;
pub mod cards_text;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod progress;
pub mod selection;
pub mod store;

pub use admin::{AdminAuthority, AdminsFile, AllowList};
pub use error::{Error, Result};
pub use models::{Actor, Card, Item, Pathway, ProgressRecord, User};
