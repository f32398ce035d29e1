//! Shared fixtures for pathways-common integration tests

#![allow(dead_code)]

use pathways_common::db::{create_schema, SqliteCatalog, SqliteUsers};
use pathways_common::models::{Card, Item, NewUser, Pathway};
use pathways_common::store::{CatalogStore, UserStore};
use pathways_common::{Actor, User};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory database with the full schema
///
/// A single connection keeps every query on the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    create_schema(&pool).await.expect("create schema");
    pool
}

pub async fn stores() -> (SqliteCatalog, SqliteUsers) {
    let pool = memory_pool().await;
    (SqliteCatalog::new(pool.clone()), SqliteUsers::new(pool))
}

pub fn cards(title: &str, items: &[(&str, bool)]) -> Vec<Card> {
    vec![Card::new(
        title,
        items.iter().map(|(t, c)| Item::new(*t, *c)).collect(),
    )]
}

pub async fn pathway(catalog: &SqliteCatalog, name: &str, card_title: &str) -> Pathway {
    let created = catalog.create(name, "").await.unwrap();
    let cards = cards(card_title, &[("Shared task", false)]);
    catalog.replace_cards(created.id, &cards).await.unwrap();
    catalog.find_by_id(created.id).await.unwrap().unwrap()
}

pub async fn user(users: &SqliteUsers, email: &str) -> User {
    users
        .create(&NewUser {
            provider_id: format!("google-{}", email),
            display_name: email.to_string(),
            first_name: "Test".to_string(),
            last_name: None,
            email: email.to_string(),
            image: None,
        })
        .await
        .unwrap()
}

pub fn actor(user: &User, is_admin: bool) -> Actor {
    Actor {
        user_id: user.id,
        email: user.email.clone(),
        is_admin,
    }
}
