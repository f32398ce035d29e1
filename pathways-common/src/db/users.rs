//! SQLite-backed user store: profiles, selections and progress records

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::models::{Card, NewUser, ProgressRecord, User};
use crate::store::UserStore;
use crate::{Error, Result};

/// User documents stored in `users` and `pathway_progress`
#[derive(Debug, Clone)]
pub struct SqliteUsers {
    pool: SqlitePool,
}

impl SqliteUsers {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

const USER_COLUMNS: &str = "id, provider_id, display_name, first_name, last_name, email, image, \
                            selected_pathways, created_at";

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let id: String = row.try_get("id")?;
    let selected: String = row.try_get("selected_pathways")?;
    let selected: Vec<String> = serde_json::from_str(&selected)?;
    let created_at: String = row.try_get("created_at")?;

    Ok(User {
        id: parse_uuid(&id)?,
        provider_id: row.try_get("provider_id")?,
        display_name: row.try_get("display_name")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        image: row.try_get("image")?,
        selected_pathways: selected
            .iter()
            .map(|s| parse_uuid(s))
            .collect::<Result<Vec<_>>>()?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn user_not_found(id: Uuid) -> Error {
    Error::NotFound(format!("user {}", id))
}

#[async_trait]
impl UserStore for SqliteUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_provider_id(&self, provider_id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE provider_id = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(provider_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let created = User {
            id: Uuid::new_v4(),
            provider_id: user.provider_id.clone(),
            display_name: user.display_name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            selected_pathways: Vec::new(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (
                id, provider_id, display_name, first_name, last_name,
                email, image, selected_pathways, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, '[]', ?)
            "#,
        )
        .bind(created.id.to_string())
        .bind(&created.provider_id)
        .bind(&created.display_name)
        .bind(&created.first_name)
        .bind(&created.last_name)
        .bind(&created.email)
        .bind(&created.image)
        .bind(created.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_selected_pathways(&self, id: Uuid, pathway_ids: &[Uuid]) -> Result<()> {
        let ids: Vec<String> = pathway_ids.iter().map(Uuid::to_string).collect();
        let encoded = serde_json::to_string(&ids)?;

        let result = sqlx::query("UPDATE users SET selected_pathways = ? WHERE id = ?")
            .bind(&encoded)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn upsert_progress(&self, id: Uuid, pathway_id: Uuid, cards: &[Card]) -> Result<()> {
        // The foreign key would reject the insert anyway, but that surfaces as a
        // constraint error rather than a missing user.
        if !self.exists(id).await? {
            return Err(user_not_found(id));
        }

        let encoded = serde_json::to_string(cards)?;

        sqlx::query(
            r#"
            INSERT INTO pathway_progress (user_id, pathway_id, cards, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, pathway_id) DO UPDATE SET
                cards = excluded.cards,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id.to_string())
        .bind(pathway_id.to_string())
        .bind(&encoded)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_progress(&self, id: Uuid, pathway_id: Uuid) -> Result<Option<ProgressRecord>> {
        let row = sqlx::query(
            "SELECT cards, updated_at FROM pathway_progress WHERE user_id = ? AND pathway_id = ?",
        )
        .bind(id.to_string())
        .bind(pathway_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let cards: String = row.try_get("cards")?;
                let updated_at: String = row.try_get("updated_at")?;
                Ok(Some(ProgressRecord {
                    pathway_id,
                    cards: serde_json::from_str(&cards)?,
                    updated_at: parse_timestamp(&updated_at)?,
                }))
            }
            None => Ok(None),
        }
    }
}
