//! SQLite-backed pathway catalog

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::parse_uuid;
use crate::models::{Card, Pathway, PathwayUpdate};
use crate::store::CatalogStore;
use crate::{Error, Result};

/// Pathway catalog stored in the `pathways` table
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_pathway(row: &sqlx::sqlite::SqliteRow) -> Result<Pathway> {
    let id: String = row.try_get("id")?;
    let cards: String = row.try_get("cards")?;
    Ok(Pathway {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        cards: serde_json::from_str(&cards)?,
    })
}

async fn insert_row(conn: &mut SqliteConnection, pathway: &Pathway) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let cards = serde_json::to_string(&pathway.cards)?;

    sqlx::query(
        r#"
        INSERT INTO pathways (id, name, description, cards, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(pathway.id.to_string())
    .bind(&pathway.name)
    .bind(&pathway.description)
    .bind(&cards)
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("pathway {}", id))
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_all(&self) -> Result<Vec<Pathway>> {
        let rows = sqlx::query("SELECT id, name, description, cards FROM pathways ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_pathway).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pathway>> {
        let row = sqlx::query("SELECT id, name, description, cards FROM pathways WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_pathway).transpose()
    }

    async fn create(&self, name: &str, description: &str) -> Result<Pathway> {
        let pathway = Pathway {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            cards: Vec::new(),
        };
        let mut conn = self.pool.acquire().await?;
        insert_row(&mut conn, &pathway).await?;
        Ok(pathway)
    }

    async fn insert_all(&self, pathways: &[Pathway]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for pathway in pathways {
            insert_row(&mut tx, pathway).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, fields: &PathwayUpdate) -> Result<Pathway> {
        let result = sqlx::query(
            r#"
            UPDATE pathways
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.name.as_deref())
        .bind(fields.description.as_deref())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        self.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM pathways WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn replace_cards(&self, id: Uuid, cards: &[Card]) -> Result<()> {
        let cards = serde_json::to_string(cards)?;

        let result = sqlx::query("UPDATE pathways SET cards = ?, updated_at = ? WHERE id = ?")
            .bind(&cards)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn replace_content(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        cards: &[Card],
    ) -> Result<Pathway> {
        let encoded = serde_json::to_string(cards)?;

        let result = sqlx::query(
            r#"
            UPDATE pathways
            SET name = ?, description = ?, cards = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(&encoded)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(Pathway {
            id,
            name: name.to_string(),
            description: description.to_string(),
            cards: cards.to_vec(),
        })
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pathways")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
