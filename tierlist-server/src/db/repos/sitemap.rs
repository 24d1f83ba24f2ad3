//! Row slices backing the sitemap pages.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// A tier list entry for the sitemap: id plus last modification.
#[derive(Debug, Clone)]
pub struct SitemapList {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
}

/// Sitemap repository
pub struct SitemapRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SitemapRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of tier lists in stable id order.
    pub async fn tier_list_page(
        &self,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<SitemapList>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, updated_at FROM tier_lists
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SitemapList {
                id: r.get("id"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }

    /// One page of distinct item names in stable order.
    pub async fn item_name_page(&self, page: i64, per_page: i64) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT name FROM items
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.get("name")).collect())
    }

    /// All category ids (small table, no paging).
    pub async fn category_ids(&self) -> Result<Vec<Uuid>, DbError> {
        let rows = sqlx::query("SELECT id FROM categories ORDER BY id ASC")
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get("id")).collect())
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pages_are_stable_across_calls() {}
}
