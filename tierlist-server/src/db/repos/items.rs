//! Item queries that cut across lists.
//!
//! Items are rows owned by a tier list, but the item *page* and item
//! search aggregate them by name: "Pikachu" across forty lists is one
//! entry with combined vote totals.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Paginated, Pagination};

use super::{escape_like, DbError};

/// Aggregated item for search results and popular-item sections.
#[derive(Debug, Clone)]
pub struct PopularItem {
    pub name: String,
    pub image_url: Option<String>,
    pub total_votes: i64,
}

/// One appearance of an item name in a list.
#[derive(Debug, Clone)]
pub struct ItemOccurrence {
    pub item_id: Uuid,
    pub tier_list_id: Uuid,
    pub image_url: Option<String>,
    pub list_title: String,
    pub list_vote_count: i32,
    pub author_name: Option<String>,
}

/// Item repository
pub struct ItemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Popular items aggregated by name, most voted first. Pass a query
    /// string to restrict by name match.
    pub async fn popular(
        &self,
        query: Option<&str>,
        page: Pagination,
    ) -> Result<Paginated<PopularItem>, DbError> {
        let pattern = query.map(|q| format!("%{}%", escape_like(q)));

        let rows = sqlx::query(
            r#"
            SELECT
                i.name,
                MIN(i.image_url) AS image_url,
                COUNT(vi.id)::bigint AS total_votes,
                COUNT(*) OVER() AS total
            FROM items i
            LEFT JOIN vote_items vi ON vi.item_id = i.id
            WHERE $1::text IS NULL OR i.name ILIKE $1
            GROUP BY i.name
            ORDER BY total_votes DESC, i.name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total = rows.first().map(|r| r.get::<i64, _>("total")).unwrap_or(0);
        let items = rows
            .into_iter()
            .map(|r| PopularItem {
                name: r.get("name"),
                image_url: r.get("image_url"),
                total_votes: r.get("total_votes"),
            })
            .collect();

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Every list an item name appears in, most voted list first.
    pub async fn occurrences(&self, name: &str) -> Result<Vec<ItemOccurrence>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                i.id AS item_id,
                i.tier_list_id,
                i.image_url,
                t.title AS list_title,
                t.vote_count AS list_vote_count,
                u.full_name AS author_name
            FROM items i
            JOIN tier_lists t ON t.id = i.tier_list_id
            JOIN users u ON u.id = t.user_id
            WHERE i.name = $1
            ORDER BY t.vote_count DESC, t.created_at DESC
            "#,
        )
        .bind(name)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ItemOccurrence {
                item_id: r.get("item_id"),
                tier_list_id: r.get("tier_list_id"),
                image_url: r.get("image_url"),
                list_title: r.get("list_title"),
                list_vote_count: r.get("list_vote_count"),
                author_name: r.get("author_name"),
            })
            .collect())
    }

    /// Count of distinct item names, for sitemap pagination.
    pub async fn distinct_name_count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT name) FROM items")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Bump the per-item view counter (aggregated by name).
    pub async fn increment_view(&self, name: &str) -> Result<(), DbError> {
        sqlx::query("UPDATE items SET view_count = view_count + 1 WHERE name = $1")
            .bind(name)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Is this image URL referenced by items outside the given list?
    ///
    /// Drives delete-time CDN cleanup: shared images stay.
    pub async fn image_used_elsewhere(
        &self,
        image_url: &str,
        exclude_list: Option<Uuid>,
    ) -> Result<bool, DbError> {
        let (used,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM items
                WHERE image_url = $1
                  AND ($2::uuid IS NULL OR tier_list_id <> $2)
            )
            "#,
        )
        .bind(image_url)
        .bind(exclude_list)
        .fetch_one(self.pool)
        .await?;
        Ok(used)
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set
    // cargo test -p tierlist-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn popular_aggregates_by_name() {
        // Two items named "Pikachu" in different lists must collapse to
        // one entry whose total_votes is the sum of both.
    }
}
