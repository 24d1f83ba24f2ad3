//! Tag queries: the popular-tag boards and tag search.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Paginated, Pagination};

use super::{escape_like, DbError};

/// A tag with its aggregate popularity numbers.
#[derive(Debug, Clone)]
pub struct PopularTag {
    pub id: Uuid,
    pub name: String,
    /// Lists carrying the tag.
    pub count_lists: i64,
    /// Votes across those lists.
    pub total_votes: i64,
}

/// Tag repository
pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Popular tags by total votes. Pass a query string to restrict by
    /// name match (tag search).
    pub async fn popular(
        &self,
        query: Option<&str>,
        page: Pagination,
    ) -> Result<Paginated<PopularTag>, DbError> {
        let pattern = query.map(|q| format!("%{}%", escape_like(q)));

        let rows = sqlx::query(
            r#"
            SELECT
                tag.id,
                tag.name,
                COUNT(DISTINCT t.id)::bigint AS count_lists,
                COALESCE(SUM(t.vote_count), 0)::bigint AS total_votes,
                COUNT(*) OVER() AS total
            FROM tags tag
            JOIN tier_list_tags tlt ON tlt.tag_id = tag.id
            JOIN tier_lists t ON t.id = tlt.tier_list_id
            WHERE $1::text IS NULL OR tag.name ILIKE $1
            GROUP BY tag.id, tag.name
            ORDER BY total_votes DESC, count_lists DESC, tag.name ASC
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
            .map(|r| PopularTag {
                id: r.get("id"),
                name: r.get("name"),
                count_lists: r.get("count_lists"),
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

    /// Tag names attached to a list.
    pub async fn for_list(&self, tier_list_id: Uuid) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT tag.name
            FROM tags tag
            JOIN tier_list_tags tlt ON tlt.tag_id = tag.id
            WHERE tlt.tier_list_id = $1
            ORDER BY tag.name
            "#,
        )
        .bind(tier_list_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.get("name")).collect())
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set
    // cargo test -p tierlist-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn popular_orders_by_total_votes() {}
}
