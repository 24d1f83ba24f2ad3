//! Tier list repository.
//!
//! Covers the list lifecycle (create, fetch, delete), the home feeds, the
//! search surfaces, and the random picks backing the quiz. Ownership and
//! admin checks happen in the handlers; this layer assumes authorization
//! already passed.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::models::{Paginated, Pagination, TagName, TierListTitle};

use super::{escape_like, DbError};

/// A tier list row.
#[derive(Debug, Clone, FromRow)]
pub struct TierList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub allow_voting: bool,
    pub vote_count: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card-sized projection for feeds and search results.
#[derive(Debug, Clone)]
pub struct TierListCard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub vote_count: i32,
    pub view_count: i32,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One tier row, in display order.
#[derive(Debug, Clone, FromRow)]
pub struct TierRow {
    pub id: Uuid,
    pub tier_list_id: Uuid,
    pub name: String,
    pub color: String,
    pub order: i32,
}

/// One item in a list.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: Uuid,
    pub tier_list_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    pub is_text_item: bool,
    pub tier_id: Option<Uuid>,
}

/// Input for a new tier row.
#[derive(Debug, Clone)]
pub struct NewTier {
    pub name: String,
    pub color: String,
}

/// Input for a new item. `tier_index` points into the tier vector when the
/// creator placed the item; unplaced items stay unranked.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    pub is_text_item: bool,
    pub tier_index: Option<usize>,
}

/// Everything needed to create a list.
#[derive(Debug, Clone)]
pub struct NewTierList {
    pub title: TierListTitle,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub allow_voting: bool,
    pub tiers: Vec<NewTier>,
    pub items: Vec<NewItem>,
    pub tags: Vec<TagName>,
}

/// Feed ordering for the home page sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSort {
    /// Most votes first
    Popular,
    /// Most views first
    Trending,
    /// Newest first
    New,
}

impl FeedSort {
    fn order_clause(self) -> &'static str {
        match self {
            Self::Popular => "t.vote_count DESC, t.created_at DESC",
            Self::Trending => "t.view_count DESC, t.created_at DESC",
            Self::New => "t.created_at DESC",
        }
    }

    /// Parse the `view` query parameter; unknown values read as popular.
    pub fn parse(s: &str) -> Self {
        match s {
            "trending" => Self::Trending,
            "new" => Self::New,
            _ => Self::Popular,
        }
    }
}

const CARD_COLUMNS: &str = r#"
    t.id, t.user_id, t.title, t.description, t.vote_count, t.view_count, t.created_at,
    u.full_name AS author_name,
    u.avatar_url AS author_avatar,
    (SELECT i.image_url FROM items i
     WHERE i.tier_list_id = t.id AND i.image_url IS NOT NULL
     ORDER BY i.id LIMIT 1) AS cover_image,
    COUNT(*) OVER() AS total
"#;

fn card_from_row(row: &sqlx::postgres::PgRow) -> TierListCard {
    TierListCard {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        vote_count: row.get("vote_count"),
        view_count: row.get("view_count"),
        author_name: row.get("author_name"),
        author_avatar: row.get("author_avatar"),
        cover_image: row.get("cover_image"),
        created_at: row.get("created_at"),
    }
}

fn paginate_cards(rows: Vec<sqlx::postgres::PgRow>, page: Pagination) -> Paginated<TierListCard> {
    let total = rows.first().map(|r| r.get::<i64, _>("total")).unwrap_or(0);
    Paginated {
        items: rows.iter().map(card_from_row).collect(),
        total,
        page: page.page,
        per_page: page.per_page,
    }
}

/// Tier list repository
pub struct TierListRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TierListRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a list with its tiers, items, and tags in one transaction.
    pub async fn create(&self, user_id: Uuid, new: NewTierList) -> Result<TierList, DbError> {
        let mut tx = self.pool.begin().await?;

        let list = sqlx::query_as::<_, TierList>(
            r#"
            INSERT INTO tier_lists (user_id, category_id, title, description, allow_voting)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, category_id, title, description, allow_voting,
                      vote_count, view_count, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(new.category_id)
        .bind(new.title.as_str())
        .bind(new.description.as_deref())
        .bind(new.allow_voting)
        .fetch_one(&mut *tx)
        .await?;

        let mut tier_ids = Vec::with_capacity(new.tiers.len());
        for (order, tier) in new.tiers.iter().enumerate() {
            let (tier_id,): (Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO tiers (tier_list_id, name, color, "order")
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(list.id)
            .bind(&tier.name)
            .bind(&tier.color)
            .bind(order as i32)
            .fetch_one(&mut *tx)
            .await?;
            tier_ids.push(tier_id);
        }

        for item in &new.items {
            let tier_id = item.tier_index.and_then(|idx| tier_ids.get(idx)).copied();
            sqlx::query(
                r#"
                INSERT INTO items (tier_list_id, name, image_url, background_color, is_text_item, tier_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(list.id)
            .bind(&item.name)
            .bind(item.image_url.as_deref())
            .bind(item.background_color.as_deref())
            .bind(item.is_text_item)
            .bind(tier_id)
            .execute(&mut *tx)
            .await?;
        }

        attach_tags(&mut tx, list.id, &new.tags).await?;

        tx.commit().await?;
        Ok(list)
    }

    /// Lists this user created since midnight UTC, for the daily cap.
    pub async fn created_today(&self, user_id: Uuid) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM tier_lists
            WHERE user_id = $1 AND created_at >= date_trunc('day', now())
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Fetch a list by id.
    pub async fn get(&self, id: Uuid) -> Result<TierList, DbError> {
        sqlx::query_as::<_, TierList>(
            r#"
            SELECT id, user_id, category_id, title, description, allow_voting,
                   vote_count, view_count, created_at, updated_at
            FROM tier_lists WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "tier list",
            id: id.to_string(),
        })
    }

    /// Bump the view counter. Fire-and-forget from the detail handler.
    pub async fn increment_view(&self, id: Uuid) -> Result<(), DbError> {
        sqlx::query("UPDATE tier_lists SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Tier rows for a list, top row first.
    pub async fn tiers(&self, list_id: Uuid) -> Result<Vec<TierRow>, DbError> {
        let tiers = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, tier_list_id, name, color, "order"
            FROM tiers WHERE tier_list_id = $1
            ORDER BY "order" ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(self.pool)
        .await?;
        Ok(tiers)
    }

    /// Tier rows for several lists at once (item page aggregation).
    pub async fn tiers_for_lists(&self, list_ids: &[Uuid]) -> Result<Vec<TierRow>, DbError> {
        let tiers = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, tier_list_id, name, color, "order"
            FROM tiers WHERE tier_list_id = ANY($1)
            ORDER BY tier_list_id, "order" ASC
            "#,
        )
        .bind(list_ids)
        .fetch_all(self.pool)
        .await?;
        Ok(tiers)
    }

    /// Items belonging to a list.
    pub async fn items(&self, list_id: Uuid) -> Result<Vec<ItemRow>, DbError> {
        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, tier_list_id, name, image_url, background_color, is_text_item, tier_id
            FROM items WHERE tier_list_id = $1
            ORDER BY id
            "#,
        )
        .bind(list_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Image URLs referenced by this list's items, for post-delete cleanup.
    pub async fn item_image_urls(&self, list_id: Uuid) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query(
            "SELECT image_url FROM items WHERE tier_list_id = $1 AND image_url IS NOT NULL",
        )
        .bind(list_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.get("image_url")).collect())
    }

    /// Delete a list. Child rows (tiers, items, votes, tags) cascade in
    /// the hosted schema.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tier_lists WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "tier list",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Home feed, one sort per section.
    pub async fn feed(
        &self,
        sort: FeedSort,
        page: Pagination,
    ) -> Result<Paginated<TierListCard>, DbError> {
        let sql = format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM tier_lists t
            JOIN users u ON u.id = t.user_id
            ORDER BY {}
            LIMIT $1 OFFSET $2
            "#,
            sort.order_clause()
        );

        let rows = sqlx::query(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(paginate_cards(rows, page))
    }

    /// Lists created by one user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: Pagination,
    ) -> Result<Paginated<TierListCard>, DbError> {
        let sql = format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM tier_lists t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = $1
            ORDER BY t.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(paginate_cards(rows, page))
    }

    /// Keyword search over titles and descriptions, popularity first.
    pub async fn search(
        &self,
        query: &str,
        page: Pagination,
    ) -> Result<Paginated<TierListCard>, DbError> {
        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM tier_lists t
            JOIN users u ON u.id = t.user_id
            WHERE t.title ILIKE $1 OR t.description ILIKE $1
            ORDER BY t.vote_count DESC, t.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(paginate_cards(rows, page))
    }

    /// Lists carrying a tag, popularity first.
    pub async fn by_tag(
        &self,
        tag: &str,
        page: Pagination,
    ) -> Result<Paginated<TierListCard>, DbError> {
        let sql = format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM tier_lists t
            JOIN users u ON u.id = t.user_id
            JOIN tier_list_tags tlt ON tlt.tier_list_id = t.id
            JOIN tags tag ON tag.id = tlt.tag_id
            WHERE tag.name = $1
            ORDER BY t.vote_count DESC, t.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(tag)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(paginate_cards(rows, page))
    }

    /// Lists in a category, by popularity or recency.
    pub async fn by_category(
        &self,
        category_id: Uuid,
        sort: FeedSort,
        page: Pagination,
    ) -> Result<Paginated<TierListCard>, DbError> {
        let sql = format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM tier_lists t
            JOIN users u ON u.id = t.user_id
            WHERE t.category_id = $1
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            sort.order_clause()
        );

        let rows = sqlx::query(&sql)
            .bind(category_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(paginate_cards(rows, page))
    }

    /// Lists sharing at least one tag with the given list, most voted
    /// first. Shown under the detail page.
    pub async fn related(&self, list_id: Uuid, limit: i64) -> Result<Vec<TierListCard>, DbError> {
        let sql = format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM tier_lists t
            JOIN users u ON u.id = t.user_id
            WHERE t.id <> $1
              AND EXISTS (
                  SELECT 1 FROM tier_list_tags a
                  JOIN tier_list_tags b ON b.tag_id = a.tag_id
                  WHERE a.tier_list_id = $1 AND b.tier_list_id = t.id
              )
            ORDER BY t.vote_count DESC
            LIMIT $2
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(list_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.iter().map(card_from_row).collect())
    }

    /// Random votable list, skipping ids the client already saw.
    pub async fn random(&self, excluded: &[Uuid]) -> Result<Option<TierList>, DbError> {
        let list = sqlx::query_as::<_, TierList>(
            r#"
            SELECT id, user_id, category_id, title, description, allow_voting,
                   vote_count, view_count, created_at, updated_at
            FROM tier_lists
            WHERE allow_voting AND id <> ALL($1)
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .bind(excluded)
        .fetch_optional(self.pool)
        .await?;
        Ok(list)
    }

    /// Random votable list carrying a tag.
    pub async fn random_by_tag(
        &self,
        tag: &str,
        excluded: &[Uuid],
    ) -> Result<Option<TierList>, DbError> {
        let list = sqlx::query_as::<_, TierList>(
            r#"
            SELECT t.id, t.user_id, t.category_id, t.title, t.description, t.allow_voting,
                   t.vote_count, t.view_count, t.created_at, t.updated_at
            FROM tier_lists t
            JOIN tier_list_tags tlt ON tlt.tier_list_id = t.id
            JOIN tags tag ON tag.id = tlt.tag_id
            WHERE t.allow_voting AND tag.name = $1 AND t.id <> ALL($2)
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .bind(tag)
        .bind(excluded)
        .fetch_optional(self.pool)
        .await?;
        Ok(list)
    }

    /// Total list count.
    pub async fn count_all(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tier_lists")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Lists carrying a tag.
    pub async fn count_by_tag(&self, tag: &str) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tier_lists t
            JOIN tier_list_tags tlt ON tlt.tier_list_id = t.id
            JOIN tags tag ON tag.id = tlt.tag_id
            WHERE tag.name = $1
            "#,
        )
        .bind(tag)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}

/// Upsert tags by name and link them to the list.
async fn attach_tags(
    tx: &mut Transaction<'_, Postgres>,
    list_id: Uuid,
    tags: &[TagName],
) -> Result<(), DbError> {
    for tag in tags {
        let (tag_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO tags (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(tag.as_str())
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO tier_list_tags (tier_list_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(list_id)
        .bind(tag_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_sort_parses_known_views() {
        assert_eq!(FeedSort::parse("popular"), FeedSort::Popular);
        assert_eq!(FeedSort::parse("trending"), FeedSort::Trending);
        assert_eq!(FeedSort::parse("new"), FeedSort::New);
        assert_eq!(FeedSort::parse("anything-else"), FeedSort::Popular);
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p tierlist-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn random_excludes_given_ids() {
        // With every list id excluded, random() must return None
    }
}
