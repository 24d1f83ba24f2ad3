//! Comment repository: threads under tier lists and item pages, plus the
//! mutually exclusive like/dislike reactions.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::CommentBody;

use super::DbError;

/// Daily comment cap per user.
pub const DAILY_COMMENT_LIMIT: i64 = 20;

/// What a comment is attached to.
#[derive(Debug, Clone)]
pub enum CommentTarget {
    TierList(Uuid),
    /// Item pages are keyed by item name, not id.
    Item(String),
}

/// A comment with its author and reaction user lists.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tier_list_id: Option<Uuid>,
    pub item_name: Option<String>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub liked_by: Vec<Uuid>,
    pub disliked_by: Vec<Uuid>,
}

/// Which way a reaction toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleResult {
    Added,
    Removed,
}

/// Comment repository
pub struct CommentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Comments this user posted since midnight UTC.
    pub async fn posted_today(&self, user_id: Uuid) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM comments
            WHERE user_id = $1 AND created_at >= date_trunc('day', now())
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Insert a comment, returning its id.
    pub async fn create(
        &self,
        user_id: Uuid,
        target: &CommentTarget,
        parent_id: Option<Uuid>,
        content: &CommentBody,
    ) -> Result<Uuid, DbError> {
        let (tier_list_id, item_name) = match target {
            CommentTarget::TierList(id) => (Some(*id), None),
            CommentTarget::Item(name) => (None, Some(name.as_str())),
        };

        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO comments (user_id, tier_list_id, item_name, parent_id, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(tier_list_id)
        .bind(item_name)
        .bind(parent_id)
        .bind(content.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Comments for a target, newest first, with authors and reactions in
    /// a single query (no N+1).
    pub async fn list(&self, target: &CommentTarget) -> Result<Vec<Comment>, DbError> {
        let (tier_list_id, item_name) = match target {
            CommentTarget::TierList(id) => (Some(*id), None),
            CommentTarget::Item(name) => (None, Some(name.as_str())),
        };

        let rows = sqlx::query(
            r#"
            SELECT
                c.id, c.user_id, c.tier_list_id, c.item_name, c.parent_id,
                c.content, c.created_at,
                u.full_name AS author_name,
                u.avatar_url AS author_avatar,
                COALESCE(ARRAY_AGG(DISTINCT l.user_id)
                    FILTER (WHERE l.user_id IS NOT NULL), '{}') AS liked_by,
                COALESCE(ARRAY_AGG(DISTINCT d.user_id)
                    FILTER (WHERE d.user_id IS NOT NULL), '{}') AS disliked_by
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id
            LEFT JOIN likes l ON l.comment_id = c.id
            LEFT JOIN dislikes d ON d.comment_id = c.id
            WHERE ($1::uuid IS NULL OR c.tier_list_id = $1)
              AND ($2::text IS NULL OR c.item_name = $2)
              AND ($1::uuid IS NOT NULL OR $2::text IS NOT NULL)
            GROUP BY c.id, u.full_name, u.avatar_url
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(tier_list_id)
        .bind(item_name)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Comment {
                id: r.get("id"),
                user_id: r.get("user_id"),
                tier_list_id: r.get("tier_list_id"),
                item_name: r.get("item_name"),
                parent_id: r.get("parent_id"),
                content: r.get("content"),
                created_at: r.get("created_at"),
                author_name: r.get("author_name"),
                author_avatar: r.get("author_avatar"),
                liked_by: r.get("liked_by"),
                disliked_by: r.get("disliked_by"),
            })
            .collect())
    }

    /// Author and owning list of a comment, for delete authorization.
    pub async fn ownership(&self, comment_id: Uuid) -> Result<(Uuid, Option<Uuid>), DbError> {
        let row = sqlx::query("SELECT user_id, tier_list_id FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "comment",
                id: comment_id.to_string(),
            })?;

        Ok((row.get("user_id"), row.get("tier_list_id")))
    }

    /// Delete a comment.
    pub async fn delete(&self, comment_id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "comment",
                id: comment_id.to_string(),
            });
        }
        Ok(())
    }

    /// Toggle a like. Adding a like clears any dislike by the same user.
    pub async fn toggle_like(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleResult, DbError> {
        self.toggle(comment_id, user_id, "likes", "dislikes").await
    }

    /// Toggle a dislike. Adding a dislike clears any like by the same user.
    pub async fn toggle_dislike(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<ToggleResult, DbError> {
        self.toggle(comment_id, user_id, "dislikes", "likes").await
    }

    async fn toggle(
        &self,
        comment_id: Uuid,
        user_id: Uuid,
        table: &str,
        opposite: &str,
    ) -> Result<ToggleResult, DbError> {
        let mut tx = self.pool.begin().await?;

        let delete_sql = format!(
            "DELETE FROM {} WHERE comment_id = $1 AND user_id = $2",
            table
        );
        let removed = sqlx::query(&delete_sql)
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            tx.commit().await?;
            return Ok(ToggleResult::Removed);
        }

        // Reactions are mutually exclusive
        let clear_sql = format!(
            "DELETE FROM {} WHERE comment_id = $1 AND user_id = $2",
            opposite
        );
        sqlx::query(&clear_sql)
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let insert_sql = format!(
            "INSERT INTO {} (comment_id, user_id) VALUES ($1, $2)",
            table
        );
        sqlx::query(&insert_sql)
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ToggleResult::Added)
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set
    // cargo test -p tierlist-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn like_then_dislike_leaves_only_dislike() {
        // toggle_like then toggle_dislike for the same user must leave
        // exactly one dislike row and zero like rows.
    }
}
