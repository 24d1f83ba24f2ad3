//! User profiles, session resolution, and the vote ranking board.
//!
//! Accounts and sessions are created by the hosted auth service; this repo
//! only reads them.

use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// The authenticated requester, resolved from a session token.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct AuthUser {
    pub id: Uuid,
    pub is_admin: bool,
    pub is_banned: bool,
}

/// Public profile fields shown next to lists and comments.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// One row of the ranking board.
#[derive(Debug, Clone)]
pub struct UserRanking {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub total_votes: i64,
}

/// Banned account, for the admin console.
#[derive(Debug, Clone, FromRow)]
pub struct BannedUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a bearer session token to its user.
    ///
    /// Sessions live in the auth service's table; expired tokens resolve
    /// to nothing rather than an error.
    pub async fn user_for_token(&self, token: &str) -> Result<Option<AuthUser>, DbError> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.is_admin, u.is_banned
            FROM auth_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Public profile for a user id.
    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, DbError> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, full_name, avatar_url FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: user_id.to_string(),
        })
    }

    /// Ranking board: users ordered by total votes received across their
    /// lists. Single aggregate query.
    pub async fn rankings(&self, limit: i64) -> Result<Vec<UserRanking>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                u.id AS user_id,
                u.full_name,
                u.avatar_url,
                COALESCE(SUM(t.vote_count), 0)::bigint AS total_votes
            FROM users u
            JOIN tier_lists t ON t.user_id = u.id
            GROUP BY u.id, u.full_name, u.avatar_url
            HAVING COALESCE(SUM(t.vote_count), 0) > 0
            ORDER BY total_votes DESC, u.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserRanking {
                user_id: r.get("user_id"),
                full_name: r.get("full_name"),
                avatar_url: r.get("avatar_url"),
                total_votes: r.get("total_votes"),
            })
            .collect())
    }

    /// Banned accounts, newest first (admin console).
    pub async fn banned_users(&self) -> Result<Vec<BannedUser>, DbError> {
        let users = sqlx::query_as::<_, BannedUser>(
            r#"
            SELECT id, email, full_name, avatar_url
            FROM users
            WHERE is_banned
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}

/// Assign ranks to an ordered board, ties sharing the higher rank.
///
/// The board renders "1, 1, 3" for two tied leaders, matching the page's
/// first-index-of-equal-total behavior.
pub fn ranks_with_ties(rankings: &[UserRanking]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(rankings.len());
    for (idx, row) in rankings.iter().enumerate() {
        let rank = rankings
            .iter()
            .position(|r| r.total_votes == row.total_votes)
            .unwrap_or(idx) as u32
            + 1;
        ranks.push(rank);
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(total: i64) -> UserRanking {
        UserRanking {
            user_id: Uuid::new_v4(),
            full_name: None,
            avatar_url: None,
            total_votes: total,
        }
    }

    #[test]
    fn ties_share_the_higher_rank() {
        let board = vec![row(50), row(50), row(10)];
        assert_eq!(ranks_with_ties(&board), vec![1, 1, 3]);
    }

    #[test]
    fn distinct_totals_rank_sequentially() {
        let board = vec![row(30), row(20), row(10)];
        assert_eq!(ranks_with_ties(&board), vec![1, 2, 3]);
    }

    #[test]
    fn empty_board() {
        assert!(ranks_with_ties(&[]).is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn expired_session_resolves_to_none() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        let user = UserRepo::new(&pool)
            .user_for_token("expired-token")
            .await
            .expect("query");
        assert!(user.is_none());
    }
}
