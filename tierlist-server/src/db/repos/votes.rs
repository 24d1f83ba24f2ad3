//! Vote repository.
//!
//! One vote row per (user, tier list); a re-vote replaces the previous
//! placements instead of stacking. The list's denormalized `vote_count`
//! only moves on first-time votes.

use sqlx::{FromRow, PgPool, Row};
use tierlist_core::scoring::VotePlacement;
use uuid::Uuid;

use super::DbError;

/// Vote milestones that get a once-only notification record.
pub const VOTE_MILESTONES: [i32; 5] = [10, 50, 100, 500, 1000];

/// A stored vote.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub tier_list_id: Uuid,
    pub user_id: Uuid,
}

/// Input placement pairs from the vote form.
#[derive(Debug, Clone, Copy)]
pub struct NewPlacement {
    pub item_id: Uuid,
    pub tier_id: Uuid,
}

/// Outcome of a vote submission.
#[derive(Debug, Clone, Copy)]
pub struct VoteOutcome {
    pub vote_id: Uuid,
    /// False when this replaced an earlier vote by the same user.
    pub first_vote: bool,
}

/// Vote repository
pub struct VoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The requesting user's vote on a list, if any.
    pub async fn find(&self, tier_list_id: Uuid, user_id: Uuid) -> Result<Option<Vote>, DbError> {
        let vote = sqlx::query_as::<_, Vote>(
            "SELECT id, tier_list_id, user_id FROM votes WHERE tier_list_id = $1 AND user_id = $2",
        )
        .bind(tier_list_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(vote)
    }

    /// Submit or replace a vote, all in one transaction.
    ///
    /// First vote: insert the vote row and bump `vote_count`. Re-vote:
    /// clear the old placements and keep the counter where it is.
    pub async fn submit(
        &self,
        tier_list_id: Uuid,
        user_id: Uuid,
        placements: &[NewPlacement],
    ) -> Result<VoteOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM votes WHERE tier_list_id = $1 AND user_id = $2",
        )
        .bind(tier_list_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (vote_id, first_vote) = match existing {
            Some((id,)) => {
                sqlx::query("DELETE FROM vote_items WHERE vote_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                (id, false)
            }
            None => {
                let (id,): (Uuid,) = sqlx::query_as(
                    "INSERT INTO votes (tier_list_id, user_id) VALUES ($1, $2) RETURNING id",
                )
                .bind(tier_list_id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query("UPDATE tier_lists SET vote_count = vote_count + 1 WHERE id = $1")
                    .bind(tier_list_id)
                    .execute(&mut *tx)
                    .await?;
                (id, true)
            }
        };

        for p in placements {
            sqlx::query("INSERT INTO vote_items (vote_id, item_id, tier_id) VALUES ($1, $2, $3)")
                .bind(vote_id)
                .bind(p.item_id)
                .bind(p.tier_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(VoteOutcome {
            vote_id,
            first_vote,
        })
    }

    /// The requester's placements for a vote (resuming the form).
    pub async fn placements(&self, vote_id: Uuid) -> Result<Vec<VotePlacement>, DbError> {
        let rows = sqlx::query("SELECT item_id, tier_id FROM vote_items WHERE vote_id = $1")
            .bind(vote_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| VotePlacement {
                item_id: r.get("item_id"),
                tier_id: r.get("tier_id"),
            })
            .collect())
    }

    /// All placements ever cast on a list, for the results view.
    pub async fn placements_for_list(
        &self,
        tier_list_id: Uuid,
    ) -> Result<Vec<VotePlacement>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT vi.item_id, vi.tier_id
            FROM vote_items vi
            JOIN votes v ON v.id = vi.vote_id
            WHERE v.tier_list_id = $1
            "#,
        )
        .bind(tier_list_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| VotePlacement {
                item_id: r.get("item_id"),
                tier_id: r.get("tier_id"),
            })
            .collect())
    }

    /// All placements across a set of lists, keyed per list by the caller.
    pub async fn placements_for_lists(
        &self,
        tier_list_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, VotePlacement)>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT v.tier_list_id, vi.item_id, vi.tier_id
            FROM vote_items vi
            JOIN votes v ON v.id = vi.vote_id
            WHERE v.tier_list_id = ANY($1)
            "#,
        )
        .bind(tier_list_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.get("tier_list_id"),
                    VotePlacement {
                        item_id: r.get("item_id"),
                        tier_id: r.get("tier_id"),
                    },
                )
            })
            .collect())
    }

    /// Ids of lists this user has voted on (for "voted" badges).
    pub async fn voted_list_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbError> {
        let rows = sqlx::query("SELECT tier_list_id FROM votes WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get("tier_list_id")).collect())
    }

    /// Record a vote milestone if this exact one hasn't been recorded.
    ///
    /// Returns true when the record was fresh, i.e. a notification should
    /// go out.
    pub async fn record_milestone(
        &self,
        tier_list_id: Uuid,
        milestone: i32,
    ) -> Result<bool, DbError> {
        let notification_type = format!("vote_{}", milestone);

        let result = sqlx::query(
            r#"
            INSERT INTO notification_history (tier_list_id, notification_type)
            VALUES ($1, $2)
            ON CONFLICT (tier_list_id, notification_type) DO NOTHING
            "#,
        )
        .bind(tier_list_id)
        .bind(&notification_type)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// The milestone hit exactly at this count, if any.
pub fn milestone_reached(vote_count: i32) -> Option<i32> {
    VOTE_MILESTONES.iter().copied().find(|m| *m == vote_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_match_exact_counts_only() {
        assert_eq!(milestone_reached(10), Some(10));
        assert_eq!(milestone_reached(50), Some(50));
        assert_eq!(milestone_reached(1000), Some(1000));
        assert_eq!(milestone_reached(11), None);
        assert_eq!(milestone_reached(0), None);
        assert_eq!(milestone_reached(999), None);
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p tierlist-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn revote_does_not_bump_vote_count() {
        // Submitting twice for the same user must leave vote_count at 1
        // and replace the placements.
    }
}
