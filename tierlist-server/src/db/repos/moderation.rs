//! Reports and inquiries.
//!
//! Both are append-mostly tables the admin console reads back out. Status
//! transitions are plain column updates; the hosted schema constrains the
//! allowed values.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::EmailAddress;

use super::DbError;

/// What a report points at.
#[derive(Debug, Clone, Copy)]
pub enum ReportTarget {
    TierList(Uuid),
    Comment(Uuid),
}

/// A report row with enough context to act on it.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: Uuid,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub reporter_email: Option<String>,
    pub tier_list_id: Option<Uuid>,
    pub tier_list_title: Option<String>,
    pub comment_id: Option<Uuid>,
    pub comment_content: Option<String>,
    pub reported_user_id: Option<Uuid>,
    pub reported_user_email: Option<String>,
}

/// An inquiry row.
#[derive(Debug, Clone)]
pub struct Inquiry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub content: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Moderation repository
pub struct ModerationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ModerationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// File a report against a list or a comment.
    pub async fn create_report(
        &self,
        reporter: Uuid,
        target: ReportTarget,
        reason: &str,
    ) -> Result<Uuid, DbError> {
        let (tier_list_id, comment_id) = match target {
            ReportTarget::TierList(id) => (Some(id), None),
            ReportTarget::Comment(id) => (None, Some(id)),
        };

        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO reports (user_id, tier_list_id, comment_id, reason, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id
            "#,
        )
        .bind(reporter)
        .bind(tier_list_id)
        .bind(comment_id)
        .bind(reason)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Reports joined with their targets, newest first. `comments_only`
    /// selects the admin tab: comment reports or tier-list reports.
    pub async fn list_reports(&self, comments_only: bool) -> Result<Vec<Report>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                r.id, r.reason, r.status, r.created_at,
                reporter.email AS reporter_email,
                r.tier_list_id,
                t.title AS tier_list_title,
                r.comment_id,
                c.content AS comment_content,
                COALESCE(c.user_id, t.user_id) AS reported_user_id,
                reported.email AS reported_user_email
            FROM reports r
            LEFT JOIN users reporter ON reporter.id = r.user_id
            LEFT JOIN tier_lists t ON t.id = r.tier_list_id
            LEFT JOIN comments c ON c.id = r.comment_id
            LEFT JOIN users reported ON reported.id = COALESCE(c.user_id, t.user_id)
            WHERE ($1 AND r.comment_id IS NOT NULL)
               OR (NOT $1 AND r.tier_list_id IS NOT NULL)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(comments_only)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Report {
                id: r.get("id"),
                reason: r.get("reason"),
                status: r.get("status"),
                created_at: r.get("created_at"),
                reporter_email: r.get("reporter_email"),
                tier_list_id: r.get("tier_list_id"),
                tier_list_title: r.get("tier_list_title"),
                comment_id: r.get("comment_id"),
                comment_content: r.get("comment_content"),
                reported_user_id: r.get("reported_user_id"),
                reported_user_email: r.get("reported_user_email"),
            })
            .collect())
    }

    /// Move a report to reviewed/dismissed.
    pub async fn update_report_status(&self, report_id: Uuid, status: &str) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE reports SET status = $2 WHERE id = $1")
            .bind(report_id)
            .bind(status)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "report",
                id: report_id.to_string(),
            });
        }
        Ok(())
    }

    /// File an inquiry from the contact form. `user_id` is present when
    /// the sender was signed in.
    pub async fn create_inquiry(
        &self,
        user_id: Option<Uuid>,
        email: &EmailAddress,
        content: &str,
    ) -> Result<Uuid, DbError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO inquiries (user_id, email, content, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(email.as_str())
        .bind(content)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Inquiries for the admin console, newest first.
    pub async fn list_inquiries(&self) -> Result<Vec<Inquiry>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, email, content, status, created_at
            FROM inquiries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Inquiry {
                id: r.get("id"),
                user_id: r.get("user_id"),
                email: r.get("email"),
                content: r.get("content"),
                status: r.get("status"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set

    #[tokio::test]
    #[ignore = "requires database"]
    async fn report_defaults_to_pending() {}
}
