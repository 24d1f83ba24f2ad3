//! Comment endpoints: create, delete, reactions, report.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::comments::{Comment, CommentTarget, ToggleResult, DAILY_COMMENT_LIMIT};
use crate::db::repos::moderation::ReportTarget;
use crate::db::repos::{CommentRepo, ModerationRepo, TierListRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidUuid};
use crate::models::{CommentBody, ValidationError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub tier_list_id: Option<Uuid>,
    pub item_name: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// A comment with author info and reaction state.
#[derive(Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: String,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub like_count: usize,
    pub dislike_count: usize,
    pub liked_by: Vec<Uuid>,
    pub disliked_by: Vec<Uuid>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            parent_id: c.parent_id,
            content: c.content,
            created_at: c.created_at.to_rfc3339(),
            author_name: c.author_name,
            author_avatar: c.author_avatar,
            like_count: c.liked_by.len(),
            dislike_count: c.disliked_by.len(),
            liked_by: c.liked_by,
            disliked_by: c.disliked_by,
        }
    }
}

#[derive(Serialize)]
pub struct CreateCommentResponse {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    /// "added" or "removed"
    pub result: &'static str,
}

impl From<ToggleResult> for ToggleResponse {
    fn from(r: ToggleResult) -> Self {
        Self {
            result: match r {
                ToggleResult::Added => "added",
                ToggleResult::Removed => "removed",
            },
        }
    }
}

/// POST /comments - add a comment to a list or an item page
async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CreateCommentResponse>), ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }

    let content = CommentBody::new(&req.content)?;

    let target = match (req.tier_list_id, req.item_name.as_deref()) {
        (Some(id), None) => CommentTarget::TierList(id),
        (None, Some(name)) if !name.trim().is_empty() => {
            CommentTarget::Item(name.trim().to_owned())
        }
        _ => {
            return Err(ApiError::Validation(ValidationError::InvalidFormat {
                field: "target",
                reason: "exactly one of tier_list_id or item_name is required",
            }))
        }
    };

    let repo = CommentRepo::new(&state.pool);

    let today = repo.posted_today(user.id).await?;
    if today >= DAILY_COMMENT_LIMIT {
        return Err(ApiError::LimitExceeded {
            message: format!("daily limit of {} comments reached", DAILY_COMMENT_LIMIT),
        });
    }

    let id = repo.create(user.id, &target, req.parent_id, &content).await?;
    Ok((StatusCode::CREATED, Json(CreateCommentResponse { id })))
}

/// DELETE /comments/{id} - author, admin, or owner of the commented list
async fn delete_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    let repo = CommentRepo::new(&state.pool);
    let (author_id, tier_list_id) = repo.ownership(id).await?;

    let mut authorized = author_id == user.id || user.is_admin;

    if !authorized {
        if let Some(list_id) = tier_list_id {
            let list = TierListRepo::new(&state.pool).get(list_id).await?;
            authorized = list.user_id == user.id;
        }
    }

    if !authorized {
        return Err(ApiError::Forbidden {
            reason: "you do not have permission to delete this comment".into(),
        });
    }

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /comments/{id}/like
async fn toggle_like(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ToggleResponse>, ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }
    let result = CommentRepo::new(&state.pool)
        .toggle_like(id, user.id)
        .await?;
    Ok(Json(ToggleResponse::from(result)))
}

/// POST /comments/{id}/dislike
async fn toggle_dislike(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ToggleResponse>, ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }
    let result = CommentRepo::new(&state.pool)
        .toggle_dislike(id, user.id)
        .await?;
    Ok(Json(ToggleResponse::from(result)))
}

#[derive(Deserialize)]
pub struct ReportCommentRequest {
    pub reason: String,
}

/// POST /comments/{id}/report
async fn report_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidUuid(id): ValidUuid,
    Json(req): Json<ReportCommentRequest>,
) -> Result<StatusCode, ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }
    if req.reason.trim().is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "reason",
        }));
    }

    // 404 for reports against comments that no longer exist
    CommentRepo::new(&state.pool).ownership(id).await?;

    ModerationRepo::new(&state.pool)
        .create_report(user.id, ReportTarget::Comment(id), req.reason.trim())
        .await?;

    Ok(StatusCode::CREATED)
}

/// Comment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/comments", post(create_comment))
        .route("/comments/{id}", axum::routing::delete(delete_comment))
        .route("/comments/{id}/like", post(toggle_like))
        .route("/comments/{id}/dislike", post(toggle_dislike))
        .route("/comments/{id}/report", post(report_comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_response_labels() {
        assert_eq!(ToggleResponse::from(ToggleResult::Added).result, "added");
        assert_eq!(
            ToggleResponse::from(ToggleResult::Removed).result,
            "removed"
        );
    }
}
