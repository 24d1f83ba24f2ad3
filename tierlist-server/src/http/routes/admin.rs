//! Admin console endpoints: reports, inquiries, banned accounts.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::moderation::{Inquiry, Report};
use crate::db::repos::users::BannedUser;
use crate::db::repos::{ModerationRepo, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ValidUuid};
use crate::models::ValidationError;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ReportListParams {
    /// comments | tier_lists (default: comments)
    pub target: Option<String>,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub id: Uuid,
    pub reason: String,
    pub status: String,
    pub created_at: String,
    pub reporter_email: Option<String>,
    pub tier_list_id: Option<Uuid>,
    pub tier_list_title: Option<String>,
    pub comment_id: Option<Uuid>,
    pub comment_content: Option<String>,
    pub reported_user_id: Option<Uuid>,
    pub reported_user_email: Option<String>,
}

impl From<Report> for ReportResponse {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            reason: r.reason,
            status: r.status,
            created_at: r.created_at.to_rfc3339(),
            reporter_email: r.reporter_email,
            tier_list_id: r.tier_list_id,
            tier_list_title: r.tier_list_title,
            comment_id: r.comment_id,
            comment_content: r.comment_content,
            reported_user_id: r.reported_user_id,
            reported_user_email: r.reported_user_email,
        }
    }
}

#[derive(Serialize)]
pub struct InquiryListResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub content: String,
    pub status: String,
    pub created_at: String,
}

impl From<Inquiry> for InquiryListResponse {
    fn from(i: Inquiry) -> Self {
        Self {
            id: i.id,
            user_id: i.user_id,
            email: i.email,
            content: i.content,
            status: i.status,
            created_at: i.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct BannedUserResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<BannedUser> for BannedUserResponse {
    fn from(u: BannedUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            avatar_url: u.avatar_url,
        }
    }
}

/// GET /admin/reports?target=comments|tier_lists
async fn list_reports(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
    Query(params): Query<ReportListParams>,
) -> Result<Json<Vec<ReportResponse>>, ApiError> {
    let comments_only = !matches!(params.target.as_deref(), Some("tier_lists"));
    let reports = ModerationRepo::new(&state.pool)
        .list_reports(comments_only)
        .await?;
    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}

#[derive(Deserialize)]
pub struct UpdateReportRequest {
    /// reviewed | dismissed
    pub status: String,
}

/// PATCH /admin/reports/{id}
async fn update_report(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
    ValidUuid(id): ValidUuid,
    Json(req): Json<UpdateReportRequest>,
) -> Result<StatusCode, ApiError> {
    if !matches!(req.status.as_str(), "reviewed" | "dismissed" | "pending") {
        return Err(ApiError::Validation(ValidationError::InvalidFormat {
            field: "status",
            reason: "must be pending, reviewed, or dismissed",
        }));
    }

    ModerationRepo::new(&state.pool)
        .update_report_status(id, &req.status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/inquiries
async fn list_inquiries(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<InquiryListResponse>>, ApiError> {
    let inquiries = ModerationRepo::new(&state.pool).list_inquiries().await?;
    Ok(Json(
        inquiries
            .into_iter()
            .map(InquiryListResponse::from)
            .collect(),
    ))
}

/// GET /admin/banned-users
async fn list_banned_users(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<BannedUserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool).banned_users().await?;
    Ok(Json(
        users.into_iter().map(BannedUserResponse::from).collect(),
    ))
}

/// Admin routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/reports", get(list_reports))
        .route("/admin/reports/{id}", patch(update_report))
        .route("/admin/inquiries", get(list_inquiries))
        .route("/admin/banned-users", get(list_banned_users))
}
