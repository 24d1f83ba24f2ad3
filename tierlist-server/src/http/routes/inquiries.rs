//! Contact form endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::repos::ModerationRepo;
use crate::http::error::ApiError;
use crate::http::extractors::MaybeUser;
use crate::models::{EmailAddress, ValidationError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct InquiryRequest {
    pub email: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct InquiryResponse {
    pub message: &'static str,
}

/// POST /inquiries - contact form submission
///
/// Works signed out; a signed-in sender gets linked to their account.
async fn submit_inquiry(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Json(req): Json<InquiryRequest>,
) -> Result<(StatusCode, Json<InquiryResponse>), ApiError> {
    let email = EmailAddress::new(&req.email)?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "content",
        }));
    }

    ModerationRepo::new(&state.pool)
        .create_inquiry(user.map(|u| u.id), &email, content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InquiryResponse {
            message: "inquiry received",
        }),
    ))
}

/// Inquiry routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/inquiries", post(submit_inquiry))
}
