//! Image upload relay.
//!
//! Accepts a multipart file, validates size/type/name, and forwards the
//! bytes unmodified to the image CDN. No resizing, no retries.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use tierlist_core::upload::{safe_filename, sanitize_filename, validate_image};

use crate::http::error::ApiError;
use crate::http::extractors::CurrentUser;
use crate::models::ValidationError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub url: String,
}

/// POST /images - multipart upload relayed to the CDN
async fn upload_image(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }

    let mut file: Option<(Vec<u8>, String, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field: "body",
            reason: "malformed multipart body",
        })
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(sanitize_filename);
        let mime = field.content_type().unwrap_or("").to_owned();
        let bytes = field.bytes().await.map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "file",
                reason: "failed to read file data",
            })
        })?;

        let filename = match filename.filter(|f| !f.is_empty()) {
            Some(f) => f,
            None => safe_filename("upload.jpg"),
        };
        file = Some((bytes.to_vec(), filename, mime));
        break;
    }

    let Some((bytes, filename, mime)) = file else {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "file",
        }));
    };

    validate_image(bytes.len(), &mime, Some(&filename))
        .map_err(|e| ApiError::Validation(ValidationError::InvalidFormat {
            field: "file",
            reason: upload_reason(&e),
        }))?;

    let mut metadata = HashMap::new();
    metadata.insert("uploader".to_string(), user.id.to_string());

    let stored = state
        .images
        .upload(bytes, &safe_filename(&filename), Some(&metadata))
        .await
        .map_err(|source| ApiError::Upstream { source })?;

    let url = state.images.public_url(&stored.id);
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse { id: stored.id, url }),
    ))
}

/// DELETE /images/{id} - remove an uploaded image from the CDN
async fn delete_image(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }
    if id.trim().is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty { field: "id" }));
    }

    state
        .images
        .delete(&id)
        .await
        .map_err(|source| ApiError::Upstream { source })?;

    Ok(StatusCode::NO_CONTENT)
}

fn upload_reason(e: &tierlist_core::upload::UploadError) -> &'static str {
    use tierlist_core::upload::UploadError;
    match e {
        UploadError::TooLarge => "file exceeds the 10 MB size limit",
        UploadError::TooSmall => "file is empty or truncated",
        UploadError::UnsupportedType { .. } => "unsupported content type",
        UploadError::UnsupportedExtension { .. } => "unsupported file extension",
    }
}

/// Upload routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/images", post(upload_image))
        .route("/images/{id}", axum::routing::delete(delete_image))
}
