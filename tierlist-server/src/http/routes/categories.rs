//! Category endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::categories::Category;
use crate::db::repos::tier_lists::FeedSort;
use crate::db::repos::{CategoryRepo, TierListRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidUuid};
use crate::models::{Paginated, Pagination, PaginationParams, ValidationError};
use crate::state::AppState;

use super::common::CardResponse;

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            image_url: c.image_url,
        }
    }
}

#[derive(Serialize)]
pub struct CategoryDetailResponse {
    pub category: CategoryResponse,
    pub tier_lists: Paginated<CardResponse>,
}

#[derive(Deserialize, Default)]
pub struct CategoryListParams {
    /// popular | new
    pub sort: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// GET /categories - all categories
async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool).list().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// GET /categories/{id} - category with its lists
async fn get_category(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    Query(params): Query<CategoryListParams>,
) -> Result<Json<CategoryDetailResponse>, ApiError> {
    let category = CategoryRepo::new(&state.pool).get(id).await?;

    // Only "new" flips the sort; everything else reads as popular
    let sort = match params.sort.as_deref() {
        Some("new") => FeedSort::New,
        _ => FeedSort::Popular,
    };
    let page = Pagination::from(params.pagination);

    let tier_lists = TierListRepo::new(&state.pool)
        .by_category(id, sort, page)
        .await?;

    Ok(Json(CategoryDetailResponse {
        category: CategoryResponse::from(category),
        tier_lists: tier_lists.map(CardResponse::from),
    }))
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// POST /categories
async fn create_category(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "name",
        }));
    }

    let category = CategoryRepo::new(&state.pool)
        .create(name, req.description.as_deref(), req.image_url.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", get(get_category))
}
