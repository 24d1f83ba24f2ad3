//! Home feed endpoints: popular / trending / new lists, popular items,
//! popular tags.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::repos::tier_lists::FeedSort;
use crate::db::repos::{ItemRepo, TagRepo, TierListRepo};
use crate::http::error::ApiError;
use crate::models::{Paginated, Pagination, PaginationParams};
use crate::state::AppState;

use super::common::{CardResponse, ItemCardResponse, TagResponse};

#[derive(Deserialize, Default)]
pub struct FeedParams {
    /// popular | trending | new
    pub view: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// GET /feeds - tier lists for one home section
async fn list_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Paginated<CardResponse>>, ApiError> {
    let sort = FeedSort::parse(params.view.as_deref().unwrap_or("popular"));
    let page = Pagination::from(params.pagination);

    let result = TierListRepo::new(&state.pool).feed(sort, page).await?;
    Ok(Json(result.map(CardResponse::from)))
}

/// GET /feeds/items - popular items section
async fn popular_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<ItemCardResponse>>, ApiError> {
    let page = Pagination::from(params);
    let result = ItemRepo::new(&state.pool).popular(None, page).await?;
    Ok(Json(result.map(ItemCardResponse::from)))
}

/// GET /feeds/tags - popular tags section
async fn popular_tags(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<TagResponse>>, ApiError> {
    let page = Pagination::from(params);
    let result = TagRepo::new(&state.pool).popular(None, page).await?;
    Ok(Json(result.map(TagResponse::from)))
}

/// Feed routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/feeds", get(list_feed))
        .route("/feeds/items", get(popular_items))
        .route("/feeds/tags", get(popular_tags))
}
