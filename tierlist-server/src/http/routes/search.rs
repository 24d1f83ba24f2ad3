//! Search endpoint: keyword search across lists, items, and tags, plus
//! tag-filtered list browsing.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{ItemRepo, TagRepo, TierListRepo};
use crate::http::error::ApiError;
use crate::models::{Paginated, Pagination, PaginationParams, ValidationError};
use crate::state::AppState;

use super::common::{CardResponse, ItemCardResponse, TagResponse};

/// Result sizes for the combined (no-section) view.
const COMBINED_LIST_LIMIT: u32 = 20;
const COMBINED_ITEM_LIMIT: u32 = 10;
const COMBINED_TAG_LIMIT: u32 = 10;

#[derive(Deserialize, Default)]
pub struct SearchParams {
    /// Keyword query
    pub q: Option<String>,
    /// Tag filter (exact match)
    pub tag: Option<String>,
    /// Restrict to one section: tierlists | items | tags
    pub section: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub tier_lists: Option<Paginated<CardResponse>>,
    pub items: Option<Paginated<ItemCardResponse>>,
    pub tags: Option<Paginated<TagResponse>>,
}

/// GET /search?q=... or /search?tag=...
///
/// Without `section`, returns the first slice of each section. With
/// `section`, returns only that section with full pagination.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let section = params.section.as_deref();
    let page = Pagination::from(params.pagination.clone());

    // Tag browsing: exact tag, lists only
    if let Some(tag) = params.tag.as_deref().filter(|t| !t.trim().is_empty()) {
        let result = TierListRepo::new(&state.pool)
            .by_tag(tag.trim(), page)
            .await?;
        return Ok(Json(SearchResponse {
            tier_lists: Some(result.map(CardResponse::from)),
            items: None,
            tags: None,
        }));
    }

    let Some(query) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Err(ApiError::Validation(ValidationError::Empty { field: "q" }));
    };

    let fetch_lists = section.is_none() || section == Some("tierlists");
    let fetch_items = section.is_none() || section == Some("items");
    let fetch_tags = section.is_none() || section == Some("tags");

    let tier_lists = if fetch_lists {
        let p = if section.is_none() {
            Pagination::new(1, COMBINED_LIST_LIMIT)
        } else {
            page
        };
        let result = TierListRepo::new(&state.pool).search(query, p).await?;
        Some(result.map(CardResponse::from))
    } else {
        None
    };

    let items = if fetch_items {
        let p = if section.is_none() {
            Pagination::new(1, COMBINED_ITEM_LIMIT)
        } else {
            page
        };
        let result = ItemRepo::new(&state.pool).popular(Some(query), p).await?;
        Some(result.map(ItemCardResponse::from))
    } else {
        None
    };

    let tags = if fetch_tags {
        let p = if section.is_none() {
            Pagination::new(1, COMBINED_TAG_LIMIT)
        } else {
            page
        };
        let result = TagRepo::new(&state.pool).popular(Some(query), p).await?;
        Some(result.map(TagResponse::from))
    } else {
        None
    };

    Ok(Json(SearchResponse {
        tier_lists,
        items,
        tags,
    }))
}

/// Search routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/search", get(search))
}
