//! Quiz endpoints: genre picker and question fetch.
//!
//! The client keeps its own history of seen lists (browser storage) and
//! passes those ids back as exclusions; the server holds no quiz session
//! state.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{TagRepo, TierListRepo, VoteRepo};
use crate::http::error::ApiError;
use crate::models::{Paginated, Pagination, PaginationParams, ValidationError};
use crate::state::AppState;

use super::tier_lists::{ItemResponse, PlacementResponse, TierListResponse, TierResponse};
use super::common::TagResponse;

#[derive(Deserialize, Default)]
pub struct QuestionParams {
    /// Restrict questions to lists carrying this tag.
    pub tag: Option<String>,
    /// Comma-separated tier list ids the client has already seen.
    pub excluded_ids: Option<String>,
}

#[derive(Serialize)]
pub struct QuestionResponse {
    pub tier_list: TierListResponse,
    pub tiers: Vec<TierResponse>,
    pub items: Vec<ItemResponse>,
    pub vote_results: Vec<PlacementResponse>,
    /// How many lists exist in this genre, so the client can show
    /// progress and stop when exhausted.
    pub total_count: i64,
}

fn parse_excluded(raw: Option<&str>) -> Result<Vec<Uuid>, ApiError> {
    let Some(raw) = raw else {
        return Ok(vec![]);
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "excluded_ids",
                    reason: "must be comma-separated UUIDs",
                })
            })
        })
        .collect()
}

/// GET /quiz/question - a random list to guess, with its vote results
async fn question(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuestionParams>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let excluded = parse_excluded(params.excluded_ids.as_deref())?;
    let tag = params.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let lists = TierListRepo::new(&state.pool);

    let (picked, total_count) = match tag {
        Some(tag) => (
            lists.random_by_tag(tag, &excluded).await?,
            lists.count_by_tag(tag).await?,
        ),
        None => (lists.random(&excluded).await?, lists.count_all().await?),
    };

    let Some(list) = picked else {
        return Err(ApiError::NotFound {
            resource: "quiz question",
            id: tag.unwrap_or("all").to_owned(),
        });
    };

    let tiers = lists.tiers(list.id).await?;
    let items = lists.items(list.id).await?;
    let vote_results = VoteRepo::new(&state.pool)
        .placements_for_list(list.id)
        .await?;

    Ok(Json(QuestionResponse {
        tier_list: TierListResponse::from(list),
        tiers: tiers.into_iter().map(TierResponse::from).collect(),
        items: items.into_iter().map(ItemResponse::from).collect(),
        vote_results: vote_results
            .into_iter()
            .map(|p| PlacementResponse {
                item_id: p.item_id,
                tier_id: p.tier_id,
            })
            .collect(),
        total_count,
    }))
}

/// GET /quiz/genres - pickable genres (popular tags)
async fn genres(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<TagResponse>>, ApiError> {
    let page = Pagination::from(params);
    let result = TagRepo::new(&state.pool).popular(None, page).await?;
    Ok(Json(result.map(TagResponse::from)))
}

/// Quiz routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quiz/genres", get(genres))
        .route("/quiz/question", get(question))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_ids_parse() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!("{}, {} ,", a, b);
        assert_eq!(parse_excluded(Some(&raw)).unwrap(), vec![a, b]);
    }

    #[test]
    fn excluded_ids_absent_is_empty() {
        assert!(parse_excluded(None).unwrap().is_empty());
        assert!(parse_excluded(Some("")).unwrap().is_empty());
    }

    #[test]
    fn excluded_ids_rejects_garbage() {
        assert!(parse_excluded(Some("not-a-uuid")).is_err());
    }
}
