//! Tier list endpoints: create, detail, delete, report, per-user listing.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tierlist_core::colors::{contrast_color, DEFAULT_ITEM_COLOR, DEFAULT_TIER_COLORS};
use tierlist_images::extract_image_id;

use crate::db::repos::tier_lists::{ItemRow, NewItem, NewTier, NewTierList, TierList, TierRow};
use crate::db::repos::votes::VoteRepo;
use crate::db::repos::{CommentRepo, ItemRepo, ModerationRepo, TagRepo, TierListRepo, UserRepo};
use crate::db::repos::comments::CommentTarget;
use crate::db::repos::moderation::ReportTarget;
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, MaybeUser, ValidUuid};
use crate::models::{Paginated, Pagination, PaginationParams, TagName, TierListTitle, ValidationError};
use crate::state::AppState;

use super::comments::CommentResponse;
use super::common::CardResponse;

/// Lists one user may create per day.
const DAILY_CREATE_LIMIT: i64 = 10;

/// How many related lists the detail page shows.
const RELATED_LIMIT: i64 = 5;

#[derive(Deserialize)]
pub struct CreateTierRequest {
    pub name: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    #[serde(default)]
    pub is_text_item: bool,
    /// Index into `tiers` when the creator pre-placed the item.
    pub tier_index: Option<usize>,
}

#[derive(Deserialize)]
pub struct CreateTierListRequest {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default = "default_allow_voting")]
    pub allow_voting: bool,
    pub tiers: Vec<CreateTierRequest>,
    #[serde(default)]
    pub items: Vec<CreateItemRequest>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_allow_voting() -> bool {
    true
}

#[derive(Serialize)]
pub struct TierListResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub allow_voting: bool,
    pub vote_count: i32,
    pub view_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TierList> for TierListResponse {
    fn from(t: TierList) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            category_id: t.category_id,
            title: t.title,
            description: t.description,
            allow_voting: t.allow_voting,
            vote_count: t.vote_count,
            view_count: t.view_count,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct TierResponse {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub order: i32,
}

impl From<TierRow> for TierResponse {
    fn from(t: TierRow) -> Self {
        Self {
            id: t.id,
            name: t.name,
            color: t.color,
            order: t.order,
        }
    }
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub background_color: Option<String>,
    /// Legible text color for text items, derived from the background.
    pub text_color: Option<&'static str>,
    pub is_text_item: bool,
    pub tier_id: Option<Uuid>,
}

impl From<ItemRow> for ItemResponse {
    fn from(i: ItemRow) -> Self {
        let text_color = i
            .is_text_item
            .then(|| contrast_color(i.background_color.as_deref().unwrap_or(DEFAULT_ITEM_COLOR)));
        Self {
            id: i.id,
            name: i.name,
            image_url: i.image_url,
            background_color: i.background_color,
            text_color,
            is_text_item: i.is_text_item,
            tier_id: i.tier_id,
        }
    }
}

#[derive(Serialize)]
pub struct PlacementResponse {
    pub item_id: Uuid,
    pub tier_id: Uuid,
}

#[derive(Serialize)]
pub struct UserVoteResponse {
    pub vote_id: Uuid,
    pub placements: Vec<PlacementResponse>,
}

/// Everything the detail page needs in one response.
#[derive(Serialize)]
pub struct TierListDetailResponse {
    pub tier_list: TierListResponse,
    pub tiers: Vec<TierResponse>,
    pub items: Vec<ItemResponse>,
    pub tags: Vec<String>,
    pub comments: Vec<CommentResponse>,
    /// The requester's own vote, for resuming the form.
    pub user_vote: Option<UserVoteResponse>,
    /// Every placement ever cast, for the results aggregation.
    pub vote_results: Vec<PlacementResponse>,
    pub related: Vec<CardResponse>,
}

/// POST /tier-lists - create a list
async fn create_tier_list(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTierListRequest>,
) -> Result<(StatusCode, Json<TierListResponse>), ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }

    let title = TierListTitle::new(&req.title)?;
    let tags = TagName::parse_set(&req.tags)?;

    if req.tiers.is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "tiers",
        }));
    }
    for item in &req.items {
        if let Some(idx) = item.tier_index {
            if idx >= req.tiers.len() {
                return Err(ApiError::Validation(ValidationError::InvalidFormat {
                    field: "items",
                    reason: "tier_index out of range",
                }));
            }
        }
    }

    let repo = TierListRepo::new(&state.pool);

    // Daily cap, admins exempt
    if !user.is_admin {
        let today = repo.created_today(user.id).await?;
        if today >= DAILY_CREATE_LIMIT {
            return Err(ApiError::LimitExceeded {
                message: format!("daily limit of {} tier lists reached", DAILY_CREATE_LIMIT),
            });
        }
    }

    let new = NewTierList {
        title,
        description: req.description,
        category_id: req.category_id,
        allow_voting: req.allow_voting,
        tiers: req
            .tiers
            .into_iter()
            .map(|t| NewTier {
                name: t.name,
                color: t.color,
            })
            .collect(),
        items: req
            .items
            .into_iter()
            .map(|i| NewItem {
                name: i.name,
                image_url: i.image_url,
                background_color: i.background_color,
                is_text_item: i.is_text_item,
                tier_index: i.tier_index,
            })
            .collect(),
        tags,
    };

    let list = repo.create(user.id, new).await?;
    Ok((StatusCode::CREATED, Json(TierListResponse::from(list))))
}

/// GET /tier-lists/{id} - detail page payload
async fn get_tier_list(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<TierListDetailResponse>, ApiError> {
    let lists = TierListRepo::new(&state.pool);
    let votes = VoteRepo::new(&state.pool);

    let list = lists.get(id).await?;
    lists.increment_view(id).await?;

    let tiers = lists.tiers(id).await?;
    let items = lists.items(id).await?;
    let tags = TagRepo::new(&state.pool).for_list(id).await?;
    let comments = CommentRepo::new(&state.pool)
        .list(&CommentTarget::TierList(id))
        .await?;
    let vote_results = votes.placements_for_list(id).await?;
    let related = lists.related(id, RELATED_LIMIT).await?;

    let user_vote = match user {
        Some(u) => match votes.find(id, u.id).await? {
            Some(vote) => {
                let placements = votes.placements(vote.id).await?;
                Some(UserVoteResponse {
                    vote_id: vote.id,
                    placements: placements
                        .into_iter()
                        .map(|p| PlacementResponse {
                            item_id: p.item_id,
                            tier_id: p.tier_id,
                        })
                        .collect(),
                })
            }
            None => None,
        },
        None => None,
    };

    Ok(Json(TierListDetailResponse {
        tier_list: TierListResponse::from(list),
        tiers: tiers.into_iter().map(TierResponse::from).collect(),
        items: items.into_iter().map(ItemResponse::from).collect(),
        tags,
        comments: comments.into_iter().map(CommentResponse::from).collect(),
        user_vote,
        vote_results: vote_results
            .into_iter()
            .map(|p| PlacementResponse {
                item_id: p.item_id,
                tier_id: p.tier_id,
            })
            .collect(),
        related: related.into_iter().map(CardResponse::from).collect(),
    }))
}

/// DELETE /tier-lists/{id} - owner or admin
async fn delete_tier_list(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    let lists = TierListRepo::new(&state.pool);

    let list = lists.get(id).await?;
    if list.user_id != user.id && !user.is_admin {
        return Err(ApiError::Forbidden {
            reason: "you do not have permission to delete this tier list".into(),
        });
    }

    let image_urls = lists.item_image_urls(id).await?;
    lists.delete(id).await?;

    // Best-effort CDN cleanup: remove images no longer referenced by any
    // surviving item. Failures are logged per image and never fail the
    // request; foreign URLs are skipped.
    let items = ItemRepo::new(&state.pool);
    for url in image_urls {
        let Some(image_id) = extract_image_id(&url) else {
            continue;
        };
        match items.image_used_elsewhere(&url, None).await {
            Ok(true) => {
                tracing::debug!(%url, "image still in use, keeping");
            }
            Ok(false) => {
                if let Err(e) = state.images.delete(image_id).await {
                    tracing::error!(%url, "failed to delete image from CDN: {:#}", e);
                } else {
                    tracing::info!(%url, "deleted unused image from CDN");
                }
            }
            Err(e) => {
                tracing::error!(%url, "image usage check failed: {}", e);
            }
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ReportRequest {
    pub reason: String,
}

/// POST /tier-lists/{id}/report
async fn report_tier_list(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidUuid(id): ValidUuid,
    Json(req): Json<ReportRequest>,
) -> Result<StatusCode, ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }
    if req.reason.trim().is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "reason",
        }));
    }

    // 404 for reports against lists that no longer exist
    TierListRepo::new(&state.pool).get(id).await?;

    ModerationRepo::new(&state.pool)
        .create_report(user.id, ReportTarget::TierList(id), req.reason.trim())
        .await?;

    Ok(StatusCode::CREATED)
}

#[derive(Serialize)]
pub struct UserListsResponse {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub tier_lists: Paginated<CardResponse>,
}

/// GET /users/{id}/tier-lists - one user's lists with their profile header
async fn list_for_user(
    State(state): State<Arc<AppState>>,
    ValidUuid(user_id): ValidUuid,
    Query(params): Query<PaginationParams>,
) -> Result<Json<UserListsResponse>, ApiError> {
    let profile = UserRepo::new(&state.pool).profile(user_id).await?;

    let page = Pagination::from(params);
    let result = TierListRepo::new(&state.pool)
        .list_for_user(user_id, page)
        .await?;

    Ok(Json(UserListsResponse {
        user_id: profile.id,
        full_name: profile.full_name,
        avatar_url: profile.avatar_url,
        tier_lists: result.map(CardResponse::from),
    }))
}

#[derive(Serialize)]
pub struct DefaultTierResponse {
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Serialize)]
pub struct DefaultsResponse {
    pub tiers: Vec<DefaultTierResponse>,
    pub item_color: &'static str,
}

/// GET /tier-lists/defaults - palette for a fresh creation form
async fn creation_defaults() -> Json<DefaultsResponse> {
    Json(DefaultsResponse {
        tiers: DEFAULT_TIER_COLORS
            .iter()
            .map(|&(name, color)| DefaultTierResponse { name, color })
            .collect(),
        item_color: DEFAULT_ITEM_COLOR,
    })
}

/// Tier list routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tier-lists", post(create_tier_list))
        .route("/tier-lists/defaults", get(creation_defaults))
        .route(
            "/tier-lists/{id}",
            get(get_tier_list).delete(delete_tier_list),
        )
        .route("/tier-lists/{id}/report", post(report_tier_list))
        .route("/users/{id}/tier-lists", get(list_for_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_voting_defaults_on() {
        let req: CreateTierListRequest = serde_json::from_str(
            r##"{"title": "test", "tiers": [{"name": "S", "color": "#ff7f7f"}]}"##,
        )
        .unwrap();
        assert!(req.allow_voting);
        assert!(req.items.is_empty());
        assert!(req.tags.is_empty());
    }
}
