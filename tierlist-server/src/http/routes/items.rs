//! Item detail page: one name, every list it appears in, and its computed
//! rank within each.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use tierlist_core::scoring::{rank_item, VotePlacement};

use crate::db::repos::comments::CommentTarget;
use crate::db::repos::{CommentRepo, ItemRepo, TierListRepo, VoteRepo};
use crate::http::error::ApiError;
use crate::models::ValidationError;
use crate::state::AppState;

use super::comments::CommentResponse;

/// One appearance with its computed ranks.
#[derive(Serialize)]
pub struct AppearanceResponse {
    pub tier_list_id: Uuid,
    pub list_title: String,
    pub list_vote_count: i32,
    pub author_name: Option<String>,
    pub image_url: Option<String>,
    /// Tier name for the absolute rank, when the list has votes.
    pub absolute_tier: Option<String>,
    /// Tier name for the relative rank, when the list has votes.
    pub relative_tier: Option<String>,
}

#[derive(Serialize)]
pub struct ItemDetailResponse {
    pub name: String,
    /// All images attached to this item name across lists.
    pub images: Vec<String>,
    pub appearances: Vec<AppearanceResponse>,
    pub comments: Vec<CommentResponse>,
}

/// GET /items/{name}
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ItemDetailResponse>, ApiError> {
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "item name",
        }));
    }

    let items = ItemRepo::new(&state.pool);
    let occurrences = items.occurrences(&name).await?;
    if occurrences.is_empty() {
        return Err(ApiError::NotFound {
            resource: "item",
            id: name,
        });
    }

    items.increment_view(&name).await?;

    let list_ids: Vec<Uuid> = occurrences.iter().map(|o| o.tier_list_id).collect();

    // Bulk-fetch tiers and placements, then group per list in memory.
    let tier_rows = TierListRepo::new(&state.pool)
        .tiers_for_lists(&list_ids)
        .await?;
    let placement_rows = VoteRepo::new(&state.pool)
        .placements_for_lists(&list_ids)
        .await?;

    let mut tiers_by_list: HashMap<Uuid, Vec<(Uuid, String)>> = HashMap::new();
    for t in tier_rows {
        tiers_by_list
            .entry(t.tier_list_id)
            .or_default()
            .push((t.id, t.name));
    }

    let mut placements_by_list: HashMap<Uuid, Vec<VotePlacement>> = HashMap::new();
    for (list_id, placement) in placement_rows {
        placements_by_list.entry(list_id).or_default().push(placement);
    }

    let images: Vec<String> = occurrences
        .iter()
        .filter_map(|o| o.image_url.clone())
        .collect();

    let empty_tiers: Vec<(Uuid, String)> = Vec::new();
    let empty_placements: Vec<VotePlacement> = Vec::new();

    let appearances = occurrences
        .into_iter()
        .map(|o| {
            let tiers = tiers_by_list.get(&o.tier_list_id).unwrap_or(&empty_tiers);
            let placements = placements_by_list
                .get(&o.tier_list_id)
                .unwrap_or(&empty_placements);

            let tier_ids: Vec<Uuid> = tiers.iter().map(|(id, _)| *id).collect();
            let rank = rank_item(o.item_id, &tier_ids, placements);

            let tier_name =
                |idx: usize| tiers.get(idx).map(|(_, name)| name.clone());

            AppearanceResponse {
                tier_list_id: o.tier_list_id,
                list_title: o.list_title,
                list_vote_count: o.list_vote_count,
                author_name: o.author_name,
                image_url: o.image_url,
                absolute_tier: rank.and_then(|r| tier_name(r.absolute)),
                relative_tier: rank.and_then(|r| tier_name(r.relative)),
            }
        })
        .collect();

    let comments = CommentRepo::new(&state.pool)
        .list(&CommentTarget::Item(name.clone()))
        .await?;

    Ok(Json(ItemDetailResponse {
        name,
        images,
        appearances,
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/items/{name}", get(get_item))
}
