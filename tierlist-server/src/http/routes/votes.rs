//! Vote submission.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::put,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::votes::{milestone_reached, NewPlacement};
use crate::db::repos::{TierListRepo, VoteRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidUuid};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PlacementRequest {
    pub item_id: Uuid,
    pub tier_id: Uuid,
}

#[derive(Deserialize)]
pub struct SubmitVoteRequest {
    pub placements: Vec<PlacementRequest>,
}

#[derive(Serialize)]
pub struct SubmitVoteResponse {
    pub vote_id: Uuid,
    pub first_vote: bool,
}

/// PUT /tier-lists/{id}/vote - submit or replace the requester's vote
async fn submit_vote(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidUuid(id): ValidUuid,
    Json(req): Json<SubmitVoteRequest>,
) -> Result<Json<SubmitVoteResponse>, ApiError> {
    if user.is_banned {
        return Err(ApiError::banned());
    }

    let lists = TierListRepo::new(&state.pool);
    let list = lists.get(id).await?;
    if !list.allow_voting {
        return Err(ApiError::Forbidden {
            reason: "voting is disabled for this tier list".into(),
        });
    }

    let placements: Vec<NewPlacement> = req
        .placements
        .iter()
        .map(|p| NewPlacement {
            item_id: p.item_id,
            tier_id: p.tier_id,
        })
        .collect();

    let votes = VoteRepo::new(&state.pool);
    let outcome = votes.submit(id, user.id, &placements).await?;

    // Milestone bookkeeping on first-time votes. Delivery belongs to the
    // external push service; here it is recorded and logged only, and a
    // failure never fails the vote.
    if outcome.first_vote {
        let new_count = list.vote_count + 1;
        if let Some(milestone) = milestone_reached(new_count) {
            match votes.record_milestone(id, milestone).await {
                Ok(true) => {
                    tracing::info!(
                        tier_list_id = %id,
                        milestone,
                        "vote milestone reached"
                    );
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(tier_list_id = %id, "failed to record vote milestone: {}", e);
                }
            }
        }
    }

    Ok(Json(SubmitVoteResponse {
        vote_id: outcome.vote_id,
        first_vote: outcome.first_vote,
    }))
}

/// Vote routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tier-lists/{id}/vote", put(submit_vote))
}
