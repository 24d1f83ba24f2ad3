//! User ranking board.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use tierlist_core::format::format_count;

use crate::db::repos::users::ranks_with_ties;
use crate::db::repos::UserRepo;
use crate::http::error::ApiError;
use crate::state::AppState;

/// Board size.
const RANKING_LIMIT: i64 = 100;

#[derive(Serialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub total_votes: i64,
    pub total_votes_label: String,
}

#[derive(Serialize)]
pub struct RankingResponse {
    pub rankings: Vec<RankingEntry>,
}

/// GET /ranking - top users by votes received
async fn ranking(State(state): State<Arc<AppState>>) -> Result<Json<RankingResponse>, ApiError> {
    let board = UserRepo::new(&state.pool).rankings(RANKING_LIMIT).await?;
    let ranks = ranks_with_ties(&board);

    let rankings = board
        .into_iter()
        .zip(ranks)
        .map(|(row, rank)| RankingEntry {
            rank,
            user_id: row.user_id,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            total_votes: row.total_votes,
            total_votes_label: format_count(row.total_votes.max(0) as u64),
        })
        .collect();

    Ok(Json(RankingResponse { rankings }))
}

/// Ranking routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ranking", get(ranking))
}
