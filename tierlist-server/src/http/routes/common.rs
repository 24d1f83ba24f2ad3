//! Response shapes shared by several routes.

use serde::Serialize;
use uuid::Uuid;

use tierlist_core::format::format_count;

use crate::db::repos::items::PopularItem;
use crate::db::repos::tags::PopularTag;
use crate::db::repos::tier_lists::TierListCard;

/// Card-sized tier list for feeds, search, and related sections.
#[derive(Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub vote_count: i32,
    /// Display form of the vote count ("8.1万" style)
    pub vote_count_label: String,
    pub view_count: i32,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: String,
}

impl From<TierListCard> for CardResponse {
    fn from(c: TierListCard) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            description: c.description,
            vote_count: c.vote_count,
            vote_count_label: format_count(c.vote_count.max(0) as u64),
            view_count: c.view_count,
            author_name: c.author_name,
            author_avatar: c.author_avatar,
            cover_image: c.cover_image,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Aggregated item card.
#[derive(Serialize)]
pub struct ItemCardResponse {
    pub name: String,
    pub image_url: Option<String>,
    pub total_votes: i64,
}

impl From<PopularItem> for ItemCardResponse {
    fn from(i: PopularItem) -> Self {
        Self {
            name: i.name,
            image_url: i.image_url,
            total_votes: i.total_votes,
        }
    }
}

/// Tag chip with popularity numbers.
#[derive(Serialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub count_lists: i64,
    pub total_votes: i64,
}

impl From<PopularTag> for TagResponse {
    fn from(t: PopularTag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            count_lists: t.count_lists,
            total_votes: t.total_votes,
        }
    }
}
