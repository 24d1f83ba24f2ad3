//! Repositories: one thin struct per table cluster.
//!
//! Each repo borrows the pool and speaks raw SQL. The tables and their
//! row-level-security policies are owned by the hosted database service;
//! nothing here creates or migrates schema.

pub mod categories;
pub mod comments;
pub mod items;
pub mod moderation;
pub mod sitemap;
pub mod tags;
pub mod tier_lists;
pub mod users;
pub mod votes;

pub use categories::CategoryRepo;
pub use comments::CommentRepo;
pub use items::ItemRepo;
pub use moderation::ModerationRepo;
pub use sitemap::SitemapRepo;
pub use tags::TagRepo;
pub use tier_lists::TierListRepo;
pub use users::UserRepo;
pub use votes::VoteRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

/// Escape LIKE wildcards in user-supplied search text.
pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_escaping() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
