//! Shared application state

use sqlx::PgPool;
use tierlist_images::ImagesClient;

/// State shared by all request handlers.
///
/// Cheap to clone; the pool and the HTTP client are both handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub images: ImagesClient,
    /// Canonical site origin, used when rendering sitemap URLs.
    pub base_url: String,
}

impl AppState {
    pub fn new(pool: PgPool, images: ImagesClient, base_url: impl Into<String>) -> Self {
        Self {
            pool,
            images,
            base_url: base_url.into(),
        }
    }
}
