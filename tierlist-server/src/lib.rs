//! tierlist-server: HTTP API for the tier-list community site
//!
//! Route handlers are thin glue over the externally managed Postgres
//! schema and the image CDN. No schema migration, no background jobs:
//! every request stands alone.

pub mod db;
pub mod http;
pub mod models;
pub mod sitemap;
pub mod state;

pub use http::{run_server, ApiError, ServerConfig};
pub use state::AppState;
