//! Sitemap endpoints.
//!
//! Index plus static, category, tier-list, and item pages, all served as
//! XML with public cache headers. Search engines fetch these directly.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use crate::db::repos::{ItemRepo, SitemapRepo, TierListRepo};
use crate::http::error::ApiError;
use crate::sitemap::{
    index_locations, render_index, render_urlset, static_entries, UrlEntry, ROWS_PER_SITEMAP,
};
use crate::state::AppState;

const CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=7200";

fn xml_response(xml: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        xml,
    )
        .into_response()
}

fn parse_page(raw: &str) -> Result<i64, Response> {
    let page = raw
        .strip_suffix(".xml")
        .unwrap_or(raw)
        .parse::<i64>()
        .ok()
        .filter(|p| *p >= 1);

    page.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "invalid sitemap page number"
            })),
        )
            .into_response()
    })
}

/// GET /sitemap.xml - sitemap index
async fn sitemap_index(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let tier_list_count = TierListRepo::new(&state.pool).count_all().await?;
    let item_count = ItemRepo::new(&state.pool).distinct_name_count().await?;

    let locs = index_locations(&state.base_url, tier_list_count, item_count);
    Ok(xml_response(render_index(&locs, Utc::now())))
}

/// GET /sitemap/static.xml
async fn sitemap_static(State(state): State<Arc<AppState>>) -> Response {
    xml_response(render_urlset(&static_entries(&state.base_url)))
}

/// GET /sitemap/categories.xml
async fn sitemap_categories(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let ids = SitemapRepo::new(&state.pool).category_ids().await?;

    let entries: Vec<UrlEntry> = ids
        .into_iter()
        .map(|id| UrlEntry {
            loc: format!("{}/categories/{}", state.base_url, id),
            lastmod: None,
            changefreq: Some("weekly"),
            priority: Some("0.6"),
        })
        .collect();

    Ok(xml_response(render_urlset(&entries)))
}

/// GET /sitemap/tier-lists/{page}.xml
async fn sitemap_tier_lists(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Result<Response, ApiError> {
    let page = match parse_page(&page) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    let lists = SitemapRepo::new(&state.pool)
        .tier_list_page(page, ROWS_PER_SITEMAP)
        .await?;

    let entries: Vec<UrlEntry> = lists
        .into_iter()
        .map(|l| UrlEntry {
            loc: format!("{}/tier-lists/{}", state.base_url, l.id),
            lastmod: Some(l.updated_at),
            changefreq: Some("weekly"),
            priority: Some("0.7"),
        })
        .collect();

    Ok(xml_response(render_urlset(&entries)))
}

/// GET /sitemap/items/{page}.xml
async fn sitemap_items(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Result<Response, ApiError> {
    let page = match parse_page(&page) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    let names = SitemapRepo::new(&state.pool)
        .item_name_page(page, ROWS_PER_SITEMAP)
        .await?;

    let entries: Vec<UrlEntry> = names
        .into_iter()
        .map(|name| UrlEntry {
            loc: format!("{}/items/{}", state.base_url, urlencode(&name)),
            lastmod: None,
            changefreq: Some("weekly"),
            priority: Some("0.5"),
        })
        .collect();

    Ok(xml_response(render_urlset(&entries)))
}

/// Percent-encode an item name for use in a path segment.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(*byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Sitemap routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sitemap.xml", get(sitemap_index))
        .route("/sitemap/static.xml", get(sitemap_static))
        .route("/sitemap/categories.xml", get(sitemap_categories))
        .route("/sitemap/tier-lists/{page}", get(sitemap_tier_lists))
        .route("/sitemap/items/{page}", get(sitemap_items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::page_count;

    #[test]
    fn page_parsing_accepts_xml_suffix() {
        assert_eq!(parse_page("1.xml").unwrap(), 1);
        assert_eq!(parse_page("27.xml").unwrap(), 27);
        assert_eq!(parse_page("3").unwrap(), 3);
    }

    #[test]
    fn page_parsing_rejects_garbage() {
        assert!(parse_page("0.xml").is_err());
        assert!(parse_page("-1.xml").is_err());
        assert!(parse_page("abc.xml").is_err());
        assert!(parse_page("").is_err());
    }

    #[test]
    fn urlencode_multibyte() {
        assert_eq!(urlencode("abc-123"), "abc-123");
        assert_eq!(urlencode("ピカチュウ"), "%E3%83%94%E3%82%AB%E3%83%81%E3%83%A5%E3%82%A6");
        assert_eq!(urlencode("a b"), "a%20b");
    }

    #[test]
    fn one_page_even_when_empty() {
        assert_eq!(page_count(0), 1);
    }
}
