//! Sitemap XML rendering.
//!
//! Pure string builders following the sitemaps.org schema. Row counts come
//! from the database; everything here is page math and XML assembly so the
//! route handlers stay trivial.

use chrono::{DateTime, Utc};

/// Rows per generated sitemap page.
pub const ROWS_PER_SITEMAP: i64 = 10_000;

const URLSET_OPEN: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n"
);

const INDEX_OPEN: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n"
);

/// Pages needed for `total` rows. Never 0: an empty table still gets one
/// (empty) sitemap page.
pub fn page_count(total: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + ROWS_PER_SITEMAP - 1) / ROWS_PER_SITEMAP
    }
}

/// One `<url>` entry.
#[derive(Debug, Clone)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: Option<&'static str>,
    pub priority: Option<&'static str>,
}

impl UrlEntry {
    /// Entry with only a location.
    pub fn bare(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }
}

/// Render a `<urlset>` document.
pub fn render_urlset(entries: &[UrlEntry]) -> String {
    let mut xml = String::from(URLSET_OPEN);
    for entry in entries {
        xml.push_str("  <url>\n");
        push_tag(&mut xml, "loc", &escape(&entry.loc));
        if let Some(lastmod) = entry.lastmod {
            push_tag(&mut xml, "lastmod", &lastmod.to_rfc3339());
        }
        if let Some(freq) = entry.changefreq {
            push_tag(&mut xml, "changefreq", freq);
        }
        if let Some(priority) = entry.priority {
            push_tag(&mut xml, "priority", priority);
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render a `<sitemapindex>` document pointing at the given sitemap URLs.
pub fn render_index(locs: &[String], lastmod: DateTime<Utc>) -> String {
    let mut xml = String::from(INDEX_OPEN);
    for loc in locs {
        xml.push_str("  <sitemap>\n");
        push_tag(&mut xml, "loc", &escape(loc));
        push_tag(&mut xml, "lastmod", &lastmod.to_rfc3339());
        xml.push_str("  </sitemap>\n");
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// The sitemap URLs listed in the index for a site with the given row
/// counts: static page, categories, then one page per 10,000 tier lists
/// and per 10,000 item names.
pub fn index_locations(base_url: &str, tier_list_count: i64, item_count: i64) -> Vec<String> {
    let mut locs = vec![
        format!("{}/sitemap/static.xml", base_url),
        format!("{}/sitemap/categories.xml", base_url),
    ];
    for page in 1..=page_count(tier_list_count) {
        locs.push(format!("{}/sitemap/tier-lists/{}.xml", base_url, page));
    }
    for page in 1..=page_count(item_count) {
        locs.push(format!("{}/sitemap/items/{}.xml", base_url, page));
    }
    locs
}

/// Static site pages worth indexing.
pub fn static_entries(base_url: &str) -> Vec<UrlEntry> {
    ["", "/search", "/ranking", "/quiz/select-genre", "/contact", "/privacy", "/usage"]
        .iter()
        .map(|path| UrlEntry::bare(format!("{}{}", base_url, path)))
        .collect()
}

fn push_tag(xml: &mut String, tag: &str, value: &str) {
    xml.push_str("    <");
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(value);
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

/// Minimal XML escaping for URL text content.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn page_count_is_ceiling_division() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(10_000), 1);
        assert_eq!(page_count(10_001), 2);
        assert_eq!(page_count(25_000), 3);
    }

    #[test]
    fn negative_counts_behave_like_empty() {
        assert_eq!(page_count(-5), 1);
    }

    #[test]
    fn urlset_includes_optional_fields() {
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let entries = vec![UrlEntry {
            loc: "https://tier-lst.com/tier-lists/abc".into(),
            lastmod: Some(when),
            changefreq: Some("weekly"),
            priority: Some("0.7"),
        }];

        let xml = render_urlset(&entries);
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<loc>https://tier-lst.com/tier-lists/abc</loc>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.7</priority>"));
        assert!(xml.contains("<lastmod>2024-03-01T12:00:00+00:00</lastmod>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn bare_entries_render_loc_only() {
        let xml = render_urlset(&[UrlEntry::bare("https://tier-lst.com/search")]);
        assert!(xml.contains("<loc>https://tier-lst.com/search</loc>"));
        assert!(!xml.contains("lastmod"));
        assert!(!xml.contains("changefreq"));
    }

    #[test]
    fn escapes_xml_special_characters() {
        let xml = render_urlset(&[UrlEntry::bare("https://tier-lst.com/items/A&B<C>")]);
        assert!(xml.contains("A&amp;B&lt;C&gt;"));
        assert!(!xml.contains("A&B"));
    }

    #[test]
    fn index_lists_static_categories_then_pages() {
        let locs = index_locations("https://tier-lst.com", 15_000, 0);
        assert_eq!(
            locs,
            vec![
                "https://tier-lst.com/sitemap/static.xml",
                "https://tier-lst.com/sitemap/categories.xml",
                "https://tier-lst.com/sitemap/tier-lists/1.xml",
                "https://tier-lst.com/sitemap/tier-lists/2.xml",
                "https://tier-lst.com/sitemap/items/1.xml",
            ]
        );
    }

    #[test]
    fn index_renders_sitemapindex_schema() {
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let xml = render_index(&["https://tier-lst.com/sitemap/static.xml".into()], when);
        assert!(xml.contains("<sitemapindex"));
        assert!(xml.contains("<sitemap>"));
        assert!(xml.ends_with("</sitemapindex>\n"));
    }

    #[test]
    fn static_entries_cover_the_fixed_pages() {
        let entries = static_entries("https://tier-lst.com");
        assert!(entries.iter().any(|e| e.loc == "https://tier-lst.com"));
        assert!(entries
            .iter()
            .any(|e| e.loc == "https://tier-lst.com/contact"));
    }
}
