//! Sitemap and robots.txt route handlers.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};

use crate::state::AppState;

/// A sitemap entry relative to the site URL.
struct SitemapEntry {
    path: &'static str,
    change_frequency: &'static str,
    priority: &'static str,
}

const ENTRIES: [SitemapEntry; 3] = [
    SitemapEntry {
        path: "/",
        change_frequency: "monthly",
        priority: "1.0",
    },
    SitemapEntry {
        path: "/#services",
        change_frequency: "monthly",
        priority: "0.9",
    },
    SitemapEntry {
        path: "/#contact",
        change_frequency: "monthly",
        priority: "0.9",
    },
];

/// Serve the XML sitemap.
///
/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> Response {
    let body = render_sitemap(&state.config().site_url, Utc::now().date_naive());
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body).into_response()
}

/// Serve robots.txt, allowing everything and pointing at the sitemap.
///
/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> Response {
    let body = render_robots(&state.config().site_url);
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

fn render_sitemap(site_url: &str, last_modified: NaiveDate) -> String {
    let urls: String = ENTRIES
        .iter()
        .map(|entry| {
            format!(
                "  <url>\n    <loc>{site_url}{}</loc>\n    <lastmod>{last_modified}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
                entry.path, entry.change_frequency, entry.priority
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{urls}</urlset>\n"
    )
}

fn render_robots(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {site_url}/sitemap.xml\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_lists_sections() {
        let xml = render_sitemap(
            "https://melius-ajnahal.com",
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        );

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://melius-ajnahal.com/</loc>"));
        assert!(xml.contains("<loc>https://melius-ajnahal.com/#services</loc>"));
        assert!(xml.contains("<loc>https://melius-ajnahal.com/#contact</loc>"));
        assert_eq!(xml.matches("<lastmod>2026-01-15</lastmod>").count(), 3);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_robots_points_at_sitemap() {
        let robots = render_robots("https://melius-ajnahal.com");
        assert!(robots.contains("Allow: /"));
        assert!(robots.contains("Sitemap: https://melius-ajnahal.com/sitemap.xml"));
    }
}
