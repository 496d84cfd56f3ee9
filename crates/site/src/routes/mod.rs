//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Landing page (hero, services, CTA, contact modal)
//! GET  /health            - Liveness check
//! GET  /sitemap.xml       - Sitemap
//! GET  /robots.txt        - Crawler rules
//! GET  /site.webmanifest  - Web app manifest
//!
//! # Contact
//! POST /contact           - Submit the contact form (JSON, strict rate limit)
//! POST /contact/validate  - Check a single field (JSON, page rate limit)
//! ```

pub mod contact;
pub mod home;
pub mod manifest;
pub mod sitemap;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{contact_rate_limiter, page_rate_limiter};
use crate::state::AppState;

/// Create the contact form routes router.
///
/// Submissions use the strict limiter; field checks use the page limits.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(contact::submit).layer(contact_rate_limiter()))
        .route(
            "/validate",
            post(contact::validate).layer(page_rate_limiter()),
        )
}

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/robots.txt", get(sitemap::robots))
        .route("/site.webmanifest", get(manifest::webmanifest))
        .layer(page_rate_limiter())
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(page_routes())
        .nest("/contact", contact_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}
