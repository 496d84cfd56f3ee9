//! Web app manifest route handler.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use super::home::{SITE_DESCRIPTION, SITE_NAME};

/// Serve the web app manifest.
///
/// GET /site.webmanifest
pub async fn webmanifest() -> Response {
    let manifest = serde_json::json!({
        "name": SITE_NAME,
        "short_name": SITE_NAME,
        "description": SITE_DESCRIPTION,
        "start_url": "/",
        "icons": [
            {
                "src": "/static/images/melius-lion.svg",
                "sizes": "any",
                "type": "image/svg+xml"
            }
        ],
        "theme_color": "#0c192d",
        "background_color": "#0c192d",
        "display": "standalone"
    });

    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        manifest.to_string(),
    )
        .into_response()
}
