//! Integration tests for pages, public files and response headers.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{StatusCode, header};
use melius_integration_tests::{StubProvider, TEST_TOKEN, body_text, get, test_app};

fn app() -> axum::Router {
    test_app(Some(TEST_TOKEN), StubProvider::replying(Vec::new()))
}

#[tokio::test]
async fn test_home_page() {
    let response = get(app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Financial Advisory"));
    assert!(html.contains(r#"id="contact-form""#));
    assert!(html.contains("application/ld+json"));
}

#[tokio::test]
async fn test_health() {
    let response = get(app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_sitemap_and_robots() {
    let response = get(app(), "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/xml; charset=utf-8"
    );
    let xml = body_text(response).await;
    assert!(xml.contains("<loc>https://melius-ajnahal.com/#services</loc>"));

    let response = get(app(), "/robots.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    let robots = body_text(response).await;
    assert!(robots.contains("Sitemap: https://melius-ajnahal.com/sitemap.xml"));
}

#[tokio::test]
async fn test_webmanifest() {
    let response = get(app(), "/site.webmanifest").await;
    assert_eq!(response.status(), StatusCode::OK);
    let manifest: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(manifest["name"], "MELIUS");
}

#[tokio::test]
async fn test_static_files_are_cached() {
    let response = get(app(), "/static/css/main.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=86400"
    );
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let response = get(app(), "/pricing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let response = get(app(), "/").await;
    let headers = response.headers();

    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert!(!headers["x-request-id"].is_empty());
}
