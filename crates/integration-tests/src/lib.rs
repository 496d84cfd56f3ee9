//! Integration tests for the MELIUS site.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`,
//! with a scripted [`StubProvider`] standing in for Mailtrap.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p melius-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header::CONTENT_TYPE},
};
use melius_core::Email;
use melius_site::config::{
    DEFAULT_MAILTRAP_API_URL, DEFAULT_RECIPIENT_EMAIL, DEFAULT_SENDER_EMAIL, DEFAULT_SITE_URL,
    DEFAULT_STATIC_DIR, MailtrapConfig, SiteConfig,
};
use melius_site::services::provider::{OutboundEmail, SendReceipt};
use melius_site::services::{ContactService, EmailProvider, ProviderError};
use melius_site::state::AppState;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

/// Token used by configured test apps.
pub const TEST_TOKEN: &str = "f3a9c1e07b2d4c8a9e61b5d2";

/// Client address sent on every request so the rate limiter can key it.
pub const TEST_CLIENT_IP: &str = "192.0.2.10";

/// Records every send and answers from a scripted queue.
///
/// An empty queue answers with a successful receipt carrying no ids.
#[derive(Default)]
pub struct StubProvider {
    sent: Mutex<Vec<OutboundEmail>>,
    replies: Mutex<VecDeque<Result<SendReceipt, ProviderError>>>,
}

impl StubProvider {
    /// Provider that answers with `replies` in order.
    pub fn replying(replies: Vec<Result<SendReceipt, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        })
    }

    /// Messages sent so far.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for StubProvider {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, ProviderError> {
        self.sent.lock().unwrap().push(email.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SendReceipt::default()))
    }
}

/// A receipt listing `ids`.
pub fn receipt(ids: &[&str]) -> Result<SendReceipt, ProviderError> {
    Ok(SendReceipt {
        success: true,
        message_ids: Some(ids.iter().map(ToString::to_string).collect()),
    })
}

/// Site configuration for tests, with or without a Mailtrap token.
pub fn test_config(token: Option<&str>) -> SiteConfig {
    SiteConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        site_url: DEFAULT_SITE_URL.to_string(),
        static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        mailtrap: MailtrapConfig {
            api_token: token.map(SecretString::from),
            api_url: DEFAULT_MAILTRAP_API_URL.to_string(),
            sender_email: Email::parse(DEFAULT_SENDER_EMAIL).unwrap(),
            recipient_email: Email::parse(DEFAULT_RECIPIENT_EMAIL).unwrap(),
            bcc_email: None,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Full application router around `provider`.
pub fn test_app(token: Option<&str>, provider: Arc<StubProvider>) -> Router {
    let config = test_config(token);
    let contact = ContactService::new(config.mailtrap.clone(), provider);
    melius_site::app(AppState::new(config, contact))
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("x-real-ip", TEST_CLIENT_IP)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a raw body.
pub async fn post(
    app: Router,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("x-real-ip", TEST_CLIENT_IP)
        .header(CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    post(app, uri, "application/json", body.to_string()).await
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
