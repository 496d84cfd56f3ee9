//! Mailtrap Sending API client.
//!
//! Sends transactional email through `POST {api_url}/api/send` with bearer
//! token authentication.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::MailtrapConfig;

use super::provider::{EmailProvider, OutboundEmail, ProviderError, SendReceipt};

/// Request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Mailtrap Sending API client.
#[derive(Clone)]
pub struct MailtrapClient {
    inner: Arc<MailtrapClientInner>,
}

struct MailtrapClientInner {
    client: reqwest::Client,
    send_url: String,
    token: Option<SecretString>,
}

impl MailtrapClient {
    /// Create a new Mailtrap client.
    ///
    /// The client can be built without a token; every send then fails with
    /// [`ProviderError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MailtrapConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(MailtrapClientInner {
                client,
                send_url: format!("{}/api/send", config.api_url.trim_end_matches('/')),
                token: config.api_token.clone(),
            }),
        })
    }
}

#[async_trait]
impl EmailProvider for MailtrapClient {
    #[instrument(skip(self, email), fields(category = %email.category))]
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, ProviderError> {
        let token = self
            .inner
            .token
            .as_ref()
            .ok_or(ProviderError::NotConfigured)?;

        let response = self
            .inner
            .client
            .post(&self.inner.send_url)
            .bearer_auth(token.expose_secret())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Response {
                status: status.as_u16(),
                body: parse_error_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse send response: {e}")))
    }
}

/// Parse an error body as JSON, keeping non-JSON text as a string value.
fn parse_error_body(body: &str) -> Option<serde_json::Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(
        serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string())),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use axum::{
        Router,
        http::{
            HeaderMap, StatusCode,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
        routing::post,
    };
    use melius_core::Email;
    use serde_json::json;

    use super::*;
    use crate::services::contact::delivery_failure_message;
    use crate::services::provider::Mailbox;

    const TOKEN: &str = "f3a9c1e07b2d4c8a9e61b5d2";
    const BEARER: &str = "Bearer f3a9c1e07b2d4c8a9e61b5d2";

    fn config(api_url: &str, token: Option<&str>) -> MailtrapConfig {
        MailtrapConfig {
            api_token: token.map(SecretString::from),
            api_url: api_url.to_string(),
            sender_email: Email::parse("hello@melius-ajnahal.com").unwrap(),
            recipient_email: Email::parse("melius.ajnahal@gmail.com").unwrap(),
            bcc_email: None,
        }
    }

    #[test]
    fn test_send_url_joins_base() {
        let client = MailtrapClient::new(&config("https://send.api.mailtrap.io/", None)).unwrap();
        assert_eq!(client.inner.send_url, "https://send.api.mailtrap.io/api/send");
    }

    #[test]
    fn test_parse_error_body() {
        assert_eq!(parse_error_body(""), None);
        assert_eq!(
            parse_error_body(r#"{"errors":["Unauthorized"]}"#),
            Some(json!({"errors": ["Unauthorized"]}))
        );
        assert_eq!(
            parse_error_body("Bad Gateway"),
            Some(json!("Bad Gateway"))
        );
    }

    fn outbound() -> OutboundEmail {
        OutboundEmail {
            from: Mailbox::address(Email::parse("hello@melius-ajnahal.com").unwrap()),
            to: vec![Mailbox::address(Email::parse("jo@example.com").unwrap())],
            bcc: Vec::new(),
            reply_to: None,
            subject: "Hi".to_string(),
            text: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
            category: "test".to_string(),
        }
    }

    /// Serve `POST /api/send` on a local port, answering `status` and `body`
    /// to requests that carry the test token. Returns the base URL.
    async fn sending_api(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(
            "/api/send",
            post(move |headers: HeaderMap| async move {
                let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
                if bearer == Some(BEARER) {
                    (status, [(CONTENT_TYPE, "application/json")], body)
                } else {
                    (StatusCode::FORBIDDEN, [(CONTENT_TYPE, "text/plain")], "bad token")
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_send_without_token_is_not_configured() {
        let client = MailtrapClient::new(&config("http://127.0.0.1:9", None)).unwrap();

        let result = client.send(&outbound()).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_send_returns_message_ids() {
        let url = sending_api(StatusCode::OK, r#"{"success":true,"message_ids":["x1"]}"#).await;
        let client = MailtrapClient::new(&config(&url, Some(TOKEN))).unwrap();

        let receipt = client.send(&outbound()).await.unwrap();
        assert_eq!(
            receipt,
            SendReceipt {
                success: true,
                message_ids: Some(vec!["x1".to_string()]),
            }
        );
    }

    #[tokio::test]
    async fn test_send_without_message_ids() {
        let url = sending_api(StatusCode::OK, r#"{"success":true}"#).await;
        let client = MailtrapClient::new(&config(&url, Some(TOKEN))).unwrap();

        let receipt = client.send(&outbound()).await.unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.message_ids, None);
    }

    #[tokio::test]
    async fn test_send_rejection_keeps_status_and_body() {
        let url = sending_api(StatusCode::UNAUTHORIZED, r#"{"errors":["Unauthorized"]}"#).await;
        let client = MailtrapClient::new(&config(&url, Some(TOKEN))).unwrap();

        let err = client.send(&outbound()).await.unwrap_err();
        match &err {
            ProviderError::Response { status, body } => {
                assert_eq!(*status, 401);
                assert_eq!(body, &Some(json!({"errors": ["Unauthorized"]})));
            }
            other => panic!("expected a response error, got {other:?}"),
        }

        let sender = Email::parse("hello@melius-ajnahal.com").unwrap();
        let message = delivery_failure_message(&err, &sender);
        assert!(message.starts_with(
            "Authentication failed (401): [\"Unauthorized\"]. Please verify: 1)"
        ));
        assert!(!message.contains(TOKEN));
    }

    #[tokio::test]
    async fn test_send_unparseable_success_body() {
        let url = sending_api(StatusCode::OK, "not json").await;
        let client = MailtrapClient::new(&config(&url, Some(TOKEN))).unwrap();

        let err = client.send(&outbound()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_mailtrap_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<MailtrapClient>();
    }
}
