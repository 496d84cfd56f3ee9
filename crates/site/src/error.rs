//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{ContactError, SubmissionResult};

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Contact form submission failed.
    #[error(transparent)]
    Contact(#[from] ContactError),

    /// Page template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Contact(err) => match err {
                ContactError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ContactError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                ContactError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ContactError::Delivery { .. } => StatusCode::BAD_GATEWAY,
            },
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Template(_)
                | Self::Contact(
                    ContactError::NotConfigured
                        | ContactError::Render(_)
                        | ContactError::Delivery { .. }
                )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        match self {
            // Contact failures always answer with a submission result body.
            Self::Contact(err) => (status, Json(SubmissionResult::failed(&err))).into_response(),
            Self::Template(_) => (status, "Internal server error").into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("contact", "Contact form submitted", Some(&[("outcome", "delivered")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use melius_core::ContactField;
    use serde_json::{Value, json};

    use super::*;
    use crate::services::ProviderError;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("/missing".to_string());
        assert_eq!(err.to_string(), "Not found: /missing");

        let err = AppError::BadRequest("unknown field".to_string());
        assert_eq!(err.to_string(), "Bad request: unknown field");

        let err = AppError::from(ContactError::NotConfigured);
        assert_eq!(
            err.to_string(),
            "Email service is not configured. Please contact support directly."
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        let validation = melius_core::validate(&json!({})).unwrap_err();
        let delivery = ContactError::Delivery {
            message: "Mailtrap request failed with status 500".to_string(),
            source: ProviderError::Status(500),
        };

        assert_eq!(
            AppError::from(ContactError::from(validation)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(ContactError::NotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::from(delivery).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::NotFound(String::new()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let validation = melius_core::validate(&json!({
            "name": "Jo",
            "email": "not-an-email",
            "message": "Hello there, interested",
        }))
        .unwrap_err();
        assert!(validation.for_field(ContactField::Email).is_some());

        let response = AppError::from(ContactError::from(validation)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": "Invalid form data",
                "details": [{
                    "path": ["email"],
                    "code": "invalid_email",
                    "message": "Please enter a valid email address",
                }],
            })
        );
    }
}
