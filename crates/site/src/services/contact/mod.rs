//! Contact form submission handling.
//!
//! A submission is re-validated, escaped for HTML, and delivered as two
//! emails through the configured [`EmailProvider`]: a lead notification to the
//! operator, then an acknowledgment to the submitter.

mod classify;
mod messages;
mod sanitize;

use std::sync::Arc;

use melius_core::{FieldIssue, ValidationErrors};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::config::MailtrapConfig;
use crate::services::provider::{EmailProvider, ProviderError, probe_response, probe_status};

pub use classify::delivery_failure_message;
pub use messages::{acknowledgment, lead_notification};
pub use sanitize::{EscapedSubmission, escape_html};

const RENDER_FAILED_MESSAGE: &str = "Failed to send email. Please try again later.";

/// Why a submission was not delivered.
#[derive(Debug, Error)]
pub enum ContactError {
    /// The payload failed the contact schema.
    #[error("Invalid form data")]
    Validation(#[from] ValidationErrors),

    /// No Mailtrap token is configured.
    #[error("Email service is not configured. Please contact support directly.")]
    NotConfigured,

    /// An email template failed to render.
    #[error("Failed to render email: {0}")]
    Render(#[from] askama::Error),

    /// The provider rejected a send or could not be reached.
    ///
    /// `message` is already classified for display.
    #[error("{message}")]
    Delivery {
        message: String,
        #[source]
        source: ProviderError,
    },
}

impl ContactError {
    /// Text safe to show to the visitor.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Render(_) => RENDER_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON body returned for every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

impl SubmissionResult {
    #[must_use]
    pub const fn delivered(message_ids: Vec<String>) -> Self {
        Self {
            success: true,
            message_ids: Some(message_ids),
            error: None,
            details: None,
        }
    }

    #[must_use]
    pub fn failed(err: &ContactError) -> Self {
        let details = match err {
            ContactError::Validation(errors) => Some(errors.issues().to_vec()),
            _ => None,
        };
        Self {
            success: false,
            message_ids: None,
            error: Some(err.user_message()),
            details,
        }
    }
}

impl From<&Result<Vec<String>, ContactError>> for SubmissionResult {
    fn from(outcome: &Result<Vec<String>, ContactError>) -> Self {
        match outcome {
            Ok(ids) => Self::delivered(ids.clone()),
            Err(err) => Self::failed(err),
        }
    }
}

/// Validates and delivers contact form submissions.
#[derive(Clone)]
pub struct ContactService {
    config: Arc<MailtrapConfig>,
    provider: Arc<dyn EmailProvider>,
}

impl ContactService {
    #[must_use]
    pub fn new(config: MailtrapConfig, provider: Arc<dyn EmailProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// Handle one submission payload end to end.
    ///
    /// Returns the provider message ids of both sends, in send order.
    ///
    /// # Errors
    ///
    /// Returns `ContactError` if the payload is invalid, the provider is not
    /// configured, or either send fails. Nothing is sent in the first two
    /// cases. A failed acknowledgment does not recall the lead notification.
    #[instrument(skip_all)]
    pub async fn submit(&self, payload: &Value) -> Result<Vec<String>, ContactError> {
        let submission = melius_core::validate(payload).inspect_err(|errors| {
            tracing::info!(issues = errors.issues().len(), "Contact form rejected");
        })?;

        if !self.config.is_configured() {
            tracing::error!("Mailtrap token is not configured; contact form disabled");
            return Err(ContactError::NotConfigured);
        }

        let escaped = EscapedSubmission::new(&submission);
        let lead = lead_notification(&submission, &escaped, &self.config)?;
        let thanks = acknowledgment(&submission, &escaped, &self.config)?;

        let mut message_ids = Vec::new();
        for email in [&lead, &thanks] {
            let receipt = self
                .provider
                .send(email)
                .await
                .map_err(|source| self.delivery_failed(&email.category, source))?;
            tracing::info!(
                category = %email.category,
                success = receipt.success,
                message_ids = ?receipt.message_ids,
                "Email sent"
            );
            message_ids.extend(receipt.message_ids.unwrap_or_default());
        }

        Ok(message_ids)
    }

    fn delivery_failed(&self, category: &str, source: ProviderError) -> ContactError {
        let probed = probe_response(&source);
        tracing::error!(
            category,
            status = probed.as_ref().map(|p| p.status).or_else(|| probe_status(&source)),
            body = ?probed.and_then(|p| p.body),
            sender = %self.config.sender_email,
            token = %self.config.token_fingerprint(),
            error = %source,
            "Mailtrap send failed"
        );

        ContactError::Delivery {
            message: delivery_failure_message(&source, &self.config.sender_email),
            source,
        }
    }
}
