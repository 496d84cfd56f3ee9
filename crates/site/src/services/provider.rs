//! Email delivery provider abstraction.
//!
//! The contact handler talks to the delivery service only through
//! [`EmailProvider`], so tests can substitute a stub and the Mailtrap client
//! stays a thin HTTP wrapper.

use std::error::Error as StdError;

use async_trait::async_trait;
use melius_core::Email;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A sender or recipient mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Mailbox {
    /// A mailbox with no display name.
    #[must_use]
    pub const fn address(email: Email) -> Self {
        Self { email, name: None }
    }

    /// A mailbox with a display name.
    #[must_use]
    pub fn named(email: Email, name: impl Into<String>) -> Self {
        Self {
            email,
            name: Some(name.into()),
        }
    }
}

/// A fully composed transactional email.
///
/// Serializes to the Mailtrap Sending API request body.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Mailbox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Mailbox>,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub category: String,
}

/// Successful send response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendReceipt {
    #[serde(default)]
    pub success: bool,
    /// Provider-assigned message ids, when the provider returned any.
    #[serde(default)]
    pub message_ids: Option<Vec<String>>,
}

/// Errors that can occur when sending through a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with an error status and (maybe) a body.
    #[error("Mailtrap API returned status {status}")]
    Response {
        status: u16,
        body: Option<Value>,
    },

    /// A bare status code with no response body attached.
    ///
    /// `MailtrapClient` never returns this; other providers and wrappers may.
    #[error("Mailtrap request failed with status {0}")]
    Status(u16),

    /// HTTP transport failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failed to parse a success response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No API token is configured.
    #[error("Mailtrap API token is not configured")]
    NotConfigured,

    /// Another error wrapping the real cause.
    ///
    /// Lets a provider nest its response under its own error; the probes
    /// below look through it.
    #[error("{context}")]
    Wrapped {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

impl ProviderError {
    /// Wrap `source` under a context message.
    pub fn wrap(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Wrapped {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Delivers composed emails.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the message was not accepted.
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, ProviderError>;
}

/// A provider response found somewhere in an error chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedResponse {
    pub status: u16,
    pub body: Option<Value>,
}

/// Find the first provider response in `err` or any of its sources.
#[must_use]
pub fn probe_response(err: &(dyn StdError + 'static)) -> Option<ProbedResponse> {
    chain(err).find_map(|e| match e.downcast_ref::<ProviderError>() {
        Some(ProviderError::Response { status, body }) => Some(ProbedResponse {
            status: *status,
            body: body.clone(),
        }),
        _ => None,
    })
}

/// Find the first bare status code in `err` or any of its sources.
///
/// Response-carrying errors are skipped; see [`probe_response`].
#[must_use]
pub fn probe_status(err: &(dyn StdError + 'static)) -> Option<u16> {
    chain(err).find_map(|e| {
        if let Some(ProviderError::Status(status)) = e.downcast_ref::<ProviderError>() {
            return Some(*status);
        }
        // Set by `error_for_status`, which `MailtrapClient` does not call.
        e.downcast_ref::<reqwest::Error>()
            .and_then(reqwest::Error::status)
            .map(|status| status.as_u16())
    })
}

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |e: &&'a (dyn StdError + 'static)| (*e).source())
}
