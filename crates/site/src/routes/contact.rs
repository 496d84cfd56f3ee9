//! Contact form route handlers.
//!
//! `POST /contact` runs a submission through the contact service and always
//! answers with a `SubmissionResult` body. `POST /contact/validate` checks a
//! single field for blur-time feedback.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use melius_core::{ContactField, validate_field_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::SubmissionResult;
use crate::state::AppState;

/// Submit the contact form.
///
/// POST /contact
///
/// A body that is not JSON is treated like an empty payload, so it fails
/// validation with one issue per field.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmissionResult>> {
    let payload = payload.map_or_else(
        |rejection| {
            tracing::debug!(error = %rejection, "Unreadable contact payload");
            Value::Null
        },
        |Json(value)| value,
    );

    let outcome = state.contact().submit(&payload).await;
    let result = SubmissionResult::from(&outcome);
    add_breadcrumb(
        "contact",
        "Contact form submitted",
        Some(&[("outcome", if result.success { "delivered" } else { "failed" })]),
    );

    // Failures are answered by `AppError`.
    outcome?;
    tracing::info!(
        count = result.message_ids.as_ref().map_or(0, Vec::len),
        "Contact form delivered"
    );
    Ok(Json(result))
}

/// Single-field check request.
#[derive(Debug, Deserialize)]
pub struct FieldCheck {
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

/// Single-field check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldVerdict {
    pub field: ContactField,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check one contact field.
///
/// POST /contact/validate
#[instrument(skip_all)]
pub async fn validate(
    check: std::result::Result<Json<FieldCheck>, JsonRejection>,
) -> Result<Json<FieldVerdict>> {
    let Json(check) = check.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let field: ContactField = check
        .field
        .parse()
        .map_err(|e: melius_core::UnknownField| AppError::BadRequest(e.to_string()))?;

    let verdict = match validate_field_value(field, &check.value) {
        Ok(_) => FieldVerdict {
            field,
            valid: true,
            error: None,
        },
        Err(issue) => FieldVerdict {
            field,
            valid: false,
            error: Some(issue.message),
        },
    };

    Ok(Json(verdict))
}
