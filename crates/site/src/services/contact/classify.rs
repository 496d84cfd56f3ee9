//! Map delivery failures to operator-facing guidance.
//!
//! The message shown to the visitor names what to check in the Mailtrap
//! account. It never includes the API token.

use melius_core::Email;
use serde_json::Value;

use crate::services::provider::{ProbedResponse, ProviderError, probe_response, probe_status};

const AUTH_DETAIL_FALLBACK: &str = "Authentication failed";
const BAD_REQUEST_FALLBACK: &str = "Please check your email configuration.";
const BARE_STATUS_MESSAGE: &str = "Mailtrap authentication or configuration error. Please verify your API token and domain settings.";
const GENERIC_MESSAGE: &str = "Failed to send email. Please check your Mailtrap configuration.";

/// Build the user-visible message for a failed send.
///
/// Response-carrying errors anywhere in the source chain take priority,
/// then bare status codes, then the error's own text.
#[must_use]
pub fn delivery_failure_message(err: &ProviderError, sender: &Email) -> String {
    if let Some(message) = probe_response(err).and_then(|r| response_message(&r, sender)) {
        return message;
    }

    if matches!(probe_status(err), Some(401 | 422)) {
        return BARE_STATUS_MESSAGE.to_string();
    }

    let text = err.to_string();
    if text.trim().is_empty() {
        GENERIC_MESSAGE.to_string()
    } else {
        text
    }
}

fn response_message(response: &ProbedResponse, sender: &Email) -> Option<String> {
    let body = response.body.as_ref();
    match response.status {
        401 => Some(format!(
            "Authentication failed (401): {}. Please verify: 1) Your MAILTRAP_TOKEN is a Sending API token (not Testing), 2) Your domain is fully verified in Mailtrap, 3) The sender email ({sender}) matches your verified domain exactly.",
            auth_detail(body)
        )),
        422 => Some(format!(
            "Invalid email configuration (422). Please verify your sender email domain in Mailtrap and ensure the sender email ({sender}) matches your verified domain exactly."
        )),
        400 => Some(format!(
            "Invalid request (400). {}",
            body.and_then(|b| b.get("message"))
                .and_then(Value::as_str)
                .unwrap_or(BAD_REQUEST_FALLBACK)
        )),
        _ => None,
    }
}

/// Pick the most specific detail out of a 401 body.
fn auth_detail(body: Option<&Value>) -> String {
    let Some(data) = body.filter(|b| b.is_object()) else {
        return AUTH_DETAIL_FALLBACK.to_string();
    };

    if let Some(message) = non_empty_str(data, "message") {
        return message.to_string();
    }
    if let Some(errors) = data.get("errors").filter(|e| is_present(e)) {
        return errors.to_string();
    }
    if let Some(error) = non_empty_str(data, "error") {
        return error.to_string();
    }
    data.to_string()
}

fn non_empty_str<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sender() -> Email {
        Email::parse("hello@melius-ajnahal.com").unwrap()
    }

    fn response(status: u16, body: Option<Value>) -> ProviderError {
        ProviderError::Response { status, body }
    }

    #[test]
    fn test_401_with_errors_array() {
        let err = response(401, Some(json!({"errors": ["Unauthorized"]})));
        let message = delivery_failure_message(&err, &sender());
        assert!(message.starts_with("Authentication failed (401): [\"Unauthorized\"]. Please verify:"));
        assert!(message.contains("(hello@melius-ajnahal.com)"));
        assert!(message.contains("Sending API token (not Testing)"));
    }

    #[test]
    fn test_401_detail_precedence() {
        let detail = |body: Value| {
            let message = delivery_failure_message(&response(401, Some(body)), &sender());
            message
                .trim_start_matches("Authentication failed (401): ")
                .split(". Please verify")
                .next()
                .unwrap()
                .to_string()
        };

        assert_eq!(
            detail(json!({"message": "Bad token", "errors": ["x"], "error": "y"})),
            "Bad token"
        );
        assert_eq!(detail(json!({"errors": ["x"], "error": "y"})), "[\"x\"]");
        assert_eq!(detail(json!({"error": "y"})), "y");
        assert_eq!(detail(json!({"code": 7})), "{\"code\":7}");
        assert_eq!(detail(json!({"message": "", "error": "y"})), "y");
        assert_eq!(detail(json!("plain text")), "Authentication failed");
    }

    #[test]
    fn test_401_without_body() {
        let message = delivery_failure_message(&response(401, None), &sender());
        assert!(message.starts_with("Authentication failed (401): Authentication failed. "));
    }

    #[test]
    fn test_422_names_sender() {
        let message = delivery_failure_message(
            &response(422, Some(json!({"errors": ["domain not verified"]}))),
            &sender(),
        );
        assert_eq!(
            message,
            "Invalid email configuration (422). Please verify your sender email domain in Mailtrap and ensure the sender email (hello@melius-ajnahal.com) matches your verified domain exactly."
        );
    }

    #[test]
    fn test_400_message() {
        let with_message = response(400, Some(json!({"message": "Missing subject"})));
        assert_eq!(
            delivery_failure_message(&with_message, &sender()),
            "Invalid request (400). Missing subject"
        );

        let without = response(400, Some(json!({"errors": ["bad"]})));
        assert_eq!(
            delivery_failure_message(&without, &sender()),
            "Invalid request (400). Please check your email configuration."
        );

        let empty = response(400, Some(json!({"message": ""})));
        assert_eq!(
            delivery_failure_message(&empty, &sender()),
            "Invalid request (400). "
        );
    }

    #[test]
    fn test_nested_response_is_found() {
        let err = ProviderError::wrap(
            "send failed",
            response(401, Some(json!({"errors": ["Unauthorized"]}))),
        );
        let message = delivery_failure_message(&err, &sender());
        assert!(message.starts_with("Authentication failed (401)"));
    }

    #[test]
    fn test_bare_status() {
        for status in [401, 422] {
            let err = ProviderError::wrap("sdk", ProviderError::Status(status));
            assert_eq!(delivery_failure_message(&err, &sender()), BARE_STATUS_MESSAGE);
        }
    }

    #[test]
    fn test_other_status_falls_back_to_error_text() {
        let err = response(500, Some(json!({"message": "boom"})));
        assert_eq!(
            delivery_failure_message(&err, &sender()),
            "Mailtrap API returned status 500"
        );

        let err = ProviderError::Status(503);
        assert_eq!(
            delivery_failure_message(&err, &sender()),
            "Mailtrap request failed with status 503"
        );
    }

    #[test]
    fn test_empty_error_text_uses_generic_message() {
        let err = ProviderError::wrap("", std::io::Error::other("reset"));
        assert_eq!(delivery_failure_message(&err, &sender()), GENERIC_MESSAGE);
    }

    #[test]
    fn test_plain_error_text() {
        let err = ProviderError::Parse("unexpected body".to_string());
        assert_eq!(
            delivery_failure_message(&err, &sender()),
            "Parse error: unexpected body"
        );
    }
}
