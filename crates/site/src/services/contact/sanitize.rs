//! HTML escaping for user-supplied contact fields.

use melius_core::ContactSubmission;

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Submission fields made safe for interpolation into HTML email bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedSubmission {
    pub name: String,
    pub email: String,
    /// Escaped message with line breaks rendered as `<br>`.
    pub message: String,
}

impl EscapedSubmission {
    #[must_use]
    pub fn new(submission: &ContactSubmission) -> Self {
        let message = escape_html(submission.message())
            .replace("\r\n", "\n")
            .replace('\n', "<br>");

        Self {
            name: escape_html(submission.name()),
            email: escape_html(submission.email().as_str()),
            message,
        }
    }
}
