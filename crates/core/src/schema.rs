//! Contact form validation rules.
//!
//! One rule table drives both entry points:
//!
//! - [`validate_field`] checks a single value (blur-time feedback) and
//!   reports the first rule it violates.
//! - [`validate`] checks a whole untyped payload (submit time, and the
//!   authoritative server-side gate) and yields either a normalized
//!   [`ContactSubmission`] or one issue per failing field.
//!
//! Values are trimmed before any rule runs. Lengths count Unicode scalar
//! values, not bytes.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::types::{ContactField, ContactSubmission, Email};

/// Minimum name length.
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum name length.
pub const NAME_MAX_CHARS: usize = 100;
/// Minimum message length.
pub const MESSAGE_MIN_CHARS: usize = 10;
/// Maximum message length.
pub const MESSAGE_MAX_CHARS: usize = 2000;

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The value must not be empty.
    Required,
    /// The value must have at least this many characters.
    MinChars(usize),
    /// The value must have at most this many characters.
    MaxChars(usize),
    /// The value must be a syntactically valid email address.
    EmailSyntax,
}

impl Constraint {
    /// Whether `value` (already trimmed) satisfies this constraint.
    #[must_use]
    pub fn is_satisfied_by(self, value: &str) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::MinChars(min) => value.chars().count() >= min,
            Self::MaxChars(max) => value.chars().count() <= max,
            Self::EmailSyntax => Email::parse(value).is_ok(),
        }
    }

    const fn code(self) -> IssueCode {
        match self {
            Self::Required => IssueCode::Required,
            Self::MinChars(_) => IssueCode::TooShort,
            Self::MaxChars(_) => IssueCode::TooLong,
            Self::EmailSyntax => IssueCode::InvalidEmail,
        }
    }
}

/// A constraint paired with the message shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub constraint: Constraint,
    pub message: &'static str,
}

const NAME_RULES: &[Rule] = &[
    Rule {
        constraint: Constraint::Required,
        message: "Name is required",
    },
    Rule {
        constraint: Constraint::MinChars(NAME_MIN_CHARS),
        message: "Name must be at least 2 characters",
    },
    Rule {
        constraint: Constraint::MaxChars(NAME_MAX_CHARS),
        message: "Name must be less than 100 characters",
    },
];

const EMAIL_RULES: &[Rule] = &[
    Rule {
        constraint: Constraint::Required,
        message: "Email is required",
    },
    Rule {
        constraint: Constraint::EmailSyntax,
        message: "Please enter a valid email address",
    },
];

const MESSAGE_RULES: &[Rule] = &[
    Rule {
        constraint: Constraint::Required,
        message: "Message is required",
    },
    Rule {
        constraint: Constraint::MinChars(MESSAGE_MIN_CHARS),
        message: "Message must be at least 10 characters",
    },
    Rule {
        constraint: Constraint::MaxChars(MESSAGE_MAX_CHARS),
        message: "Message must be less than 2000 characters",
    },
];

/// The rules for `field`, in priority order.
#[must_use]
pub const fn rules(field: ContactField) -> &'static [Rule] {
    match field {
        ContactField::Name => NAME_RULES,
        ContactField::Email => EMAIL_RULES,
        ContactField::Message => MESSAGE_RULES,
    }
}

/// Machine-readable kind of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Required,
    InvalidType,
    TooShort,
    TooLong,
    InvalidEmail,
}

/// A validation problem with one field.
///
/// Serializes as `{"path": ["name"], "code": "too_short", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    #[serde(rename = "path", serialize_with = "serialize_path")]
    pub field: ContactField,
    pub code: IssueCode,
    pub message: String,
}

impl FieldIssue {
    fn from_rule(field: ContactField, rule: &Rule) -> Self {
        Self {
            field,
            code: rule.constraint.code(),
            message: rule.message.to_string(),
        }
    }

    fn invalid_type(field: ContactField) -> Self {
        Self {
            field,
            code: IssueCode::InvalidType,
            message: format!("{} must be text", field.label()),
        }
    }
}

fn serialize_path<S: Serializer>(field: &ContactField, serializer: S) -> Result<S::Ok, S::Error> {
    [field.as_str()].serialize(serializer)
}

/// The issues found while validating a whole submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid contact submission ({} issue(s))", .0.len())]
pub struct ValidationErrors(Vec<FieldIssue>);

impl ValidationErrors {
    /// All issues, in form field order.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }

    /// The issue reported for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: ContactField) -> Option<&FieldIssue> {
        self.0.iter().find(|issue| issue.field == field)
    }

    /// Consumes the errors and returns the issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.0
    }
}

/// Validate a single field value.
///
/// Returns the trimmed value when every rule passes.
///
/// # Errors
///
/// Returns the issue for the first rule (in priority order) the trimmed
/// value violates.
pub fn validate_field(field: ContactField, value: &str) -> Result<String, FieldIssue> {
    let trimmed = value.trim();
    rules(field)
        .iter()
        .find(|rule| !rule.constraint.is_satisfied_by(trimmed))
        .map_or_else(
            || Ok(trimmed.to_string()),
            |rule| Err(FieldIssue::from_rule(field, rule)),
        )
}

/// Validate an untyped contact payload.
///
/// Missing and `null` fields count as empty strings; any other non-string
/// value is reported as `invalid_type`. A payload that is not a JSON object
/// has every field missing.
///
/// # Errors
///
/// Returns [`ValidationErrors`] holding at most one issue per field when any
/// field fails. No partially valid submission is ever produced.
pub fn validate(payload: &Value) -> Result<ContactSubmission, ValidationErrors> {
    let mut issues = Vec::new();
    let mut take = |field: ContactField| match validate_field_value(
        field,
        payload.get(field.as_str()).unwrap_or(&Value::Null),
    ) {
        Ok(value) => Some(value),
        Err(issue) => {
            issues.push(issue);
            None
        }
    };

    let name = take(ContactField::Name);
    let email = take(ContactField::Email);
    let message = take(ContactField::Message);

    // The email rules include `Constraint::EmailSyntax`.
    let email = email.map(Email::from_checked);

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) if issues.is_empty() => {
            Ok(ContactSubmission::new(name, email, message))
        }
        _ => Err(ValidationErrors(issues)),
    }
}

/// Validate a single field given as untyped JSON.
///
/// `null` counts as an empty string; any other non-string value is
/// reported as `invalid_type`.
///
/// # Errors
///
/// Returns the first issue found, as [`validate_field`] does.
pub fn validate_field_value(field: ContactField, value: &Value) -> Result<String, FieldIssue> {
    match value {
        Value::Null => validate_field(field, ""),
        Value::String(value) => validate_field(field, value),
        _ => Err(FieldIssue::invalid_type(field)),
    }
}
