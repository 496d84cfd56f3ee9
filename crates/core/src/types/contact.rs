//! Contact form types.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;

/// A field of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    /// All fields, in the order they appear on the form.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// The form key (and JSON property name) for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    /// Human-readable label used in validation messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "message" => Ok(Self::Message),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Error returned when a string does not name a contact form field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown contact field: {0}")]
pub struct UnknownField(pub String);

/// A validated contact form submission.
///
/// Only produced by [`crate::schema::validate`], so every instance holds
/// trimmed values that satisfy the contact rules. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    name: String,
    email: Email,
    message: String,
}

impl ContactSubmission {
    pub(crate) const fn new(name: String, email: Email, message: String) -> Self {
        Self {
            name,
            email,
            message,
        }
    }

    /// The submitter's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The submitter's email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// The message body, with inner newlines preserved.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
