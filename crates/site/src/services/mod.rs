//! Business logic services for the site.
//!
//! # Services
//!
//! - `contact` - Contact form validation and delivery
//! - `mailtrap` - Mailtrap Sending API client
//! - `provider` - Email provider trait and error probing

pub mod contact;
pub mod mailtrap;
pub mod provider;

pub use contact::{ContactError, ContactService, SubmissionResult};
pub use mailtrap::MailtrapClient;
pub use provider::{EmailProvider, ProviderError};
