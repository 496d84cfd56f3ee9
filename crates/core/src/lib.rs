//! MELIUS Core - Shared contact form types and validation rules.
//!
//! This crate is used by the `site` binary for server-side validation of
//! contact submissions and for blur-time single-field checks.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no configuration. Validating the same input twice always yields
//! the same result.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, contact fields and submissions
//! - [`schema`] - The contact rule table and its two validation entry points

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod schema;
pub mod types;

pub use schema::{
    FieldIssue, IssueCode, ValidationErrors, validate, validate_field, validate_field_value,
};
pub use types::*;
