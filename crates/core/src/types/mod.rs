//! Core types for the MELIUS site.
//!
//! This module provides type-safe wrappers for contact form data.

pub mod contact;
pub mod email;

pub use contact::{ContactField, ContactSubmission, UnknownField};
pub use email::{Email, EmailError};
