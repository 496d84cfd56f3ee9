//! Lead notification and acknowledgment email composition.

use askama::Template;
use melius_core::ContactSubmission;

use crate::config::MailtrapConfig;
use crate::services::provider::{Mailbox, OutboundEmail};

use super::sanitize::EscapedSubmission;

const LEAD_SENDER_NAME: &str = "Melius Contact Form";
const LEAD_CATEGORY: &str = "contact_form";

const ACKNOWLEDGMENT_SENDER_NAME: &str = "Melius - Mayura Kataria";
const ACKNOWLEDGMENT_SUBJECT: &str = "Thank you for reaching out to Melius";
const ACKNOWLEDGMENT_SIGNATURE: &str = "Mayura Kataria";
const ACKNOWLEDGMENT_CATEGORY: &str = "thank_you";

/// HTML body of the lead notification. Fields are pre-escaped.
#[derive(Template)]
#[template(path = "email/lead_notification.html")]
struct LeadNotificationHtml<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// Plain text body of the lead notification.
#[derive(Template)]
#[template(path = "email/lead_notification.txt")]
struct LeadNotificationText<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// HTML body of the acknowledgment. `name` is pre-escaped.
#[derive(Template)]
#[template(path = "email/acknowledgment.html")]
struct AcknowledgmentHtml<'a> {
    name: &'a str,
    signature: &'a str,
}

/// Plain text body of the acknowledgment.
#[derive(Template)]
#[template(path = "email/acknowledgment.txt")]
struct AcknowledgmentText<'a> {
    name: &'a str,
    signature: &'a str,
}

/// Compose the notification sent to the operator for a new lead.
///
/// Replies go straight to the submitter.
///
/// # Errors
///
/// Returns error if a template fails to render.
pub fn lead_notification(
    submission: &ContactSubmission,
    escaped: &EscapedSubmission,
    config: &MailtrapConfig,
) -> Result<OutboundEmail, askama::Error> {
    let html = LeadNotificationHtml {
        name: &escaped.name,
        email: &escaped.email,
        message: &escaped.message,
    }
    .render()?;
    let text = LeadNotificationText {
        name: submission.name(),
        email: submission.email().as_str(),
        message: submission.message(),
    }
    .render()?;

    Ok(OutboundEmail {
        from: Mailbox::named(config.sender_email.clone(), LEAD_SENDER_NAME),
        to: vec![Mailbox::address(config.recipient_email.clone())],
        bcc: config
            .bcc_email
            .iter()
            .cloned()
            .map(Mailbox::address)
            .collect(),
        reply_to: Some(Mailbox::address(submission.email().clone())),
        subject: format!(
            "[MELIUS LEAD] - Contact form fill by {}",
            single_line(submission.name())
        ),
        text,
        html,
        category: LEAD_CATEGORY.to_string(),
    })
}

/// Compose the thank-you reply sent to the submitter.
///
/// Never quotes the submitted message. Replies go to the operator.
///
/// # Errors
///
/// Returns error if a template fails to render.
pub fn acknowledgment(
    submission: &ContactSubmission,
    escaped: &EscapedSubmission,
    config: &MailtrapConfig,
) -> Result<OutboundEmail, askama::Error> {
    let html = AcknowledgmentHtml {
        name: &escaped.name,
        signature: ACKNOWLEDGMENT_SIGNATURE,
    }
    .render()?;
    let text = AcknowledgmentText {
        name: submission.name(),
        signature: ACKNOWLEDGMENT_SIGNATURE,
    }
    .render()?;

    Ok(OutboundEmail {
        from: Mailbox::named(config.sender_email.clone(), ACKNOWLEDGMENT_SENDER_NAME),
        to: vec![Mailbox::named(
            submission.email().clone(),
            submission.name(),
        )],
        bcc: Vec::new(),
        reply_to: Some(Mailbox::address(config.recipient_email.clone())),
        subject: ACKNOWLEDGMENT_SUBJECT.to_string(),
        text,
        html,
        category: ACKNOWLEDGMENT_CATEGORY.to_string(),
    })
}

/// Collapse control characters so a value fits on a subject line.
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
