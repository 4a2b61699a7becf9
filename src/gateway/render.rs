//! Plain-text and HTML renditions of lead and contact-form emails.
//!
//! The HTML side goes through minijinja with auto-escaping (templates end in
//! `.html`), so visitor-supplied text cannot inject markup.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use minijinja::{Environment, context};
use serde::Serialize;

use super::types::{ContactSubmission, ConversationTurn, LeadSubmission, Stamped};
use crate::config::BRAND_NAME;

const LEAD_TEMPLATE: &str = include_str!("templates/lead.html");
const CONTACT_TEMPLATE: &str = include_str!("templates/contact.html");

const NOT_PROVIDED: &str = "Not provided";
const NOT_SPECIFIED: &str = "Not specified";

/// Subject and both bodies of an outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Serialize)]
struct TurnView<'a> {
    speaker: &'static str,
    content: &'a str,
}

/// Render a validated lead.
pub fn render_lead(lead: &Stamped<LeadSubmission>) -> Result<RenderedEmail, minijinja::Error> {
    let data = &lead.data;
    let company = or_placeholder(data.visitor_company.as_deref(), NOT_PROVIDED);
    let budget = or_placeholder(data.budget.as_deref(), NOT_SPECIFIED);
    let timeline = or_placeholder(data.timeline.as_deref(), NOT_SPECIFIED);

    let subject = format!("🔥 New Lead: {} - {}", data.visitor_name, data.project_type);

    let text = format!(
        "NEW LEAD FROM {brand} WEBSITE
==================================

VISITOR INFORMATION
-------------------
Name: {name}
Email: {email}
Company: {company}
Language: {language}
Timestamp: {timestamp}

PROJECT DETAILS
---------------
Type: {project_type}
Description: {description}
Budget: {budget}
Timeline: {timeline}

CONVERSATION HISTORY
--------------------
{conversation}

---
This lead was captured by the {brand_name} SDR Agent.
",
        brand = BRAND_NAME.to_uppercase(),
        brand_name = BRAND_NAME,
        name = data.visitor_name,
        email = data.visitor_email,
        language = data.language,
        timestamp = iso_timestamp(&lead.received_at),
        project_type = data.project_type,
        description = data.project_description,
        conversation = conversation_text(&data.conversation_history),
    );

    let turns: Vec<TurnView<'_>> = data
        .conversation_history
        .iter()
        .map(|turn| TurnView {
            speaker: turn.role.speaker_label(),
            content: &turn.content,
        })
        .collect();

    let mut env = Environment::new();
    env.add_template("lead.html", LEAD_TEMPLATE)?;
    let html = env.get_template("lead.html")?.render(context! {
        name => data.visitor_name,
        email => data.visitor_email,
        company => company,
        language => data.language,
        timestamp => display_timestamp(&lead.received_at),
        project_type => data.project_type,
        project_description => data.project_description,
        budget => budget,
        timeline => timeline,
        turns => turns,
        brand => BRAND_NAME,
        year => lead.received_at.year(),
    })?;

    Ok(RenderedEmail {
        subject,
        text,
        html,
    })
}

/// Render a validated contact-form message.
pub fn render_contact(
    contact: &Stamped<ContactSubmission>,
) -> Result<RenderedEmail, minijinja::Error> {
    let data = &contact.data;
    let company = or_placeholder(data.company.as_deref(), NOT_PROVIDED);
    let phone = or_placeholder(data.phone.as_deref(), NOT_PROVIDED);

    let subject = format!("📬 Contact Form: {}", data.subject);

    let text = format!(
        "NEW CONTACT FORM SUBMISSION
===========================

FROM
----
Name: {name}
Email: {email}
Company: {company}
Phone: {phone}

SUBJECT
-------
{subject}

MESSAGE
-------
{message}

---
Submitted at: {timestamp}
",
        name = data.name,
        email = data.email,
        subject = data.subject,
        message = data.message,
        timestamp = iso_timestamp(&contact.received_at),
    );

    let mut env = Environment::new();
    env.add_template("contact.html", CONTACT_TEMPLATE)?;
    let html = env.get_template("contact.html")?.render(context! {
        name => data.name,
        email => data.email,
        company => company,
        phone => phone,
        subject => data.subject,
        message => data.message,
        timestamp => display_timestamp(&contact.received_at),
        brand => BRAND_NAME,
        year => contact.received_at.year(),
    })?;

    Ok(RenderedEmail {
        subject,
        text,
        html,
    })
}

/// Transcript as `Speaker: content` turns separated by blank lines.
pub fn conversation_text(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.speaker_label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => placeholder,
    }
}

fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn display_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y %H:%M:%S UTC").to_string()
}
