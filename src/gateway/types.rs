//! Wire types for the submission endpoints, plus their input constraints.
//!
//! Field names are camelCase on the wire. Required string fields default to
//! empty when absent so that a missing field is reported as a validation
//! issue instead of a deserialization failure.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FieldIssue, ValidationError};

/// Minimum length of a contact-form message body, in UTF-16 code units
/// (what a browser reports as `string.length`).
pub const MIN_CONTACT_MESSAGE_CHARS: usize = 10;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

impl Role {
    /// Label used when a turn is replayed into an outbound email.
    pub fn speaker_label(&self) -> &'static str {
        match self {
            Self::Assistant => "SDR Agent",
            Self::User => "Visitor",
        }
    }
}

/// One replayed turn of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// Lead captured by the scripted chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub visitor_name: String,
    #[serde(default)]
    pub visitor_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_company: Option<String>,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl LeadSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        require_non_empty(&mut issues, "visitorName", &self.visitor_name);
        require_email(&mut issues, "visitorEmail", &self.visitor_email);
        require_non_empty(&mut issues, "projectType", &self.project_type);
        require_non_empty(&mut issues, "projectDescription", &self.project_description);
        finish(issues)
    }
}

/// Message from the site's contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        require_non_empty(&mut issues, "name", &self.name);
        require_email(&mut issues, "email", &self.email);
        require_non_empty(&mut issues, "subject", &self.subject);
        if self.message.encode_utf16().count() < MIN_CONTACT_MESSAGE_CHARS {
            issues.push(FieldIssue::new(
                "message",
                format!("must be at least {MIN_CONTACT_MESSAGE_CHARS} characters"),
            ));
        }
        finish(issues)
    }
}

/// Validated submission plus the time the gateway accepted it.
#[derive(Debug, Clone)]
pub struct Stamped<T> {
    pub data: T,
    pub received_at: DateTime<Utc>,
}

impl<T> Stamped<T> {
    pub fn now(data: T) -> Self {
        Self {
            data,
            received_at: Utc::now(),
        }
    }
}

/// Result of a submission endpoint. The message is keyed only on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// Result of the delivery status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub configured: bool,
    pub message: String,
}

// ── Constraint helpers ──────────────────────────────────────────────

fn require_non_empty(issues: &mut Vec<FieldIssue>, field: &str, value: &str) {
    if value.is_empty() {
        issues.push(FieldIssue::new(field, "must not be empty"));
    }
}

fn require_email(issues: &mut Vec<FieldIssue>, field: &str, value: &str) {
    if !is_valid_email(value) {
        issues.push(FieldIssue::new(field, "must be a valid email address"));
    }
}

fn finish(issues: Vec<FieldIssue>) -> Result<(), ValidationError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap()
});

/// Syntactic email check applied at the gateway.
///
/// Local part: letters, digits and `_'+-.`, not starting with `.`, without
/// `..`, not ending in `.` or `'`. Domain: dot-separated labels ending in an
/// alphabetic TLD of at least two letters.
pub fn is_valid_email(value: &str) -> bool {
    if value.starts_with('.') || value.contains("..") {
        return false;
    }
    EMAIL_SHAPE.is_match(value)
}
