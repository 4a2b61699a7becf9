//! Error types for the lead-capture pipeline.

use serde::{Deserialize, Serialize};

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// One offending field in a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Wire name of the field (camelCase, as submitted).
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A submission failed its input constraints. Raised before any formatting
/// or delivery is attempted.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{} invalid field(s): {}", .issues.len(), describe_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Whether `field` is among the offending fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

/// Delivery channel errors.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Delivery channel {name} is not configured")]
    Unavailable { name: String },

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Transmission failed: {0}")]
    Transport(String),
}

/// Errors raised while handing a lead to the gateway from the chat side.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Lead rejected by gateway: {}", describe_issues(.0))]
    Rejected(Vec<FieldIssue>),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),
}

impl From<ValidationError> for SubmissionError {
    fn from(err: ValidationError) -> Self {
        Self::Rejected(err.issues)
    }
}
