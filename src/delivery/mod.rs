//! Delivery channel abstraction for outbound email.

pub mod smtp;

use async_trait::async_trait;

use crate::error::DeliveryError;

pub use smtp::{SmtpChannel, SmtpConfig};

/// A fully rendered outbound email. Built once per submission and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub reply_to: Option<String>,
}

/// Outbound transport. Pure I/O: no formatting or validation.
///
/// One instance is constructed at startup and shared across concurrent
/// requests, so implementations must not hold per-request state.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Channel name (e.g. "smtp").
    fn name(&self) -> &str;

    /// Whether the channel has the configuration it needs to send.
    fn is_configured(&self) -> bool;

    /// Transmit one message.
    ///
    /// Returns `DeliveryError::Unavailable` when the channel is unconfigured.
    async fn send_message(&self, message: &EmailMessage) -> Result<(), DeliveryError>;

    /// Check that the remote end accepts connections, without sending.
    ///
    /// An unconfigured channel reports `Ok(false)`.
    async fn verify_connection(&self) -> Result<bool, DeliveryError>;
}
