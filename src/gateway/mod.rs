//! Lead submission gateway: validate, render, dispatch.
//!
//! Every submission is validated before anything is formatted or sent.
//! Delivery problems never escape as errors: they are logged and reported
//! as `success: false`.

pub mod render;
pub mod routes;
pub mod types;

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{DEFAULT_LEAD_INBOX, GatewayConfig};
use crate::delivery::{DeliveryChannel, EmailMessage};
use crate::error::{DeliveryError, ValidationError};

pub use render::RenderedEmail;
pub use routes::email_routes;
pub use types::{
    ContactSubmission, ConversationTurn, DeliveryStatus, LeadSubmission, Role, Stamped,
    SubmitResponse,
};

pub const LEAD_SENT: &str = "Lead submitted successfully. Our team will contact you shortly.";
pub const LEAD_FAILED: &str = "Failed to submit lead. Please try again or contact us directly.";
pub const CONTACT_SENT: &str = "Message sent successfully. We'll get back to you soon.";
pub const STATUS_READY: &str = "Email service is configured and ready";
pub const STATUS_UNCONFIGURED: &str =
    "Email service is not configured. Please set SMTP environment variables.";

/// Failure message for the contact form, pointing at the fallback inbox.
pub fn contact_failed_message() -> String {
    format!("Failed to send message. Please try again or email us directly at {DEFAULT_LEAD_INBOX}")
}

/// Validates submissions and hands rendered email to the delivery channel.
///
/// Cheap to share: holds only configuration and the shared channel handle.
pub struct Gateway {
    channel: Arc<dyn DeliveryChannel>,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(channel: Arc<dyn DeliveryChannel>, config: GatewayConfig) -> Self {
        Self { channel, config }
    }

    /// Inbox that receives rendered submissions.
    pub fn lead_inbox(&self) -> &str {
        &self.config.lead_inbox
    }

    /// Validate, render and send a chat lead.
    pub async fn submit_lead(
        &self,
        submission: LeadSubmission,
    ) -> Result<SubmitResponse, ValidationError> {
        submission.validate()?;
        let lead = Stamped::now(submission);

        let success = match render::render_lead(&lead) {
            Ok(rendered) => self.dispatch(rendered, &lead.data.visitor_email).await,
            Err(e) => {
                error!("Failed to render lead email: {e}");
                false
            }
        };

        Ok(SubmitResponse {
            success,
            message: if success { LEAD_SENT } else { LEAD_FAILED }.to_string(),
        })
    }

    /// Validate, render and send a contact-form message.
    pub async fn submit_contact_form(
        &self,
        submission: ContactSubmission,
    ) -> Result<SubmitResponse, ValidationError> {
        submission.validate()?;
        let contact = Stamped::now(submission);

        let success = match render::render_contact(&contact) {
            Ok(rendered) => self.dispatch(rendered, &contact.data.email).await,
            Err(e) => {
                error!("Failed to render contact email: {e}");
                false
            }
        };

        Ok(SubmitResponse {
            success,
            message: if success {
                CONTACT_SENT.to_string()
            } else {
                contact_failed_message()
            },
        })
    }

    /// Verify the delivery channel without sending anything. Never fails.
    pub async fn check_delivery_status(&self) -> DeliveryStatus {
        let configured = match self.channel.verify_connection().await {
            Ok(ok) => ok,
            Err(e) => {
                error!("SMTP connection verification failed: {e}");
                false
            }
        };

        DeliveryStatus {
            configured,
            message: if configured {
                STATUS_READY
            } else {
                STATUS_UNCONFIGURED
            }
            .to_string(),
        }
    }

    async fn dispatch(&self, rendered: RenderedEmail, reply_to: &str) -> bool {
        let message = EmailMessage {
            to: self.config.lead_inbox.clone(),
            subject: rendered.subject,
            text: rendered.text,
            html: rendered.html,
            reply_to: Some(reply_to.to_string()),
        };

        match self.channel.send_message(&message).await {
            Ok(()) => {
                info!(to = %message.to, channel = self.channel.name(), "Submission delivered");
                true
            }
            Err(DeliveryError::Unavailable { name }) => {
                warn!("Cannot send email: {name} channel not configured");
                false
            }
            Err(e) => {
                error!("Failed to send: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording delivery channel shared by the gateway and chat tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// How the mock channel behaves on send/verify.
    #[derive(Debug, Clone, Copy)]
    pub enum Behavior {
        Deliver,
        Fail,
        Unconfigured,
    }

    pub struct RecordingChannel {
        behavior: Behavior,
        pub sent: Mutex<Vec<EmailMessage>>,
    }

    impl RecordingChannel {
        pub fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                sent: Mutex::new(Vec::new()),
            })
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DeliveryChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        fn is_configured(&self) -> bool {
            !matches!(self.behavior, Behavior::Unconfigured)
        }

        async fn send_message(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(message.clone());
            match self.behavior {
                Behavior::Deliver => Ok(()),
                Behavior::Fail => Err(DeliveryError::Transport("connection reset".into())),
                Behavior::Unconfigured => Err(DeliveryError::Unavailable {
                    name: "recording".into(),
                }),
            }
        }

        async fn verify_connection(&self) -> Result<bool, DeliveryError> {
            match self.behavior {
                Behavior::Deliver => Ok(true),
                Behavior::Fail => Err(DeliveryError::Transport("handshake failed".into())),
                Behavior::Unconfigured => Ok(false),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Behavior, RecordingChannel};
    use super::*;

    fn gateway(channel: Arc<RecordingChannel>) -> Gateway {
        Gateway::new(channel, GatewayConfig::default())
    }

    fn lead() -> LeadSubmission {
        LeadSubmission {
            visitor_name: "John Doe".into(),
            visitor_email: "john@example.com".into(),
            visitor_company: Some("Acme Corp".into()),
            project_type: "AI Automation".into(),
            project_description: "We need to automate our sales process".into(),
            budget: None,
            timeline: None,
            conversation_history: vec![ConversationTurn {
                role: Role::User,
                content: "Hi, I'm John from Acme Corp.".into(),
            }],
            language: "en".into(),
        }
    }

    fn contact(message: &str) -> ContactSubmission {
        ContactSubmission {
            name: "Jane Smith".into(),
            email: "jane@company.com".into(),
            company: None,
            phone: Some("+1 555 0100".into()),
            subject: "Test".into(),
            message: message.into(),
        }
    }

    #[tokio::test]
    async fn lead_delivered() {
        let channel = RecordingChannel::new(Behavior::Deliver);
        let result = gateway(channel.clone()).submit_lead(lead()).await.unwrap();
        assert!(result.success);
        assert!(result.message.contains("successfully"));

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "contact@blackpyramid.co");
        assert_eq!(sent[0].reply_to.as_deref(), Some("john@example.com"));
        assert!(sent[0].subject.contains("John Doe"));
    }

    #[tokio::test]
    async fn lead_uses_configured_inbox() {
        let channel = RecordingChannel::new(Behavior::Deliver);
        let gw = Gateway::new(
            channel.clone(),
            GatewayConfig {
                lead_inbox: "sales@example.com".into(),
            },
        );
        gw.submit_lead(lead()).await.unwrap();
        assert_eq!(channel.sent.lock().unwrap()[0].to, "sales@example.com");
    }

    #[tokio::test]
    async fn lead_transport_failure_is_structured() {
        let channel = RecordingChannel::new(Behavior::Fail);
        let result = gateway(channel.clone()).submit_lead(lead()).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.message, LEAD_FAILED);
        assert_eq!(channel.sent_count(), 1);
    }

    #[tokio::test]
    async fn lead_unconfigured_channel_is_structured() {
        let channel = RecordingChannel::new(Behavior::Unconfigured);
        let result = gateway(channel).submit_lead(lead()).await.unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn lead_invalid_never_reaches_channel() {
        let channel = RecordingChannel::new(Behavior::Deliver);
        let gw = gateway(channel.clone());

        let empty_name = LeadSubmission {
            visitor_name: String::new(),
            ..lead()
        };
        assert!(gw.submit_lead(empty_name).await.unwrap_err().has_field("visitorName"));

        let bad_email = LeadSubmission {
            visitor_email: "not-an-email".into(),
            ..lead()
        };
        assert!(gw.submit_lead(bad_email).await.unwrap_err().has_field("visitorEmail"));

        assert_eq!(channel.sent_count(), 0);
    }

    #[tokio::test]
    async fn contact_message_length_gate() {
        let channel = RecordingChannel::new(Behavior::Deliver);
        let gw = gateway(channel.clone());

        assert!(gw.submit_contact_form(contact("Too short")).await.is_err());
        assert_eq!(channel.sent_count(), 0);

        let result = gw.submit_contact_form(contact("Exactly 10")).await.unwrap();
        assert!(result.success);
        assert_eq!(channel.sent_count(), 1);
        assert_eq!(
            channel.sent.lock().unwrap()[0].reply_to.as_deref(),
            Some("jane@company.com")
        );
    }

    #[tokio::test]
    async fn contact_failure_points_to_fallback_inbox() {
        let channel = RecordingChannel::new(Behavior::Fail);
        let result = gateway(channel)
            .submit_contact_form(contact("A long enough message"))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.message.ends_with("contact@blackpyramid.co"));
    }

    #[tokio::test]
    async fn status_reports_each_channel_state() {
        let ready = gateway(RecordingChannel::new(Behavior::Deliver))
            .check_delivery_status()
            .await;
        assert!(ready.configured);
        assert_eq!(ready.message, STATUS_READY);

        let unconfigured = gateway(RecordingChannel::new(Behavior::Unconfigured))
            .check_delivery_status()
            .await;
        assert!(!unconfigured.configured);
        assert_eq!(unconfigured.message, STATUS_UNCONFIGURED);

        // Verification errors are reported, not raised.
        let failing = gateway(RecordingChannel::new(Behavior::Fail))
            .check_delivery_status()
            .await;
        assert!(!failing.configured);
    }
}
