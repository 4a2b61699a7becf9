//! SMTP delivery via lettre.
//!
//! The channel is built once from environment variables. Missing settings
//! leave it unconfigured: sends report `DeliveryError::Unavailable` and
//! verification reports `false`, nothing panics or fails construction.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};

use super::{DeliveryChannel, EmailMessage};
use crate::config::BRAND_NAME;
use crate::error::DeliveryError;

// ── Configuration ───────────────────────────────────────────────────

/// SMTP settings, built from environment variables.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Envelope sender; falls back to `username`.
    pub from_address: String,
    /// Display name on the sender mailbox.
    pub from_name: String,
}

impl SmtpConfig {
    /// Build config from `SMTP_*` environment variables.
    /// Returns `None` unless host, user and password are all set (channel disabled).
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let (Some(host), Some(username), Some(password)) = (
            non_empty("SMTP_HOST"),
            non_empty("SMTP_USER"),
            non_empty("SMTP_PASS"),
        ) else {
            tracing::warn!("SMTP configuration incomplete. Email sending disabled.");
            return None;
        };

        let port: u16 = var("SMTP_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(587);

        let from_address = non_empty("SMTP_FROM").unwrap_or_else(|| username.clone());

        Some(Self {
            host,
            port,
            username,
            password: SecretString::from(password),
            from_address,
            from_name: BRAND_NAME.to_string(),
        })
    }

    /// Implicit TLS on 465, STARTTLS everywhere else.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

// ── Channel ─────────────────────────────────────────────────────────

/// SMTP delivery channel.
pub struct SmtpChannel {
    inner: Option<ConfiguredSmtp>,
}

struct ConfiguredSmtp {
    transport: SmtpTransport,
    sender: Mailbox,
    host: String,
}

impl SmtpChannel {
    /// Build the channel. A `None` config, or one lettre cannot turn into a
    /// transport, yields an unconfigured channel.
    pub fn new(config: Option<SmtpConfig>) -> Self {
        let Some(config) = config else {
            return Self::unconfigured();
        };

        match build_transport(&config) {
            Ok(inner) => {
                tracing::info!(
                    host = %config.host,
                    port = config.port,
                    implicit_tls = config.implicit_tls(),
                    "SMTP delivery configured"
                );
                Self { inner: Some(inner) }
            }
            Err(e) => {
                tracing::warn!("SMTP transport could not be built, email sending disabled: {e}");
                Self::unconfigured()
            }
        }
    }

    pub fn from_env() -> Self {
        Self::new(SmtpConfig::from_env())
    }

    pub fn unconfigured() -> Self {
        Self { inner: None }
    }

    fn configured(&self) -> Result<&ConfiguredSmtp, DeliveryError> {
        self.inner.as_ref().ok_or_else(|| DeliveryError::Unavailable {
            name: "smtp".into(),
        })
    }
}

/// Install the ring crypto provider for rustls. Safe to call repeatedly.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

fn build_transport(config: &SmtpConfig) -> Result<ConfiguredSmtp, DeliveryError> {
    install_crypto_provider();

    let address: Address = config
        .from_address
        .parse()
        .map_err(|e| DeliveryError::InvalidAddress {
            address: config.from_address.clone(),
            reason: format!("{e}"),
        })?;
    let sender = Mailbox::new(Some(config.from_name.clone()), address);

    let builder = if config.implicit_tls() {
        SmtpTransport::relay(&config.host)
    } else {
        SmtpTransport::starttls_relay(&config.host)
    }
    .map_err(|e| DeliveryError::Transport(format!("SMTP relay error: {e}")))?;

    let creds = Credentials::new(
        config.username.clone(),
        config.password.expose_secret().to_string(),
    );

    Ok(ConfiguredSmtp {
        transport: builder.port(config.port).credentials(creds).build(),
        sender,
        host: config.host.clone(),
    })
}

/// Build a multipart/alternative lettre message from a rendered email.
pub fn build_message(sender: &Mailbox, message: &EmailMessage) -> Result<Message, DeliveryError> {
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| DeliveryError::InvalidAddress {
            address: message.to.clone(),
            reason: format!("{e}"),
        })?;

    let mut builder = Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(message.subject.clone());

    if let Some(reply_to) = &message.reply_to {
        let reply_to: Mailbox = reply_to.parse().map_err(|e| DeliveryError::InvalidAddress {
            address: reply_to.clone(),
            reason: format!("{e}"),
        })?;
        builder = builder.reply_to(reply_to);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            message.text.clone(),
            message.html.clone(),
        ))
        .map_err(|e| DeliveryError::Build(e.to_string()))
}

// ── DeliveryChannel trait ───────────────────────────────────────────

#[async_trait]
impl DeliveryChannel for SmtpChannel {
    fn name(&self) -> &str {
        "smtp"
    }

    fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    async fn send_message(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        let smtp = self.configured()?;
        let email = build_message(&smtp.sender, message)?;
        let transport = smtp.transport.clone();

        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| DeliveryError::Transport(format!("SMTP send task panicked: {e}")))?
            .map_err(|e| DeliveryError::Transport(format!("SMTP send failed: {e}")))?;

        tracing::info!("Email sent to {}", message.to);
        Ok(())
    }

    async fn verify_connection(&self) -> Result<bool, DeliveryError> {
        let Some(smtp) = self.inner.as_ref() else {
            return Ok(false);
        };
        let transport = smtp.transport.clone();

        let ok = tokio::task::spawn_blocking(move || transport.test_connection())
            .await
            .map_err(|e| DeliveryError::Transport(format!("SMTP verify task panicked: {e}")))?
            .map_err(|e| DeliveryError::Transport(format!("SMTP verify failed: {e}")))?;

        if ok {
            tracing::info!(host = %smtp.host, "SMTP connection verified successfully");
        }
        Ok(ok)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
