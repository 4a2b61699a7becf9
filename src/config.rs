//! Configuration types.
//!
//! Everything is read from environment variables; nothing here fails on a
//! missing value. SMTP settings live next to the transport in
//! [`crate::delivery::smtp::SmtpConfig`].

use std::time::Duration;

use crate::error::ConfigError;

/// Brand used in the sender display name and email templates.
pub const BRAND_NAME: &str = "BlackPyramid";

/// Inbox that receives leads and contact-form messages when `LEAD_EMAIL` is unset.
pub const DEFAULT_LEAD_INBOX: &str = "contact@blackpyramid.co";

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind: String,
    /// Listen port.
    pub port: u16,
    /// Allowed browser origin for the marketing site. `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("LEAD_CAPTURE_PORT") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "LEAD_CAPTURE_PORT".into(),
                message: format!("{raw:?} is not a port number: {e}"),
            })?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            bind: std::env::var("LEAD_CAPTURE_BIND").unwrap_or(defaults.bind),
            port,
            cors_origin: std::env::var("LEAD_CAPTURE_CORS_ORIGIN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        })
    }

    /// `bind:port` socket address string.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Destination for lead and contact-form emails.
    pub lead_inbox: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            lead_inbox: DEFAULT_LEAD_INBOX.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            lead_inbox: std::env::var("LEAD_EMAIL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LEAD_INBOX.to_string()),
        }
    }
}

/// Chat session configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Pause before each scripted reply is shown.
    pub typing_delay: Duration,
    /// Visitor language tag forwarded with the lead.
    pub language: String,
    /// Base URL of the lead-capture server (used by the terminal front end).
    pub server_url: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(1500),
            language: "en".to_string(),
            server_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let typing_delay = std::env::var("LEAD_CHAT_TYPING_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.typing_delay);

        Self {
            typing_delay,
            language: std::env::var("LEAD_CHAT_LANGUAGE").unwrap_or(defaults.language),
            server_url: std::env::var("LEAD_CAPTURE_URL").unwrap_or(defaults.server_url),
        }
    }

    /// Config with no typing pause, for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            typing_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
