use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use lead_capture::config::{GatewayConfig, ServerConfig};
use lead_capture::delivery::{DeliveryChannel, SmtpChannel, smtp};
use lead_capture::gateway::{Gateway, email_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    smtp::install_crypto_provider();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env()?;
    let gateway_config = GatewayConfig::from_env();
    let channel = Arc::new(SmtpChannel::from_env());

    eprintln!("📮 Lead Capture v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Listening: http://{}", server_config.listen_addr());
    eprintln!("   Lead API: POST /api/email/lead");
    eprintln!("   Contact API: POST /api/email/contact");
    eprintln!("   Status: GET /api/email/status");
    eprintln!("   Lead inbox: {}", gateway_config.lead_inbox);
    eprintln!(
        "   SMTP: {}",
        if channel.is_configured() {
            "configured"
        } else {
            "disabled (set SMTP_HOST, SMTP_USER, SMTP_PASS)"
        }
    );

    let cors = match &server_config.cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid LEAD_CAPTURE_CORS_ORIGIN {origin:?}"))?,
        ),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    let gateway = Arc::new(Gateway::new(channel, gateway_config));
    let app = email_routes(gateway).layer(cors);

    let listener = tokio::net::TcpListener::bind(server_config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", server_config.listen_addr()))?;
    tracing::info!(addr = %server_config.listen_addr(), "Lead capture server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
