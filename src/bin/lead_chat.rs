//! Terminal front end for the scripted lead-capture chat.
//!
//! Reads visitor messages from stdin, prints the scripted replies and
//! submits the finished lead to a running lead-capture server.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use lead_capture::chat::{ChatSession, HttpLeadSubmitter, PendingSubmission, WELCOME};
use lead_capture::config::ChatConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ChatConfig::from_env();
    let submitter = Arc::new(HttpLeadSubmitter::new(&config.server_url));

    eprintln!("💬 Lead Chat v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Server: {}", submitter.endpoint());
    eprintln!("   Ctrl-D to exit.\n");

    let mut session = ChatSession::new(config, submitter);
    println!("\n{WELCOME}\n");
    eprint!("> ");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<PendingSubmission> = Vec::new();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(outcome) = session.submit_visitor_message(&line).await {
                    println!("\n{}\n", outcome.reply);
                    pending.extend(outcome.submission);
                }
                for submission in drain_finished(&mut pending) {
                    println!("[{}]\n", submission.notice().await.message());
                }
                eprint!("> ");
            }
            Ok(None) => break, // EOF
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                break;
            }
        }
    }

    for submission in pending {
        println!("[{}]", submission.notice().await.message());
    }

    Ok(())
}

/// Split off submissions that have already settled.
fn drain_finished(pending: &mut Vec<PendingSubmission>) -> Vec<PendingSubmission> {
    let (done, waiting): (Vec<_>, Vec<_>) = std::mem::take(pending)
        .into_iter()
        .partition(PendingSubmission::is_finished);
    *pending = waiting;
    done
}
