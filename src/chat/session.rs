//! One visitor's scripted chat: transcript, step counter, and lead record.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::extract::{extract_email, extract_name_and_company, extract_verbatim};
use super::script::{self, LeadField, WELCOME};
use super::submitter::LeadSubmitter;
use crate::config::{ChatConfig, DEFAULT_LEAD_INBOX};
use crate::error::{FieldIssue, SubmissionError};
use crate::gateway::{ConversationTurn, LeadSubmission, Role};

const SENT_NOTICE: &str = "Your information has been sent to our team!";
const GENERIC_FAILURE: &str = "Failed to submit. Please try again or email us directly.";

// ── Transcript ──────────────────────────────────────────────────────

/// One message in the chat transcript.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(role: Role, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn user(content: &str) -> Self {
        Self::new(Role::User, content)
    }

    fn as_turn(&self) -> ConversationTurn {
        ConversationTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

// ── Lead record ─────────────────────────────────────────────────────

/// Lead fields collected so far. Each is `None` until its step runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub project_type: Option<String>,
    pub project_description: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    /// Set before the lead is handed to the gateway; never cleared.
    pub submitted: bool,
}

impl LeadRecord {
    /// Run the extraction rule for `field` on `text` and store the result.
    pub fn apply(&mut self, field: LeadField, text: &str) {
        match field {
            LeadField::Name => {
                let found = extract_name_and_company(text);
                self.name = Some(found.name);
                self.company = Some(found.company);
            }
            LeadField::Email => self.email = Some(extract_email(text)),
            LeadField::ProjectType => self.project_type = Some(extract_verbatim(text)),
            LeadField::ProjectDescription => {
                self.project_description = Some(extract_verbatim(text))
            }
            LeadField::Budget => self.budget = Some(extract_verbatim(text)),
            LeadField::Timeline => self.timeline = Some(extract_verbatim(text)),
        }
    }

    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// An email is present and the lead has not been handed off yet.
    pub fn ready_for_submission(&self) -> bool {
        self.has_email() && !self.submitted
    }

    /// Gateway payload, with placeholders for required fields never filled.
    pub fn to_submission(
        &self,
        conversation_history: Vec<ConversationTurn>,
        language: &str,
    ) -> LeadSubmission {
        LeadSubmission {
            visitor_name: filled(&self.name).unwrap_or_else(|| "Unknown".to_string()),
            visitor_email: self.email.clone().unwrap_or_default(),
            visitor_company: filled(&self.company),
            project_type: filled(&self.project_type)
                .unwrap_or_else(|| "General Inquiry".to_string()),
            project_description: filled(&self.project_description)
                .unwrap_or_else(|| "Not specified".to_string()),
            budget: filled(&self.budget),
            timeline: filled(&self.timeline),
            conversation_history,
            language: language.to_string(),
        }
    }
}

fn filled(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

// ── Submission outcome ──────────────────────────────────────────────

/// What the visitor is told once a lead submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionNotice {
    Sent,
    /// Delivery failed; carries the gateway's message.
    Failed(String),
    /// The gateway refused the payload.
    Rejected(Vec<FieldIssue>),
}

impl SubmissionNotice {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }

    /// Visitor-facing text.
    pub fn message(&self) -> String {
        match self {
            Self::Sent => SENT_NOTICE.to_string(),
            Self::Failed(message) => message.clone(),
            Self::Rejected(issues) if issues.iter().any(|i| i.field == "visitorEmail") => format!(
                "That email address doesn't look right, so we couldn't send your summary. \
                 Please check it, or email us directly at {DEFAULT_LEAD_INBOX}."
            ),
            Self::Rejected(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

/// A lead submission running in the background.
pub struct PendingSubmission {
    handle: JoinHandle<SubmissionNotice>,
}

impl PendingSubmission {
    /// Whether the submission has settled, without waiting.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the submission to settle.
    pub async fn notice(self) -> SubmissionNotice {
        match self.handle.await {
            Ok(notice) => notice,
            Err(e) => {
                error!("Lead submission task failed: {e}");
                SubmissionNotice::Failed(GENERIC_FAILURE.to_string())
            }
        }
    }
}

/// Result of one visitor message.
pub struct TurnOutcome {
    /// Step counter after this message.
    pub step: u32,
    /// Assistant reply appended to the transcript.
    pub reply: String,
    /// Present when this message triggered the lead submission.
    pub submission: Option<PendingSubmission>,
}

// ── Session ─────────────────────────────────────────────────────────

/// Scripted lead-capture conversation for a single visitor.
///
/// State lives for the session's lifetime and is never reset.
pub struct ChatSession {
    config: ChatConfig,
    submitter: Arc<dyn LeadSubmitter>,
    transcript: Vec<TranscriptEntry>,
    step: u32,
    lead: LeadRecord,
    lead_submitted: Arc<AtomicBool>,
}

impl ChatSession {
    /// Start a session, seeded with the welcome message.
    pub fn new(config: ChatConfig, submitter: Arc<dyn LeadSubmitter>) -> Self {
        Self {
            config,
            submitter,
            transcript: vec![TranscriptEntry::assistant(WELCOME)],
            step: 0,
            lead: LeadRecord::default(),
            lead_submitted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn lead(&self) -> &LeadRecord {
        &self.lead
    }

    /// Whether the gateway confirmed delivery of this session's lead.
    pub fn lead_submitted(&self) -> bool {
        self.lead_submitted.load(Ordering::SeqCst)
    }

    /// Handle one visitor message.
    ///
    /// Returns `None` (and changes nothing) for blank input. Otherwise appends
    /// the message, advances the step, extracts the step's field, starts the
    /// lead submission on the submitting step, waits the typing delay and
    /// appends the scripted reply. The submission runs in the background and
    /// never delays the reply.
    pub async fn submit_visitor_message(&mut self, text: &str) -> Option<TurnOutcome> {
        if text.trim().is_empty() {
            return None;
        }

        self.transcript.push(TranscriptEntry::user(text));
        self.step += 1;

        let mut submission = None;
        if let Some(step) = script::step_for(self.step) {
            self.lead.apply(step.field, text);
            debug!(step = self.step, field = ?step.field, "Captured lead field");

            if step.submits_lead && self.lead.ready_for_submission() {
                self.lead.submitted = true;
                submission = Some(self.spawn_submission());
            }
        }

        if !self.config.typing_delay.is_zero() {
            tokio::time::sleep(self.config.typing_delay).await;
        }

        let reply = script::reply_for(self.step);
        self.transcript.push(TranscriptEntry::assistant(reply));

        Some(TurnOutcome {
            step: self.step,
            reply: reply.to_string(),
            submission,
        })
    }

    fn spawn_submission(&self) -> PendingSubmission {
        let history = self.transcript.iter().map(TranscriptEntry::as_turn).collect();
        let lead = self.lead.to_submission(history, &self.config.language);
        let submitter = Arc::clone(&self.submitter);
        let submitted = Arc::clone(&self.lead_submitted);

        info!(turns = lead.conversation_history.len(), "Submitting lead");

        let handle = tokio::spawn(async move {
            match submitter.submit_lead(lead).await {
                Ok(response) if response.success => {
                    submitted.store(true, Ordering::SeqCst);
                    SubmissionNotice::Sent
                }
                Ok(response) => {
                    warn!("Lead delivery failed: {}", response.message);
                    SubmissionNotice::Failed(response.message)
                }
                Err(SubmissionError::Rejected(issues)) => {
                    warn!(issues = issues.len(), "Lead rejected by gateway");
                    SubmissionNotice::Rejected(issues)
                }
                Err(e) => {
                    error!("Failed to send lead: {e}");
                    SubmissionNotice::Failed(GENERIC_FAILURE.to_string())
                }
            }
        });

        PendingSubmission { handle }
    }
}
