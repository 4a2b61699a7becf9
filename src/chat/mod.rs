//! Scripted lead-capture conversation.
//!
//! A [`ChatSession`] walks the visitor through a fixed six-question script,
//! pulls lead fields out of each answer and hands the finished lead to a
//! [`LeadSubmitter`] once an email address has been collected.

pub mod extract;
pub mod script;
pub mod session;
pub mod submitter;

pub use script::{FALLBACK_REPLY, LeadField, SCRIPT, ScriptStep, WELCOME};
pub use session::{
    ChatSession, LeadRecord, PendingSubmission, SubmissionNotice, TranscriptEntry, TurnOutcome,
};
pub use submitter::{HttpLeadSubmitter, LeadSubmitter};
