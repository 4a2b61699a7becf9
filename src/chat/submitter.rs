//! How a chat session hands its lead to the gateway.

use async_trait::async_trait;

use crate::error::SubmissionError;
use crate::gateway::routes::ValidationBody;
use crate::gateway::{Gateway, LeadSubmission, SubmitResponse};

/// Destination for completed leads.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    /// Submit one lead. Validation rejections come back as
    /// `SubmissionError::Rejected`; delivery failures as `success: false`.
    async fn submit_lead(&self, lead: LeadSubmission) -> Result<SubmitResponse, SubmissionError>;
}

/// In-process submission straight into a gateway.
#[async_trait]
impl LeadSubmitter for Gateway {
    async fn submit_lead(&self, lead: LeadSubmission) -> Result<SubmitResponse, SubmissionError> {
        Ok(Gateway::submit_lead(self, lead).await?)
    }
}

/// Submission over HTTP to a running lead-capture server.
pub struct HttpLeadSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLeadSubmitter {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/email/lead", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadSubmitter for HttpLeadSubmitter {
    async fn submit_lead(&self, lead: LeadSubmission) -> Result<SubmitResponse, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&lead)
            .send()
            .await
            .map_err(|e| SubmissionError::Http(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            let body: ValidationBody = response
                .json()
                .await
                .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;
            return Err(SubmissionError::Rejected(body.issues));
        }
        if !status.is_success() {
            return Err(SubmissionError::Http(format!("gateway returned {status}")));
        }

        response
            .json::<SubmitResponse>()
            .await
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            HttpLeadSubmitter::new("http://localhost:3000/").endpoint(),
            "http://localhost:3000/api/email/lead"
        );
        assert_eq!(
            HttpLeadSubmitter::new("https://example.com").endpoint(),
            "https://example.com/api/email/lead"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        // Port 9 (discard) is not expected to run an HTTP server.
        let submitter = HttpLeadSubmitter::new("http://127.0.0.1:9");
        let lead: LeadSubmission = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            submitter.submit_lead(lead).await,
            Err(SubmissionError::Http(_))
        ));
    }
}
