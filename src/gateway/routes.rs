//! REST endpoints for lead and contact-form submission.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::Gateway;
use super::types::{ContactSubmission, DeliveryStatus, LeadSubmission, SubmitResponse};
use crate::error::{FieldIssue, ValidationError};

/// Shared state for the email routes.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// Body of a 400 response for a submission that failed validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationBody {
    pub error: String,
    pub issues: Vec<FieldIssue>,
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = ValidationBody {
            error: "validation_failed".to_string(),
            issues: self.issues,
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Build the submission routes.
pub fn email_routes(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/email/lead", post(submit_lead))
        .route("/api/email/contact", post(submit_contact_form))
        .route("/api/email/status", get(delivery_status))
        .with_state(AppState { gateway })
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "lead-capture"
    }))
}

/// POST /api/email/lead
async fn submit_lead(
    State(state): State<AppState>,
    Json(submission): Json<LeadSubmission>,
) -> Result<Json<SubmitResponse>, ValidationError> {
    let result = state.gateway.submit_lead(submission).await;
    if let Err(e) = &result {
        tracing::debug!("Lead rejected: {e}");
    }
    result.map(Json)
}

/// POST /api/email/contact
async fn submit_contact_form(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<SubmitResponse>, ValidationError> {
    state.gateway.submit_contact_form(submission).await.map(Json)
}

/// GET /api/email/status
async fn delivery_status(State(state): State<AppState>) -> Json<DeliveryStatus> {
    Json(state.gateway.check_delivery_status().await)
}
