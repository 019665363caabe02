use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::email::{ColdEmailRequest, ColdEmailResponse};
use crate::completion::CompletionError;
use crate::conversation::Message;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub business_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Reserved for retrieval-backed replies; always `null` for now.
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// An error answered as `{"detail": ...}` with a status code.
#[derive(Debug)]
pub(super) struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub(super) async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    if request.messages.is_empty() {
        tracing::warn!("Received /chat request with an empty message list");
        return Err(ApiError::bad_request("The 'messages' list cannot be empty."));
    }

    tracing::info!(
        messages = request.messages.len(),
        business_id = request.business_id.as_deref().unwrap_or("-"),
        "Received /chat request"
    );

    let reply = state
        .service
        .complete(&request.messages, request.business_id.as_deref())
        .await
        .inspect_err(|e| tracing::error!(kind = e.kind(), "Chat completion failed: {e}"))?;

    tracing::info!(chars = reply.chars().count(), "Chat reply generated");

    Ok(Json(ChatResponse {
        reply,
        sources: None,
    }))
}

pub(super) async fn cold_email(
    State(state): State<AppState>,
    payload: Result<Json<ColdEmailRequest>, JsonRejection>,
) -> Result<Json<ColdEmailResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        tone = request.tone.as_str(),
        language = request.language.as_str(),
        "Received /cold-email request"
    );

    let email = state
        .service
        .complete(&request.to_messages(), None)
        .await
        .inspect_err(|e| tracing::error!(kind = e.kind(), "Cold email generation failed: {e}"))?;

    tracing::info!(chars = email.chars().count(), "Cold email generated");

    Ok(Json(ColdEmailResponse { email }))
}
