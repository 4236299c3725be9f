//! Chat pass-through proxy.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lets the widget reach the completion endpoint through this origin. The
//! prompt is validated with the same rules the client applies, then the
//! upstream body is streamed back byte for byte; framing and event parsing
//! stay on the client.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use chat::session::validate_prompt;
use chat::types::ChatRequest;

use crate::state::AppState;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Chat upstream not configured")]
    NotConfigured,
    #[error("Missing question")]
    MissingQuestion,
    #[error("{0}")]
    InvalidQuestion(String),
    #[error("Upstream error")]
    Upstream,
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::MissingQuestion | Self::InvalidQuestion(_) => StatusCode::BAD_REQUEST,
            Self::Upstream => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ProxyBody {
    question: Option<String>,
}

/// Pull a valid question out of a raw request body.
///
/// # Errors
///
/// `MissingQuestion` for an unparseable body or absent field;
/// `InvalidQuestion` when the text fails prompt validation.
pub fn parse_question(body: &[u8]) -> Result<String, ProxyError> {
    let question = serde_json::from_slice::<ProxyBody>(body)
        .ok()
        .and_then(|b| b.question)
        .ok_or(ProxyError::MissingQuestion)?;
    validate_prompt(&question).map_err(|e| ProxyError::InvalidQuestion(e.to_string()))
}

/// `POST /api/chat`: forward a prompt and stream the reply back.
pub async fn proxy_chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ProxyError> {
    let Some(upstream) = state.chat_upstream.as_deref() else {
        return Err(ProxyError::NotConfigured);
    };
    let question = parse_question(&body)?;
    let chars = question.chars().count();

    let response = state
        .http
        .post(upstream)
        .json(&ChatRequest { question })
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "chat upstream unreachable");
            ProxyError::Upstream
        })?;
    if !response.status().is_success() {
        warn!(status = response.status().as_u16(), "chat upstream returned non-success status");
        return Err(ProxyError::Upstream);
    }

    info!(chars, "proxying chat stream");
    let headers = [(CONTENT_TYPE, "text/event-stream"), (CACHE_CONTROL, "no-cache")];
    Ok((headers, Body::from_stream(response.bytes_stream())).into_response())
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
