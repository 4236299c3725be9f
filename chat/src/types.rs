//! Chat types: messages, session status, stream events, and errors.
//!
//! DESIGN
//! ======
//! These are the values shared between the session, the stream decoder, and
//! the rendering surface. Messages are immutable once created; the session
//! only ever appends them.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest prompt accepted by `submit`, counted in characters after trimming.
pub const MAX_PROMPT_CHARS: usize = 500;

/// Shown when a transport failure carries no usable text.
pub const CONNECTION_FALLBACK: &str = "Connection interrupted. Please retry.";

/// Transport failure text for a successful status with nothing in the body.
pub const NO_RESPONSE_BODY: &str = "No response body";

// =============================================================================
// ERROR
// =============================================================================

/// Errors surfaced by a chat session. `Display` is the short user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The prompt was empty or too long. Never touches session status.
    #[error("{0}")]
    Validation(String),

    /// The endpoint address is missing from the environment.
    #[error("{0}")]
    Configuration(String),

    /// Network failure, non-2xx response, or missing response body.
    #[error("{0}")]
    Transport(String),

    /// The endpoint reported an application-level failure in the stream.
    #[error("{0}")]
    Server(String),
}

impl ChatError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Configuration(_) => "E_CONFIGURATION",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Server(_) => "E_SERVER",
        }
    }

    /// Whether resubmitting the same prompt can reasonably succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server(_))
    }

    /// Text shown in the error banner; blank reasons fall back to a generic line.
    #[must_use]
    pub fn user_message(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() { CONNECTION_FALLBACK.to_string() } else { text }
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Message {
    /// Greeting every session starts with.
    #[must_use]
    pub fn welcome() -> Self {
        Self {
            id: "welcome".into(),
            role: Role::Assistant,
            content: "System initialized.\nAccessing portfolio data...\nReady for queries. >_".into(),
            timestamp: now_ms(),
        }
    }
}

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// SESSION STATUS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Sending,
    Streaming,
    Error(String),
}

impl SessionStatus {
    /// `true` while a request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Sending | Self::Streaming)
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Result of a `submit` call that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new request cycle was started with this id.
    Started(Uuid),
    /// A request was already in flight; nothing happened.
    Ignored,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Outbound request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

/// One `data:` event from the response stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental reply text.
    Chunk { content: Option<String> },
    /// Whole reply in one event. Sent by some endpoints; not acted upon.
    FullContent { content: Option<String>, full_content: Option<String> },
    /// Application-level failure; ends the stream.
    Error { message: Option<String> },
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
