//! Streaming chat session: one conversation with one in-flight request.
//!
//! DESIGN
//! ======
//! `StreamingChatSession` owns the conversation state behind a short-lived
//! mutex and publishes an immutable `SessionSnapshot` on a `watch` channel
//! after every mutation, so a rendering surface can redraw on change.
//!
//! A valid `submit` appends the user message, moves to `Sending`, and spawns
//! one request task. The task reads the body chunk by chunk, feeds it through
//! the `StreamDecoder`, and applies events in arrival order. Every mutation
//! the task makes first checks that its request id is still the active one;
//! `cancel()` clears the active id and fires the cancellation token, so a
//! cancelled task exits at its next read without touching state again.
//!
//! LIFECYCLE
//! =========
//! Dropping the session cancels the in-flight request. Closing the widget
//! panel is a `WidgetState` concern and does not reach the session.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::decode::{LineEvent, StreamDecoder, parse_line};
use crate::transport::{ChatTransport, HttpTransport};
use crate::types::{
    ChatError, ChatRequest, MAX_PROMPT_CHARS, Message, NO_RESPONSE_BODY, Role, SessionStatus, StreamEvent,
    SubmitOutcome, now_ms,
};

const MISSING_ENDPOINT: &str = "Server configuration missing";
const SERVER_ERROR_FALLBACK: &str = "Server error";

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Point-in-time view of a session for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub history: Vec<Message>,
    /// Reply text received so far. Empty unless `status` is `Streaming`.
    pub pending: String,
    pub status: SessionStatus,
    /// Id of the in-flight request, if any.
    pub active_request: Option<Uuid>,
}

// =============================================================================
// STATE
// =============================================================================

/// Exclusive handle on the in-flight request.
struct RequestHandle {
    id: Uuid,
    cancel: CancellationToken,
}

impl RequestHandle {
    fn new() -> Self {
        Self { id: Uuid::new_v4(), cancel: CancellationToken::new() }
    }
}

/// Millisecond message ids with a suffix when two land in the same millisecond.
#[derive(Default)]
struct MessageIds {
    last_ms: i64,
    seq: u32,
}

impl MessageIds {
    fn next(&mut self, now: i64) -> String {
        if now == self.last_ms {
            self.seq += 1;
            format!("{now}-{}", self.seq)
        } else {
            self.last_ms = now;
            self.seq = 0;
            now.to_string()
        }
    }
}

struct SessionState {
    history: Vec<Message>,
    pending: String,
    status: SessionStatus,
    active: Option<RequestHandle>,
    ids: MessageIds,
}

impl SessionState {
    fn new() -> Self {
        Self {
            history: vec![Message::welcome()],
            pending: String::new(),
            status: SessionStatus::Idle,
            active: None,
            ids: MessageIds::default(),
        }
    }

    fn owns(&self, request_id: Uuid) -> bool {
        self.active.as_ref().is_some_and(|a| a.id == request_id)
    }

    fn append(&mut self, role: Role, content: String) {
        let timestamp = now_ms();
        let id = self.ids.next(timestamp);
        self.history.push(Message { id, role, content, timestamp });
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            history: self.history.clone(),
            pending: self.pending.clone(),
            status: self.status.clone(),
            active_request: self.active.as_ref().map(|a| a.id),
        }
    }
}

struct Shared {
    config: ChatConfig,
    transport: Arc<dyn ChatTransport>,
    state: Mutex<SessionState>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState) {
        self.snapshots.send_replace(state.snapshot());
    }

    /// Apply one decoded line. `Break` ends the read loop.
    fn apply_line(&self, request_id: Uuid, line: &str) -> ControlFlow<()> {
        match parse_line(line) {
            LineEvent::Ignored => ControlFlow::Continue(()),
            LineEvent::Malformed(reason) => {
                warn!(%request_id, %reason, "skipping malformed stream event");
                ControlFlow::Continue(())
            }
            LineEvent::Event(StreamEvent::Chunk { content }) => {
                let Some(text) = content.filter(|c| !c.is_empty()) else {
                    return ControlFlow::Continue(());
                };
                let mut state = self.lock();
                if !state.owns(request_id) {
                    return ControlFlow::Break(());
                }
                state.pending.push_str(&text);
                state.status = SessionStatus::Streaming;
                self.publish(&state);
                ControlFlow::Continue(())
            }
            LineEvent::Event(StreamEvent::FullContent { .. }) => {
                debug!(%request_id, "ignoring full_content event");
                ControlFlow::Continue(())
            }
            LineEvent::Event(StreamEvent::Error { message }) => {
                let message = message.filter(|m| !m.is_empty()).unwrap_or_else(|| SERVER_ERROR_FALLBACK.into());
                self.fail(request_id, &ChatError::Server(message));
                ControlFlow::Break(())
            }
        }
    }

    fn fail(&self, request_id: Uuid, err: &ChatError) {
        let mut state = self.lock();
        if !state.owns(request_id) {
            return;
        }
        state.active = None;
        state.pending.clear();
        state.status = SessionStatus::Error(err.user_message());
        self.publish(&state);
        warn!(%request_id, code = err.error_code(), error = %err, "chat request failed");
    }

    fn finalize(&self, request_id: Uuid) {
        let mut state = self.lock();
        if !state.owns(request_id) {
            return;
        }
        let content = std::mem::take(&mut state.pending);
        let chars = content.chars().count();
        state.append(Role::Assistant, content);
        state.active = None;
        state.status = SessionStatus::Idle;
        self.publish(&state);
        info!(%request_id, chars, "chat reply complete");
    }
}

// =============================================================================
// REQUEST TASK
// =============================================================================

async fn run_request(
    shared: Arc<Shared>,
    request_id: Uuid,
    cancel: CancellationToken,
    endpoint: String,
    request: ChatRequest,
) {
    let opened = tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        opened = shared.transport.open(&endpoint, &request) => opened,
    };
    let mut body = match opened {
        Ok(body) => body,
        Err(e) => {
            shared.fail(request_id, &e);
            return;
        }
    };

    let mut decoder = StreamDecoder::new(shared.config.framing);
    let mut received = 0usize;
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            next = body.next() => next,
        };
        match next {
            Some(Ok(bytes)) => {
                received += bytes.len();
                for line in decoder.push(&bytes) {
                    if shared.apply_line(request_id, &line).is_break() {
                        return;
                    }
                }
            }
            Some(Err(e)) => {
                shared.fail(request_id, &e);
                return;
            }
            None => break,
        }
    }

    // A chunked 200 can end without a single byte.
    if received == 0 {
        shared.fail(request_id, &ChatError::Transport(NO_RESPONSE_BODY.into()));
        return;
    }

    for line in decoder.finish() {
        if shared.apply_line(request_id, &line).is_break() {
            return;
        }
    }
    shared.finalize(request_id);
}

// =============================================================================
// SESSION
// =============================================================================

pub struct StreamingChatSession {
    shared: Arc<Shared>,
}

impl StreamingChatSession {
    #[must_use]
    pub fn new(config: ChatConfig, transport: Arc<dyn ChatTransport>) -> Self {
        let state = SessionState::new();
        let (snapshots, _) = watch::channel(state.snapshot());
        Self { shared: Arc::new(Shared { config, transport, state: Mutex::new(state), snapshots }) }
    }

    /// Build a session that talks HTTP using the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_http(config: ChatConfig) -> Result<Self, ChatError> {
        let transport = HttpTransport::new(config.timeouts)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Submit a prompt and start streaming the reply in the background.
    ///
    /// Must be called from within a Tokio runtime. While a request is in
    /// flight this is a no-op returning `SubmitOutcome::Ignored`.
    ///
    /// # Errors
    ///
    /// - `ChatError::Validation` for a blank or over-long prompt; state untouched.
    /// - `ChatError::Configuration` when no endpoint is configured; the
    ///   session moves to `Error` as well.
    pub fn submit(&self, prompt: &str) -> Result<SubmitOutcome, ChatError> {
        let question = validate_prompt(prompt)?;

        let mut state = self.shared.lock();
        if state.status.is_busy() {
            debug!("submit ignored: request already in flight");
            return Ok(SubmitOutcome::Ignored);
        }

        state.append(Role::User, question.clone());
        state.pending.clear();

        let Some(endpoint) = self.shared.config.endpoint.clone() else {
            let err = ChatError::Configuration(MISSING_ENDPOINT.into());
            state.status = SessionStatus::Error(err.user_message());
            self.shared.publish(&state);
            warn!(code = err.error_code(), "chat endpoint not configured");
            return Err(err);
        };

        let handle = RequestHandle::new();
        let request_id = handle.id;
        let cancel = handle.cancel.clone();
        state.active = Some(handle);
        state.status = SessionStatus::Sending;
        self.shared.publish(&state);
        drop(state);

        info!(%request_id, chars = question.chars().count(), "chat request started");
        tokio::spawn(run_request(Arc::clone(&self.shared), request_id, cancel, endpoint, ChatRequest { question }));
        Ok(SubmitOutcome::Started(request_id))
    }

    /// Cancel the in-flight request, if any. Silent and idempotent.
    pub fn cancel(&self) {
        let mut state = self.shared.lock();
        let Some(active) = state.active.take() else {
            return;
        };
        active.cancel.cancel();
        state.pending.clear();
        state.status = SessionStatus::Idle;
        self.shared.publish(&state);
        info!(request_id = %active.id, "chat request cancelled");
    }

    /// Dismiss a visible error. No-op in any other state.
    pub fn clear_error(&self) {
        let mut state = self.shared.lock();
        if matches!(state.status, SessionStatus::Error(_)) {
            state.status = SessionStatus::Idle;
            self.shared.publish(&state);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().snapshot()
    }

    /// Receiver that sees a new snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshots.subscribe()
    }
}

impl Drop for StreamingChatSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Trim and bound-check a prompt.
///
/// # Errors
///
/// Returns `ChatError::Validation` if the trimmed prompt is empty or longer
/// than `MAX_PROMPT_CHARS` characters.
pub fn validate_prompt(prompt: &str) -> Result<String, ChatError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Validation("Message cannot be empty".into()));
    }
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(ChatError::Validation(format!("Message too long (max {MAX_PROMPT_CHARS} chars)")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
