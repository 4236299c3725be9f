//! Chat transport: opens the response byte stream for one prompt.
//!
//! DESIGN
//! ======
//! `ChatTransport` is the seam between the session state machine and the
//! network. The session never sees HTTP; it receives a stream of byte chunks
//! or a `ChatError`. Tests substitute scripted transports.

use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::header::CONTENT_TYPE;

use crate::config::ChatTimeouts;
use crate::types::{ChatError, ChatRequest, NO_RESPONSE_BODY};

/// Response body as a stream of raw chunks, in arrival order.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, ChatError>>;

/// Provider-neutral async trait for opening a chat stream. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync + 'static {
    /// Send `request` to `endpoint` and return the response body stream.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Transport` if the request cannot be sent, the
    /// status is not 2xx, or the response has no body.
    async fn open(&self, endpoint: &str, request: &ChatRequest) -> Result<ByteStream, ChatError>;
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// The request timeout caps the whole exchange, body included.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Configuration` if the HTTP client cannot be built.
    pub fn new(timeouts: ChatTimeouts) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ChatError::Configuration(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn open(&self, endpoint: &str, request: &ChatRequest) -> Result<ByteStream, ChatError> {
        let response = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "chat endpoint returned non-success status");
            return Err(ChatError::Transport("Server error occurred".into()));
        }
        if response.content_length() == Some(0) {
            return Err(ChatError::Transport(NO_RESPONSE_BODY.into()));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(|e| ChatError::Transport(e.to_string())));
        Ok(body.boxed())
    }
}
