//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Nothing here is mutable: the server keeps no per-visitor state. It holds
//! the outbound HTTP client for the chat proxy and the static site root.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub chat_upstream: Option<Arc<str>>,
    pub site_dir: Option<PathBuf>,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be built.
    pub fn new(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_request_secs))
            .connect_timeout(Duration::from_secs(config.upstream_connect_secs))
            .build()?;
        Ok(Self { http, chat_upstream: config.chat_upstream.as_deref().map(Arc::from), site_dir: config.site_dir.clone() })
    }
}
