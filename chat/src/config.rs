//! Chat configuration parsed from environment variables.
//!
//! The endpoint address is optional at load time: a session built without
//! one reports a configuration error on submit rather than at startup.

use std::time::Duration;

use crate::decode::LineFraming;

pub const DEFAULT_CHAT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CHAT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported CHAT_LINE_FRAMING '{0}' (expected 'per_chunk' or 'buffered')")]
    UnknownFraming(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl ChatTimeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for ChatTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_CHAT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CHAT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatConfig {
    /// Full URL of the completion endpoint.
    pub endpoint: Option<String>,
    pub timeouts: ChatTimeouts,
    pub framing: LineFraming,
}

impl ChatConfig {
    /// Build typed chat config from environment variables.
    ///
    /// Optional:
    /// - `CHAT_SERVER_ADDRESS`: completion endpoint URL; blank counts as unset
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: default 120
    /// - `CHAT_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CHAT_LINE_FRAMING`: `per_chunk` (default) or `buffered`
    ///
    /// # Errors
    ///
    /// Returns an error if `CHAT_LINE_FRAMING` names an unknown mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var("CHAT_SERVER_ADDRESS")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let timeouts = ChatTimeouts {
            request_secs: env_parse("CHAT_REQUEST_TIMEOUT_SECS", DEFAULT_CHAT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("CHAT_CONNECT_TIMEOUT_SECS", DEFAULT_CHAT_CONNECT_TIMEOUT_SECS),
        };
        let framing = match std::env::var("CHAT_LINE_FRAMING") {
            Ok(raw) => LineFraming::parse(&raw).ok_or(ConfigError::UnknownFraming(raw))?,
            Err(_) => LineFraming::default(),
        };

        Ok(Self { endpoint, timeouts, framing })
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn with_framing(mut self, framing: LineFraming) -> Self {
        self.framing = framing;
        self
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
