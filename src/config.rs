//! Server configuration parsed from environment variables.

use std::path::PathBuf;

use chat::config::{DEFAULT_CHAT_CONNECT_TIMEOUT_SECS, DEFAULT_CHAT_REQUEST_TIMEOUT_SECS};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory of prebuilt site files served for any unmatched path.
    pub site_dir: Option<PathBuf>,
    /// Completion endpoint that `/api/chat` forwards to.
    pub chat_upstream: Option<String>,
    pub upstream_request_secs: u64,
    pub upstream_connect_secs: u64,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SITE_DIR`: static site root; unset disables static serving
    /// - `CHAT_UPSTREAM_URL`: unset disables the chat proxy
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: default 120
    /// - `CHAT_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let site_dir = non_blank_var("SITE_DIR").map(PathBuf::from);
        let chat_upstream = non_blank_var("CHAT_UPSTREAM_URL");

        Ok(Self {
            port,
            site_dir,
            chat_upstream,
            upstream_request_secs: env_parse("CHAT_REQUEST_TIMEOUT_SECS", DEFAULT_CHAT_REQUEST_TIMEOUT_SECS),
            upstream_connect_secs: env_parse("CHAT_CONNECT_TIMEOUT_SECS", DEFAULT_CHAT_CONNECT_TIMEOUT_SECS),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            site_dir: None,
            chat_upstream: None,
            upstream_request_secs: DEFAULT_CHAT_REQUEST_TIMEOUT_SECS,
            upstream_connect_secs: DEFAULT_CHAT_CONNECT_TIMEOUT_SECS,
        }
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
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
