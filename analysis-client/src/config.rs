//! Configuration for the analysis API client.
//!
//! Centralises the runtime tunables: backend base URL, request timeout, and
//! the session file location. Every value has a compile-time default and can
//! be overridden at runtime via a dedicated environment variable.

use std::path::PathBuf;

/// Default backend base URL when none is configured.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8002/api";

/// Default per-request timeout (in milliseconds).
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client configuration. Build one with [`ClientConfig::from_env`] or fill
/// the fields directly in tests.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:8002/api`.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Session file location. `None` uses the default under the home
    /// directory, see [`crate::SessionStore::open_default`].
    pub session_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// Priority per value:
    /// 1. `CHESSEVO_API_URL` / `CHESSEVO_TIMEOUT_MS` / `CHESSEVO_SESSION_PATH`
    ///    env variable if set (an unparseable timeout falls back to the default)
    /// 2. Compile-time default
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CHESSEVO_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout_ms: std::env::var("CHESSEVO_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            session_path: std::env::var("CHESSEVO_SESSION_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            session_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.session_path, None);
    }

    #[test]
    fn test_from_env_respects_overrides() {
        let config = ClientConfig::from_env();
        match std::env::var("CHESSEVO_API_URL") {
            Ok(val) if !val.is_empty() => assert_eq!(config.base_url, val),
            _ => assert_eq!(config.base_url, DEFAULT_BASE_URL),
        }
    }
}
