//! Client configuration.
//!
//! The only required setting is the backend origin. It is read from the
//! environment at startup, falling back to a local development server.

use std::time::Duration;

/// Settings shared by every request a client sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, without trailing slash (e.g. `https://api.example.com`).
    pub base_url: String,
    /// Per-request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Origin used when nothing is configured.
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000";

    /// Configuration for the given origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration from environment variables.
    ///
    /// | Variable                    | Default                 | Description                  |
    /// |-----------------------------|-------------------------|------------------------------|
    /// | `KITCHEN_API_URL`           | `http://127.0.0.1:8000` | Backend origin               |
    /// | `KITCHEN_API_BASE_URL`      |                         | Legacy name for the origin   |
    /// | `KITCHEN_HTTP_TIMEOUT_SECS` | unset                   | Per-request timeout, seconds |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("KITCHEN_API_URL")
            .or_else(|| lookup("KITCHEN_API_BASE_URL"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        let timeout = lookup("KITCHEN_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            timeout,
            ..Self::new(base_url.trim())
        }
    }

    /// Absolute URL for a path relative to the backend origin.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}
