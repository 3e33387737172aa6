//! Server configuration

use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PROXY_URL: &str = "http://localhost:5173/dev/frame";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the frame inspector server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL of the frame proxy (`/action` and `/redirect` live under it)
    pub proxy_url: String,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Unset or unparseable values fall back to defaults
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("FRAMES_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            proxy_url: lookup("FRAMES_PROXY_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.proxy_url),
            request_timeout: lookup("FRAMES_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.request_timeout, Duration::from_secs),
        }
    }
}
