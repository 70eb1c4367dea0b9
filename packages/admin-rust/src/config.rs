//! Client-side configuration for reaching the roster API.

use std::time::Duration;

/// Production roster API root.
pub const DEFAULT_BASE_URL: &str = "https://comlab-backend.vercel.app/api";

/// Where and how to reach the roster API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root; endpoint paths are appended to it.
    pub base_url: String,
    /// Per-request timeout. `None` leaves the HTTP client's default in place.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines on stderr.
    #[default]
    Pretty,
    /// One JSON object per event on stderr.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://comlab-backend.vercel.app/api");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn log_format_defaults_to_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
