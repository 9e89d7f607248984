//! Client configuration

use crate::error::{ApiError, Result};
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL all endpoint paths are resolved against
    pub base_url: String,

    /// Request-level timeout; requests exceeding it fail with
    /// [`ApiError::Timeout`](crate::error::ApiError::Timeout)
    pub timeout: Duration,

    /// Headers applied to every request unless overridden per call
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build a configuration from the environment.
    ///
    /// `TALENTGRID_API_URL` is required; `TALENTGRID_TIMEOUT_SECS` overrides
    /// the default request timeout.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("TALENTGRID_API_URL").map_err(|_| {
            ApiError::Configuration("TALENTGRID_API_URL is not set".to_string())
        })?;
        let timeout_secs = env_u64("TALENTGRID_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);

        Ok(Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs)))
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
