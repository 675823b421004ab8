//! Client configuration
//!
//! Defines the service endpoint, the credential and the timeout budget a
//! [`JobClient`](crate::JobClient) is built from. The configuration is fixed
//! for the lifetime of the client.

use std::path::PathBuf;
use std::time::Duration;

use qanvas_core::domain::timeout::TimeoutPolicy;
use reqwest::header::HeaderValue;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the rendering service (e.g., "http://localhost:8080")
    pub base_url: String,

    /// API credential sent as the `ApiKey` header and appended to tickets
    pub credential: Option<String>,

    /// Require enqueue responses to be valid URLs before trusting them as tickets
    pub validate_enqueue_url: bool,

    /// Timeout budget for calls and waits
    pub timeout: TimeoutPolicy,

    /// Directory for scratch files created during MIME resolution
    pub cache_dir: PathBuf,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: None,
            validate_enqueue_url: true,
            timeout: TimeoutPolicy::default(),
            cache_dir: std::env::temp_dir(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - QANVAS_URL (required)
    /// - QANVAS_API_KEY (optional)
    /// - QANVAS_TIMEOUT (optional, seconds, default: 55)
    /// - QANVAS_CACHE_DIR (optional, default: system temp dir)
    /// - QANVAS_VALIDATE_URL (optional, bool, default: true)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let base_url = lookup("QANVAS_URL")
            .ok_or_else(|| anyhow::anyhow!("QANVAS_URL environment variable not set"))?;

        let mut config = Self::new(base_url);

        config.credential = lookup("QANVAS_API_KEY").filter(|key| !key.is_empty());

        if let Some(raw) = lookup("QANVAS_TIMEOUT") {
            let Ok(seconds) = raw.trim().parse::<u64>() else {
                anyhow::bail!("QANVAS_TIMEOUT must be a whole number of seconds, got {:?}", raw);
            };
            config.timeout = TimeoutPolicy::from_secs(seconds);
        }

        if let Some(dir) = lookup("QANVAS_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("QANVAS_VALIDATE_URL") {
            let Ok(validate) = raw.trim().parse::<bool>() else {
                anyhow::bail!("QANVAS_VALIDATE_URL must be true or false, got {:?}", raw);
            };
            config.validate_enqueue_url = validate;
        }

        Ok(config)
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_timeout_policy(mut self, timeout: TimeoutPolicy) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shorthand for a policy with the given budget and the default poll interval
    pub fn with_timeout(self, budget: Duration) -> Self {
        self.with_timeout_policy(TimeoutPolicy::new(budget))
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_url_validation(mut self, enabled: bool) -> Self {
        self.validate_enqueue_url = enabled;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.timeout.call_timeout().is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        if self.timeout.poll_interval().is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if let Some(credential) = &self.credential {
            if credential.is_empty() {
                anyhow::bail!("credential cannot be empty when set");
            }
            if HeaderValue::from_str(credential).is_err() {
                anyhow::bail!("credential must be a valid HTTP header value");
            }
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
