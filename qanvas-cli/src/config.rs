//! Configuration module
//!
//! Turns the global CLI flags into a configured client.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use qanvas_client::{ClientConfig, JobClient};
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the rendering service
    pub url: String,
    /// API key, if the service requires one
    pub api_key: Option<String>,
    /// Budget for each request and each wait
    pub timeout_secs: u64,
    /// Scratch directory override
    pub cache_dir: Option<PathBuf>,
    /// Require enqueue responses to be URLs
    pub validate_url: bool,
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        let mut client_config = ClientConfig::new(&self.url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_url_validation(self.validate_url);

        if let Some(key) = &self.api_key {
            client_config = client_config.with_credential(key);
        }
        if let Some(dir) = &self.cache_dir {
            client_config = client_config.with_cache_dir(dir);
        }

        client_config
    }

    /// Build a validated client
    pub fn client(&self) -> Result<JobClient> {
        let client_config = self.client_config();
        client_config
            .validate()
            .context("Invalid client configuration")?;
        debug!(url = %client_config.base_url, timeout = ?client_config.timeout, "Client configured");
        Ok(JobClient::new(client_config))
    }
}
