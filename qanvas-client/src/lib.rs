//! Qanvas HTTP Client
//!
//! A client for the Qanvas rendering service. Jobs (charts, generated
//! documents) are enqueued, polled until the service reports them processed,
//! then downloaded or cleared.
//!
//! A single [`TimeoutPolicy`] caps every HTTP call and every wait issued
//! through a client. The policy is immutable, so a client can be cloned
//! freely and each wait gets the full ceiling measured from its own start.
//!
//! # Example
//!
//! ```no_run
//! use qanvas_client::{ClientConfig, JobClient};
//! use qanvas_core::domain::kind::JobKind;
//! use qanvas_core::dto::payload::{ChartPayload, JobPayload};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = JobClient::new(ClientConfig::new("http://localhost:8080").with_credential("key"));
//!     let charts = client.jobs(JobKind::Chart);
//!
//!     let payload = JobPayload::from(ChartPayload::new(r#"{"series":[{"data":[1,2,3]}]}"#));
//!     let ticket = charts.enqueue(&payload, "svg").await?;
//!     charts.wait_for_processed(&ticket).await?;
//!     let svg = charts.download(&ticket).await?;
//!     charts.clear_one(&ticket).await;
//!
//!     println!("Rendered {} bytes", svg.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod jobs;
pub mod mime_type;
mod poll;
pub mod transport;
pub mod validate;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use jobs::JobQueue;
pub use mime_type::{MagicClassifier, MimeClassifier};
pub use qanvas_core::domain::job::{JobStatus, JobTicket};
pub use qanvas_core::domain::kind::JobKind;
pub use qanvas_core::domain::timeout::TimeoutPolicy;
pub use transport::{HttpTransport, ServiceRequest, ServiceResponse, Transport};

use std::sync::Arc;

use reqwest::Method;

/// Client for the Qanvas rendering service
///
/// Operations are grouped per job kind through [`JobClient::jobs`]:
/// - Queueing (enqueue, check status, wait, download, clear)
/// - Synchronous generation
/// - MIME resolution of processed artifacts
///
/// One client drives one logical workflow at a time per clone; run
/// independent workflows on independent clones if they must overlap.
#[derive(Clone)]
pub struct JobClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    classifier: Arc<dyn MimeClassifier>,
}

impl JobClient {
    /// Create a new client backed by `reqwest`
    ///
    /// # Example
    /// ```
    /// use qanvas_client::{ClientConfig, JobClient};
    ///
    /// let client = JobClient::new(ClientConfig::new("http://localhost:8080"));
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a new client with a custom transport
    ///
    /// This allows routing calls through a configured reqwest client or a
    /// test double.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            classifier: Arc::new(MagicClassifier),
        }
    }

    /// Replace the MIME classifier used by `resolve_mime_type`
    pub fn with_classifier(mut self, classifier: Arc<dyn MimeClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Lifecycle operations for one job kind
    pub fn jobs(&self, kind: JobKind) -> JobQueue<'_> {
        JobQueue::new(self, kind)
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.config.timeout
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Absolute URL of a service path
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Start a request capped at the call timeout, credential attached
    fn request(&self, method: Method, url: impl Into<String>) -> ServiceRequest {
        let request = ServiceRequest::new(method, url, self.config.timeout.call_timeout());
        match &self.config.credential {
            Some(key) => request.header(CREDENTIAL_HEADER, key.as_str()),
            None => request,
        }
    }

    async fn execute(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        self.transport.execute(request).await
    }
}

impl std::fmt::Debug for JobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

/// Header carrying the API credential on every call
pub const CREDENTIAL_HEADER: &str = "ApiKey";
