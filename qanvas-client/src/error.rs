//! Error types for the Qanvas client

use std::time::Duration;

use qanvas_core::domain::kind::JobKind;
use qanvas_core::dto::payload::PayloadMismatch;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Qanvas client
#[derive(Debug, Error)]
pub enum ClientError {
    /// A single HTTP call did not finish within its allotted time
    #[error("request to {url} timed out after {}s", .timeout.as_secs_f64())]
    TransportTimeout {
        url: String,
        timeout: Duration,
    },

    /// Any other network-level failure (DNS, refused connection, TLS)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A status probe returned a code outside the job lifecycle vocabulary
    #[error("HTTP status code {status} was returned from {url} while waiting for {kind} to process")]
    UnexpectedStatus {
        kind: JobKind,
        status: u16,
        url: String,
    },

    /// The service did not answer an enqueue with 200 and a ticket URL
    #[error("{kind} could not be enqueued at {url} (status {status})")]
    EnqueueRejected {
        kind: JobKind,
        status: u16,
        url: String,
    },

    /// The service did not answer a synchronous generate with 200
    #[error("an error occurred while generating {kind} at {url} (status {status})")]
    GenerationFailed {
        kind: JobKind,
        status: u16,
        url: String,
    },

    /// A job was still pending when the poll ceiling was reached
    #[error("gave up waiting for {url} after {}s (ceiling {}s)", .waited.as_secs(), .ceiling.as_secs())]
    PollTimeout {
        url: String,
        waited: Duration,
        ceiling: Duration,
    },

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Scratch file for MIME resolution could not be created or written
    #[error("temporary file error: {0}")]
    TempFile(#[source] std::io::Error),

    /// The MIME classifier failed
    #[error("MIME classification failed: {0}")]
    Classifier(String),
}

impl ClientError {
    /// Check if this error is a timeout of a call or of a wait
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. } | Self::PollTimeout { .. }
        )
    }

    /// Check if repeating the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. } | Self::Transport { .. } | Self::PollTimeout { .. }
        )
    }

    /// HTTP status code observed by the failing call, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. }
            | Self::EnqueueRejected { status, .. }
            | Self::GenerationFailed { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<PayloadMismatch> for ClientError {
    fn from(err: PayloadMismatch) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
