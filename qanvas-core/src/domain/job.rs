//! Job domain types

use serde::{Deserialize, Serialize};
use url::Url;

/// Lifecycle status of an enqueued job
///
/// Derived from the status code of a single probe against the ticket URL and
/// never stored; every probe recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// The service accepted the job but has not finished rendering it (204)
    Pending,
    /// The artifact is ready for download (200)
    Ready,
    /// The probe returned a code outside the lifecycle vocabulary
    Failed(u16),
}

impl JobStatus {
    /// Status code the service uses to signal a finished job
    pub const READY_CODE: u16 = 200;
    /// Status code the service uses to signal a job still in the queue
    pub const PENDING_CODE: u16 = 204;

    /// Map a probe status code onto the job lifecycle
    pub fn from_probe(status: u16) -> Self {
        match status {
            Self::READY_CODE => JobStatus::Ready,
            Self::PENDING_CODE => JobStatus::Pending,
            other => JobStatus::Failed(other),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, JobStatus::Ready)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::Ready => write!(f, "Ready"),
            JobStatus::Failed(code) => write!(f, "Failed ({})", code),
        }
    }
}

/// Opaque URL identifying one enqueued job
///
/// The URL is the job's only identity: status probes, downloads and
/// deletions all address the job through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTicket(String);

impl JobTicket {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment of the ticket URL, without query or fragment
    ///
    /// The service names processed artifacts after this segment, so it is
    /// what the delete-processed endpoint expects.
    pub fn file_name(&self) -> Option<String> {
        if let Ok(url) = Url::parse(&self.0) {
            return url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string);
        }

        let path = self.0.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    }

    /// Return a copy of this ticket with an extra query parameter
    pub fn with_query_param(&self, key: &str, value: &str) -> Self {
        match Url::parse(&self.0) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair(key, value);
                Self(url.into())
            }
            Err(_) => {
                let separator = if self.0.contains('?') { '&' } else { '?' };
                Self(format!("{}{}{}={}", self.0, separator, key, value))
            }
        }
    }
}

impl std::fmt::Display for JobTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobTicket {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for JobTicket {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

impl AsRef<str> for JobTicket {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_probe() {
        assert_eq!(JobStatus::from_probe(200), JobStatus::Ready);
        assert_eq!(JobStatus::from_probe(204), JobStatus::Pending);
        assert_eq!(JobStatus::from_probe(404), JobStatus::Failed(404));
        assert_eq!(JobStatus::from_probe(201), JobStatus::Failed(201));
    }

    #[test]
    fn test_ticket_file_name_ignores_query() {
        let ticket = JobTicket::new("https://qanvas.test/document/processed/abc123.pdf?api_key=k");
        assert_eq!(ticket.file_name().as_deref(), Some("abc123.pdf"));
    }

    #[test]
    fn test_ticket_file_name_for_relative_url() {
        let ticket = JobTicket::new("/highchart/processed/chart.svg?x=1");
        assert_eq!(ticket.file_name().as_deref(), Some("chart.svg"));

        let ticket = JobTicket::new("https://qanvas.test/");
        assert_eq!(ticket.file_name(), None);
    }

    #[test]
    fn test_ticket_with_query_param() {
        let ticket = JobTicket::new("https://qanvas.test/document/processed/abc.pdf");
        let ticket = ticket.with_query_param("api_key", "secret");
        assert_eq!(
            ticket.as_str(),
            "https://qanvas.test/document/processed/abc.pdf?api_key=secret"
        );

        let ticket = ticket.with_query_param("v", "2");
        assert_eq!(
            ticket.as_str(),
            "https://qanvas.test/document/processed/abc.pdf?api_key=secret&v=2"
        );
    }

    #[test]
    fn test_ticket_serializes_as_plain_string() {
        let ticket = JobTicket::new("https://qanvas.test/a.svg");
        let json = serde_json::to_string(&ticket).unwrap();
        assert_eq!(json, "\"https://qanvas.test/a.svg\"");
    }
}
