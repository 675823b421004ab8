//! Job lifecycle operations
//!
//! One implementation serves every job kind; the kind's
//! [`JobKindDescriptor`] supplies the endpoint paths and form layout.

use bytes::Bytes;
use qanvas_core::domain::job::{JobStatus, JobTicket};
use qanvas_core::domain::kind::{JobKind, JobKindDescriptor};
use qanvas_core::dto::payload::JobPayload;
use reqwest::Method;
use tracing::{debug, info, warn};

use crate::JobClient;
use crate::error::{ClientError, Result};
use crate::validate::is_valid_url;

/// Lifecycle operations for one job kind, borrowed from a [`JobClient`]
#[derive(Debug, Clone, Copy)]
pub struct JobQueue<'a> {
    pub(crate) client: &'a JobClient,
    pub(crate) descriptor: &'static JobKindDescriptor,
}

impl<'a> JobQueue<'a> {
    pub(crate) fn new(client: &'a JobClient, kind: JobKind) -> Self {
        Self {
            client,
            descriptor: kind.descriptor(),
        }
    }

    pub fn kind(&self) -> JobKind {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &'static JobKindDescriptor {
        self.descriptor
    }

    // =============================================================================
    // Queueing
    // =============================================================================

    /// Submit a job to the queue
    ///
    /// # Arguments
    /// * `payload` - Chart options or template plus data, matching the kind
    /// * `format` - Output format token (e.g. "pdf", "svg"), passed through unvalidated
    ///
    /// # Returns
    /// The ticket URL identifying the job. When a credential is configured it
    /// is appended as `api_key` so the ticket alone authenticates later calls.
    pub async fn enqueue(&self, payload: &JobPayload, format: &str) -> Result<JobTicket> {
        let parts = payload.form_parts(self.descriptor, format)?;
        let url = self.client.endpoint(&self.descriptor.enqueue_path(format));
        let request = self.client.request(Method::POST, &url).multipart(parts);

        let response = self.client.execute(request).await?;
        let body = response.text();

        let looks_like_ticket = if self.client.config.validate_enqueue_url {
            is_valid_url(&body)
        } else {
            !body.is_empty()
        };

        if !response.is_ok() || !looks_like_ticket {
            debug!(kind = %self.kind(), status = response.status, %url, "Enqueue rejected");
            return Err(ClientError::EnqueueRejected {
                kind: self.kind(),
                status: response.status,
                url,
            });
        }

        info!(kind = %self.kind(), ticket = %body, "Job enqueued");

        let ticket = JobTicket::new(body);
        let ticket = match &self.client.config.credential {
            Some(key) if self.descriptor.credential_in_query => {
                ticket.with_query_param(JobKindDescriptor::CREDENTIAL_QUERY_PARAM, key)
            }
            _ => ticket,
        };

        Ok(ticket)
    }

    /// Probe a ticket once
    ///
    /// Issues a header-only HEAD request. 200 means Ready and 204 means
    /// Pending; any other code fails with [`ClientError::UnexpectedStatus`]
    /// since the job or the service is then in an unrecoverable state.
    pub async fn check_status(&self, ticket: &JobTicket) -> Result<JobStatus> {
        let request = self
            .client
            .request(Method::HEAD, ticket.as_str())
            .headers_only();
        let response = self.client.execute(request).await?;

        match JobStatus::from_probe(response.status) {
            JobStatus::Failed(status) => Err(ClientError::UnexpectedStatus {
                kind: self.kind(),
                status,
                url: ticket.to_string(),
            }),
            status => {
                debug!(kind = %self.kind(), %ticket, %status, "Probed job");
                Ok(status)
            }
        }
    }

    /// Fetch the artifact of a job
    ///
    /// The body is returned verbatim. Callers are expected to have seen the
    /// job Ready first; this is not checked.
    pub async fn download(&self, ticket: &JobTicket) -> Result<Bytes> {
        let request = self.client.request(Method::GET, ticket.as_str());
        let response = self.client.execute(request).await?;

        debug!(
            kind = %self.kind(),
            %ticket,
            status = response.status,
            bytes = response.body.len(),
            "Downloaded artifact"
        );

        Ok(response.body)
    }

    /// Delete one processed artifact from the service
    ///
    /// Best effort: any failure is logged and reported as `false`.
    pub async fn clear_one(&self, ticket: &JobTicket) -> bool {
        let Some(file_name) = ticket.file_name() else {
            warn!(kind = %self.kind(), %ticket, "Ticket has no file name, nothing to clear");
            return false;
        };

        let url = self
            .client
            .endpoint(&self.descriptor.delete_processed_path(&file_name));
        self.best_effort(Method::POST, url).await
    }

    /// Drop every queued job of this kind
    ///
    /// Best effort: any failure is logged and reported as `false`.
    pub async fn clear_queue(&self) -> bool {
        let url = self.client.endpoint(&self.descriptor.clear_queue_path());
        self.best_effort(Method::POST, url).await
    }

    async fn best_effort(&self, method: Method, url: String) -> bool {
        let request = self.client.request(method, &url).status_only();

        match self.client.execute(request).await {
            Ok(response) if response.is_ok() => true,
            Ok(response) => {
                warn!(kind = %self.kind(), %url, status = response.status, "Clear request refused");
                false
            }
            Err(e) => {
                warn!(kind = %self.kind(), %url, "Clear request failed: {}", e);
                false
            }
        }
    }

    // =============================================================================
    // Synchronous Generation
    // =============================================================================

    /// Render a job without queueing it
    ///
    /// # Returns
    /// The artifact bytes when the service answers 200
    pub async fn generate(&self, payload: &JobPayload, format: &str) -> Result<Bytes> {
        let parts = payload.form_parts(self.descriptor, format)?;
        let url = self.client.endpoint(&self.descriptor.generate_path(format));
        let request = self.client.request(Method::POST, &url).multipart(parts);

        let response = self.client.execute(request).await?;

        if !response.is_ok() {
            return Err(ClientError::GenerationFailed {
                kind: self.kind(),
                status: response.status,
                url,
            });
        }

        info!(kind = %self.kind(), bytes = response.body.len(), "Generated artifact");
        Ok(response.body)
    }

    /// Enqueue, wait, download and clear in one go
    ///
    /// Clearing the processed artifact afterwards is best effort and does not
    /// affect the result.
    pub async fn process(&self, payload: &JobPayload, format: &str) -> Result<Bytes> {
        let ticket = self.enqueue(payload, format).await?;
        self.wait_for_processed(&ticket).await?;
        let artifact = self.download(&ticket).await?;
        self.clear_one(&ticket).await;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use crate::test_support::ScriptedTransport;
    use crate::transport::{RequestBody, ServiceResponse};
    use httpmock::MockServer;
    use qanvas_core::dto::payload::{ChartPayload, DocumentPayload, FormPart};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn scripted(transport: &Arc<ScriptedTransport>) -> JobClient {
        let config = ClientConfig::new("https://qanvas.test").with_credential("secret");
        JobClient::with_transport(config, transport.clone())
    }

    fn document() -> JobPayload {
        JobPayload::from(DocumentPayload::new(
            "letter.odt",
            b"template".to_vec(),
            json!({ "name": "Ada" }),
        ))
    }

    fn chart() -> JobPayload {
        JobPayload::from(ChartPayload::new(r#"{"series":[]}"#))
    }

    #[tokio::test]
    async fn test_enqueue_returns_ticket_with_credential() {
        let transport = Arc::new(ScriptedTransport::new().respond(ServiceResponse::new(
            200,
            "https://qanvas.test/document/processed/abc.pdf\n",
        )));
        let client = scripted(&transport);

        let ticket = client
            .jobs(JobKind::GenericDocument)
            .enqueue(&document(), "pdf")
            .await
            .unwrap();

        assert_eq!(
            ticket.as_str(),
            "https://qanvas.test/document/processed/abc.pdf?api_key=secret"
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url, "https://qanvas.test/document/enqueue.pdf");
        assert!(
            requests[0]
                .headers
                .contains(&("ApiKey".to_string(), "secret".to_string()))
        );
        match &requests[0].body {
            RequestBody::Multipart(parts) => {
                assert_eq!(parts[0].name, "template");
                assert_eq!(parts[1], FormPart::text("data", r#"{"name":"Ada"}"#));
            }
            RequestBody::Empty => panic!("enqueue must send a multipart body"),
        }
    }

    #[tokio::test]
    async fn test_enqueue_rejects_non_url_body() {
        let transport = Arc::new(
            ScriptedTransport::new().respond(ServiceResponse::new(200, "not a url")),
        );
        let client = scripted(&transport);

        let err = client
            .jobs(JobKind::GenericDocument)
            .enqueue(&document(), "pdf")
            .await
            .unwrap_err();

        match err {
            ClientError::EnqueueRejected { kind, status, url } => {
                assert_eq!(kind, JobKind::GenericDocument);
                assert_eq!(status, 200);
                assert_eq!(url, "https://qanvas.test/document/enqueue.pdf");
            }
            other => panic!("expected EnqueueRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_enqueue_rejects_error_status_even_with_url_body() {
        let transport = Arc::new(ScriptedTransport::new().respond(ServiceResponse::new(
            500,
            "https://qanvas.test/highchart/processed/a.svg",
        )));
        let client = scripted(&transport);

        let err = client
            .jobs(JobKind::Chart)
            .enqueue(&chart(), "svg")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::EnqueueRejected { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_enqueue_without_validation_accepts_any_body() {
        let transport = Arc::new(
            ScriptedTransport::new().respond(ServiceResponse::new(200, "/processed/a.svg")),
        );
        let config = ClientConfig::new("https://qanvas.test").with_url_validation(false);
        let client = JobClient::with_transport(config, transport.clone());

        let ticket = client
            .jobs(JobKind::Chart)
            .enqueue(&chart(), "svg")
            .await
            .unwrap();

        // No credential configured, so nothing is appended
        assert_eq!(ticket.as_str(), "/processed/a.svg");
        assert_eq!(transport.requests()[0].url, "https://qanvas.test/highchart/enqueue");
    }

    #[tokio::test]
    async fn test_enqueue_with_wrong_payload_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = scripted(&transport);

        let err = client
            .jobs(JobKind::Chart)
            .enqueue(&document(), "svg")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_check_status_maps_lifecycle_codes() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(ServiceResponse::status(204))
                .respond(ServiceResponse::status(200)),
        );
        let client = scripted(&transport);
        let queue = client.jobs(JobKind::Chart);
        let ticket = JobTicket::new("https://qanvas.test/highchart/processed/a.svg");

        assert_eq!(queue.check_status(&ticket).await.unwrap(), JobStatus::Pending);
        assert_eq!(queue.check_status(&ticket).await.unwrap(), JobStatus::Ready);

        let requests = transport.requests();
        assert!(requests.iter().all(|r| r.method == Method::HEAD));
        assert!(requests.iter().all(|r| !r.want_body && r.want_headers));
        assert!(requests.iter().all(|r| r.url == ticket.as_str()));
    }

    #[tokio::test]
    async fn test_check_status_fails_on_any_other_code() {
        let ticket = JobTicket::new("https://qanvas.test/document/processed/a.pdf");

        for code in [100, 201, 202, 206, 301, 304, 400, 401, 403, 404, 410, 500, 502, 503] {
            let transport =
                Arc::new(ScriptedTransport::new().respond(ServiceResponse::status(code)));
            let client = scripted(&transport);

            let err = client
                .jobs(JobKind::GenericDocument)
                .check_status(&ticket)
                .await
                .unwrap_err();

            match err {
                ClientError::UnexpectedStatus { status, url, .. } => {
                    assert_eq!(status, code);
                    assert_eq!(url, ticket.as_str());
                }
                other => panic!("code {} produced {:?}", code, other),
            }
        }
    }

    #[tokio::test]
    async fn test_download_returns_body_verbatim() {
        let transport = Arc::new(
            ScriptedTransport::new().respond(ServiceResponse::new(200, "<svg/>")),
        );
        let client = scripted(&transport);
        let ticket = JobTicket::new("https://qanvas.test/highchart/processed/a.svg");

        let body = client.jobs(JobKind::Chart).download(&ticket).await.unwrap();

        assert_eq!(&body[..], b"<svg/>");
        assert_eq!(transport.requests()[0].method, Method::GET);
    }

    #[tokio::test]
    async fn test_clear_one_targets_delete_processed() {
        let transport = Arc::new(ScriptedTransport::new().respond(ServiceResponse::status(200)));
        let client = scripted(&transport);
        let ticket =
            JobTicket::new("https://qanvas.test/document/processed/abc.pdf?api_key=secret");

        assert!(client.jobs(JobKind::GenericDocument).clear_one(&ticket).await);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.url,
            "https://qanvas.test/document/delete-processed/abc.pdf"
        );
    }

    #[tokio::test]
    async fn test_clear_operations_swallow_failures() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(ServiceResponse::status(404))
                .fail(ClientError::TransportTimeout {
                    url: "https://qanvas.test/highchart/clear-queue".to_string(),
                    timeout: Duration::from_secs(1),
                }),
        );
        let client = scripted(&transport);
        let queue = client.jobs(JobKind::Chart);

        let ticket = JobTicket::new("https://qanvas.test/highchart/processed/a.svg");
        assert!(!queue.clear_one(&ticket).await);
        assert!(!queue.clear_queue().await);
    }

    #[tokio::test]
    async fn test_clear_one_without_file_name_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = scripted(&transport);

        let ticket = JobTicket::new("https://qanvas.test/");
        assert!(!client.jobs(JobKind::Chart).clear_one(&ticket).await);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_returns_artifact_or_fails() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(ServiceResponse::new(200, "PK\u{3}\u{4}odt"))
                .respond(ServiceResponse::new(422, "bad template")),
        );
        let client = scripted(&transport);
        let queue = client.jobs(JobKind::OpenDocument);

        let artifact = queue.generate(&document(), "odt").await.unwrap();
        assert_eq!(&artifact[..], b"PK\x03\x04odt");
        assert_eq!(
            transport.requests()[0].url,
            "https://qanvas.test/open-document/generate"
        );

        let err = queue.generate(&document(), "odt").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::GenerationFailed { status: 422, .. }
        ));
    }

    #[tokio::test]
    async fn test_process_runs_whole_lifecycle() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(ServiceResponse::new(
                    200,
                    "https://qanvas.test/highchart/processed/c.svg",
                ))
                .respond(ServiceResponse::status(200))
                .respond(ServiceResponse::new(200, "<svg/>"))
                .respond(ServiceResponse::status(500)),
        );
        let client = scripted(&transport);

        let artifact = client
            .jobs(JobKind::Chart)
            .process(&chart(), "svg")
            .await
            .unwrap();

        assert_eq!(&artifact[..], b"<svg/>");
        let methods: Vec<Method> = transport.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![Method::POST, Method::HEAD, Method::GET, Method::POST]
        );
    }

    #[tokio::test]
    async fn test_clear_queue_against_server_error_returns_false() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/document/clear-queue")
                    .header("ApiKey", "secret");
                then.status(500);
            })
            .await;

        let client = JobClient::new(ClientConfig::new(server.base_url()).with_credential("secret"));
        let cleared = client.jobs(JobKind::GenericDocument).clear_queue().await;

        mock.assert_async().await;
        assert!(!cleared);
    }

    #[tokio::test]
    async fn test_enqueue_over_http() {
        let server = MockServer::start_async().await;
        let ticket_url = server.url("/document/processed/xyz.pdf");
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/document/enqueue.pdf")
                    .header("ApiKey", "secret");
                then.status(200).body(ticket_url.clone());
            })
            .await;

        let client = JobClient::new(ClientConfig::new(server.base_url()).with_credential("secret"));
        let ticket = client
            .jobs(JobKind::GenericDocument)
            .enqueue(&document(), "pdf")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(ticket.as_str(), format!("{}?api_key=secret", ticket_url));
    }
}
