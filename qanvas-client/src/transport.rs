//! Request executor
//!
//! A [`Transport`] performs exactly one HTTP call and reports the status code
//! and body. It never retries and never interprets the status; retry policy
//! lives in the poll loop. [`HttpTransport`] is the `reqwest` implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use qanvas_core::dto::payload::{FormPart, FormValue};
use reqwest::{Client, Method, Version, multipart};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Body of an outgoing request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    Multipart(Vec<FormPart>),
}

/// One call against the rendering service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// Hard cap on the whole call, body transfer included
    pub timeout: Duration,
    /// Capture response headers
    pub want_headers: bool,
    /// Read the response body; when false the body is never transferred
    pub want_body: bool,
}

impl ServiceRequest {
    pub fn new(method: Method, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            timeout,
            want_headers: false,
            want_body: true,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Only the status line and headers matter for this call
    pub fn headers_only(mut self) -> Self {
        self.want_headers = true;
        self.want_body = false;
        self
    }

    /// Only the status code matters for this call
    pub fn status_only(mut self) -> Self {
        self.want_headers = false;
        self.want_body = false;
        self
    }
}

/// Outcome of one call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl ServiceResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::new(status, Bytes::new())
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body decoded as UTF-8 with surrounding whitespace removed
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

/// Performs single HTTP calls against the rendering service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one call
    ///
    /// Fails with [`ClientError::TransportTimeout`] when the call does not
    /// finish within `request.timeout`, with [`ClientError::InvalidRequest`]
    /// when the URL or a header cannot be used, and with
    /// [`ClientError::Transport`] for any other network failure. HTTP error
    /// statuses are not failures at this layer.
    async fn execute(&self, request: ServiceRequest) -> Result<ServiceResponse>;
}

/// `reqwest` implementation of [`Transport`]
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom reqwest client (proxies, TLS settings, ...)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build_form(parts: Vec<FormPart>) -> multipart::Form {
        parts
            .into_iter()
            .fold(multipart::Form::new(), |form, part| match part.value {
                FormValue::Text(text) => form.text(part.name, text),
                FormValue::File { file_name, bytes } => form.part(
                    part.name,
                    multipart::Part::bytes(bytes).file_name(file_name),
                ),
            })
    }

    fn classify(url: &str, timeout: Duration, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::TransportTimeout {
                url: url.to_string(),
                timeout,
            }
        } else if err.is_builder() {
            ClientError::InvalidRequest(format!("cannot build request to {}: {}", url, err))
        } else {
            ClientError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        let ServiceRequest {
            method,
            url,
            headers,
            body,
            timeout,
            want_headers,
            want_body,
        } = request;

        debug!(%method, %url, timeout_secs = timeout.as_secs_f64(), "Sending request");

        let mut builder = self
            .client
            .request(method, &url)
            .version(Version::HTTP_11)
            .timeout(timeout);

        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        if let RequestBody::Multipart(parts) = body {
            builder = builder.multipart(Self::build_form(parts));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify(&url, timeout, e))?;

        let status = response.status().as_u16();

        let headers = if want_headers {
            response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        let body = if want_body {
            response
                .bytes()
                .await
                .map_err(|e| Self::classify(&url, timeout, e))?
        } else {
            Bytes::new()
        };

        debug!(%url, status, bytes = body.len(), "Received response");

        Ok(ServiceResponse {
            status,
            headers,
            body,
        })
    }
}
