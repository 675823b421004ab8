//! Job payloads and their multipart encoding

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::kind::{FormatPlacement, JobKind, JobKindDescriptor, PayloadShape};

/// Chart options submitted to the chart endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Chart options, already serialized to JSON
    pub options: String,
    /// Rendered width in pixels
    pub width: u32,
}

impl ChartPayload {
    pub const DEFAULT_WIDTH: u32 = 600;

    pub fn new(options: impl Into<String>) -> Self {
        Self {
            options: options.into(),
            width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn from_value(options: &serde_json::Value) -> Self {
        Self::new(options.to_string())
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }
}

/// Template plus data submitted to the document endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// File name reported for the uploaded template
    pub template_name: String,
    /// Raw template bytes
    pub template: Vec<u8>,
    /// Data merged into the template by the service
    pub data: serde_json::Value,
}

impl DocumentPayload {
    pub fn new(
        template_name: impl Into<String>,
        template: impl Into<Vec<u8>>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            template_name: template_name.into(),
            template: template.into(),
            data,
        }
    }
}

/// Anything that can be submitted as a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobPayload {
    Chart(ChartPayload),
    Document(DocumentPayload),
}

impl JobPayload {
    pub fn shape(&self) -> PayloadShape {
        match self {
            JobPayload::Chart(_) => PayloadShape::Chart,
            JobPayload::Document(_) => PayloadShape::Document,
        }
    }

    /// Encode the payload as multipart form parts for the given kind
    ///
    /// The format token is added as a form field only when the kind carries
    /// it that way; path-suffix formats are handled by the caller.
    pub fn form_parts(
        &self,
        descriptor: &JobKindDescriptor,
        format: &str,
    ) -> Result<Vec<FormPart>, PayloadMismatch> {
        if self.shape() != descriptor.payload_shape {
            return Err(PayloadMismatch {
                kind: descriptor.kind,
                expected: descriptor.payload_shape,
                found: self.shape(),
            });
        }

        let mut parts = match self {
            JobPayload::Chart(chart) => vec![
                FormPart::text(descriptor.data_field, chart.options.clone()),
                FormPart::text(descriptor.width_field, chart.width.to_string()),
            ],
            JobPayload::Document(document) => vec![
                FormPart::file(
                    descriptor.template_field,
                    document.template_name.clone(),
                    document.template.clone(),
                ),
                FormPart::text(descriptor.data_field, document.data.to_string()),
            ],
        };

        if let FormatPlacement::FormField(field) = descriptor.format_placement {
            parts.push(FormPart::text(field, format));
        }

        Ok(parts)
    }
}

impl From<ChartPayload> for JobPayload {
    fn from(payload: ChartPayload) -> Self {
        JobPayload::Chart(payload)
    }
}

impl From<DocumentPayload> for JobPayload {
    fn from(payload: DocumentPayload) -> Self {
        JobPayload::Document(payload)
    }
}

/// A payload was submitted to a kind that expects the other shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} jobs take a {expected:?} payload, got a {found:?} payload")]
pub struct PayloadMismatch {
    pub kind: JobKind,
    pub expected: PayloadShape,
    pub found: PayloadShape,
}

/// One field of a multipart request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                bytes,
            },
        }
    }
}
