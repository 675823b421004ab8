//! Job kinds and their endpoint layout
//!
//! Every kind shares the same lifecycle (enqueue, probe, download, clear);
//! only the endpoint paths and the multipart field layout differ. Those
//! differences are captured in a [`JobKindDescriptor`] so the client needs a
//! single lifecycle implementation.

use serde::{Deserialize, Serialize};

/// The kinds of job the rendering service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    /// Chart rendered from chart options (SVG, PNG, ...)
    Chart,
    /// OpenDocument file filled from a template
    OpenDocument,
    /// Document in a caller-chosen format filled from a template
    GenericDocument,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [
        JobKind::Chart,
        JobKind::OpenDocument,
        JobKind::GenericDocument,
    ];

    /// Endpoint layout for this kind
    pub fn descriptor(self) -> &'static JobKindDescriptor {
        match self {
            JobKind::Chart => &CHART,
            JobKind::OpenDocument => &OPEN_DOCUMENT,
            JobKind::GenericDocument => &GENERIC_DOCUMENT,
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Chart => write!(f, "Chart"),
            JobKind::OpenDocument => write!(f, "OpenDocument"),
            JobKind::GenericDocument => write!(f, "Document"),
        }
    }
}

/// Where the caller-supplied format token travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPlacement {
    /// Appended to the enqueue/generate path as `.{format}`
    PathSuffix,
    /// Sent as a multipart form field with the given name
    FormField(&'static str),
    /// The endpoint infers the format from the template; the token is dropped
    Ignored,
}

/// Whether a kind is fed chart options or a template plus data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Chart,
    Document,
}

/// Endpoint layout and form conventions of one job kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobKindDescriptor {
    pub kind: JobKind,
    /// Path prefix shared by all endpoints of the kind (e.g. `/document`)
    pub prefix: &'static str,
    pub payload_shape: PayloadShape,
    pub format_placement: FormatPlacement,
    /// Multipart field carrying the JSON data or chart options
    pub data_field: &'static str,
    /// Multipart field carrying the template file (document kinds only)
    pub template_field: &'static str,
    /// Multipart field carrying the chart width (chart kind only)
    pub width_field: &'static str,
    /// Append the credential to returned tickets as `api_key=...`
    pub credential_in_query: bool,
}

impl JobKindDescriptor {
    /// Query parameter used to carry the credential on tickets
    pub const CREDENTIAL_QUERY_PARAM: &'static str = "api_key";

    pub fn enqueue_path(&self, format: &str) -> String {
        self.action_path("enqueue", format)
    }

    pub fn generate_path(&self, format: &str) -> String {
        self.action_path("generate", format)
    }

    pub fn clear_queue_path(&self) -> String {
        format!("{}/clear-queue", self.prefix)
    }

    pub fn delete_processed_path(&self, file_name: &str) -> String {
        format!("{}/delete-processed/{}", self.prefix, file_name)
    }

    fn action_path(&self, action: &str, format: &str) -> String {
        match self.format_placement {
            FormatPlacement::PathSuffix => format!("{}/{}.{}", self.prefix, action, format),
            FormatPlacement::FormField(_) | FormatPlacement::Ignored => {
                format!("{}/{}", self.prefix, action)
            }
        }
    }
}

static CHART: JobKindDescriptor = JobKindDescriptor {
    kind: JobKind::Chart,
    prefix: "/highchart",
    payload_shape: PayloadShape::Chart,
    format_placement: FormatPlacement::FormField("format"),
    data_field: "data",
    template_field: "template",
    width_field: "width",
    credential_in_query: true,
};

static OPEN_DOCUMENT: JobKindDescriptor = JobKindDescriptor {
    kind: JobKind::OpenDocument,
    prefix: "/open-document",
    payload_shape: PayloadShape::Document,
    format_placement: FormatPlacement::Ignored,
    data_field: "data",
    template_field: "template",
    width_field: "width",
    credential_in_query: true,
};

static GENERIC_DOCUMENT: JobKindDescriptor = JobKindDescriptor {
    kind: JobKind::GenericDocument,
    prefix: "/document",
    payload_shape: PayloadShape::Document,
    format_placement: FormatPlacement::PathSuffix,
    data_field: "data",
    template_field: "template",
    width_field: "width",
    credential_in_query: true,
};
