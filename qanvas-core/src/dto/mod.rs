//! Data Transfer Objects submitted to the rendering service
//!
//! Payloads are opaque to the client: chart options and document data are
//! forwarded as multipart form fields without interpretation.

pub mod payload;
