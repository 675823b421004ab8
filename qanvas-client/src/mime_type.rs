//! MIME resolution of processed artifacts
//!
//! The artifact is materialized into a scratch file in the configured cache
//! directory and handed to a [`MimeClassifier`]. The scratch file is a
//! [`tempfile::NamedTempFile`] and is removed when it goes out of scope,
//! whichever way classification ends.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use mime::Mime;
use qanvas_core::domain::job::JobTicket;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::jobs::JobQueue;

/// Prefix of scratch files created during MIME resolution
pub const SCRATCH_PREFIX: &str = "qanvas";

/// Guesses the MIME type of a file on disk
pub trait MimeClassifier: Send + Sync {
    /// Classify the file at `path`; `None` when the type cannot be told
    fn guess(&self, path: &Path) -> anyhow::Result<Option<Mime>>;
}

/// Default classifier: magic bytes first, file extension as fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicClassifier;

impl MagicClassifier {
    /// Bytes read from the head of the file
    const SNIFF_LEN: usize = 512;

    const ZIP_MAGIC: &'static [u8] = b"PK\x03\x04";

    fn sniff(head: &[u8]) -> Option<Mime> {
        if head.starts_with(b"%PDF-") {
            return Some(mime::APPLICATION_PDF);
        }
        if head.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Some(mime::IMAGE_PNG);
        }
        if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
            return Some(mime::IMAGE_GIF);
        }
        if head.starts_with(b"\xff\xd8\xff") {
            return Some(mime::IMAGE_JPEG);
        }
        if head.starts_with(Self::ZIP_MAGIC) {
            return Self::sniff_opendocument(head);
        }

        let text = String::from_utf8_lossy(head);
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
            return Some(mime::IMAGE_SVG);
        }

        None
    }

    /// OpenDocument packages store their MIME type uncompressed as the first
    /// zip entry, named `mimetype`.
    fn sniff_opendocument(head: &[u8]) -> Option<Mime> {
        const NAME_OFFSET: usize = 30;
        const NAME: &[u8] = b"mimetype";

        let content_offset = NAME_OFFSET + NAME.len();
        if head.get(NAME_OFFSET..content_offset) != Some(NAME) {
            return None;
        }

        let rest = &head[content_offset..];
        let end = rest
            .windows(4)
            .position(|window| window == Self::ZIP_MAGIC)
            .unwrap_or(rest.len());
        let declared: Vec<u8> = rest[..end]
            .iter()
            .take_while(|b| b.is_ascii_graphic())
            .copied()
            .collect();
        String::from_utf8_lossy(&declared).parse().ok()
    }
}

impl MimeClassifier for MagicClassifier {
    fn guess(&self, path: &Path) -> anyhow::Result<Option<Mime>> {
        let mut head = Vec::with_capacity(Self::SNIFF_LEN);
        std::fs::File::open(path)?
            .take(Self::SNIFF_LEN as u64)
            .read_to_end(&mut head)?;

        // Office Open XML and other zip containers are told apart by extension
        let generic_zip = head.starts_with(Self::ZIP_MAGIC).then(|| {
            "application/zip"
                .parse()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM)
        });

        Ok(Self::sniff(&head)
            .or_else(|| mime_guess::from_path(path).first())
            .or(generic_zip))
    }
}

impl JobQueue<'_> {
    /// Determine the MIME type of a processed artifact
    ///
    /// # Returns
    /// `None` while the job is still pending, otherwise the classifier's guess
    pub async fn resolve_mime_type(&self, ticket: &JobTicket) -> Result<Option<Mime>> {
        if !self.check_status(ticket).await?.is_ready() {
            return Ok(None);
        }

        let artifact = self.download(ticket).await?;

        let suffix = ticket
            .file_name()
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let classifier = Arc::clone(&self.client.classifier);
        let cache_dir = self.client.config.cache_dir.clone();

        let guessed = tokio::task::spawn_blocking(move || {
            classify_scratch_copy(classifier.as_ref(), &cache_dir, &suffix, &artifact)
        })
        .await
        .map_err(|e| ClientError::Classifier(format!("classifier task failed: {}", e)))??;

        debug!(kind = %self.kind(), %ticket, mime = ?guessed, "Resolved MIME type");
        Ok(guessed)
    }
}

/// Write `artifact` to a scratch file, classify it, and drop the file
fn classify_scratch_copy(
    classifier: &dyn MimeClassifier,
    dir: &Path,
    suffix: &str,
    artifact: &[u8],
) -> Result<Option<Mime>> {
    let mut scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .suffix(suffix)
        .tempfile_in(dir)
        .map_err(ClientError::TempFile)?;

    scratch
        .write_all(artifact)
        .and_then(|_| scratch.flush())
        .map_err(ClientError::TempFile)?;

    classifier
        .guess(scratch.path())
        .map_err(|e| ClientError::Classifier(format!("{:#}", e)))
}
