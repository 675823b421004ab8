//! File input and artifact output

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qanvas_core::dto::payload::{ChartPayload, DocumentPayload};
use tokio::io::AsyncWriteExt;

/// Read chart options from a JSON file
///
/// The options are checked to be JSON but forwarded exactly as written.
pub async fn read_chart_payload(path: &Path, width: u32) -> Result<ChartPayload> {
    let options = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read chart options from {}", path.display()))?;

    serde_json::from_str::<serde_json::Value>(&options)
        .with_context(|| format!("Chart options in {} are not valid JSON", path.display()))?;

    Ok(ChartPayload::new(options.trim()).with_width(width))
}

/// Read a template and its optional JSON data file
pub async fn read_document_payload(
    template: &Path,
    data: Option<&Path>,
) -> Result<DocumentPayload> {
    let bytes = tokio::fs::read(template)
        .await
        .with_context(|| format!("Failed to read template {}", template.display()))?;

    let template_name = template
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());

    let data = match data {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read data from {}", path.display()))?;
            serde_json::from_str::<serde_json::Value>(&raw)
                .with_context(|| format!("Data in {} is not valid JSON", path.display()))?
        }
        None => serde_json::json!({}),
    };

    Ok(DocumentPayload::new(template_name, bytes, data))
}

/// Write an artifact to a file, or to stdout when no path is given
pub async fn write_artifact(output: Option<&PathBuf>, artifact: &[u8]) -> Result<()> {
    match output {
        Some(path) => tokio::fs::write(path, artifact)
            .await
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(artifact)
                .await
                .context("Failed to write artifact to stdout")?;
            stdout.flush().await.context("Failed to flush stdout")
        }
    }
}
