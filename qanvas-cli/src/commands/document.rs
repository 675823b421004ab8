//! Document command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use qanvas_client::{JobClient, JobKind};
use qanvas_core::dto::payload::JobPayload;

use super::print_artifact_saved;
use crate::io::{read_document_payload, write_artifact};

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Queue a document and print its ticket
    Enqueue {
        #[command(flatten)]
        document: DocumentArgs,
    },
    /// Generate a document synchronously, without queueing
    Generate {
        #[command(flatten)]
        document: DocumentArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Queue a document, wait for it, download it and clear it
    Render {
        #[command(flatten)]
        document: DocumentArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Document input shared by every document subcommand
#[derive(Args)]
pub struct DocumentArgs {
    /// Template file
    #[arg(long)]
    pub template: PathBuf,

    /// JSON file with the data merged into the template
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format (ignored for OpenDocument jobs)
    #[arg(long, default_value = "pdf")]
    pub format: String,

    /// Use the OpenDocument endpoints
    #[arg(long)]
    pub open_document: bool,
}

impl DocumentArgs {
    fn kind(&self) -> JobKind {
        if self.open_document {
            JobKind::OpenDocument
        } else {
            JobKind::GenericDocument
        }
    }

    async fn payload(&self) -> Result<JobPayload> {
        Ok(read_document_payload(&self.template, self.data.as_deref())
            .await?
            .into())
    }
}

/// Handle document commands
///
/// # Arguments
/// * `command` - The document command to execute
/// * `client` - Client built from the global flags
pub async fn handle_document_command(command: DocumentCommands, client: &JobClient) -> Result<()> {
    match command {
        DocumentCommands::Enqueue { document } => {
            let ticket = client
                .jobs(document.kind())
                .enqueue(&document.payload().await?, &document.format)
                .await
                .context("Failed to enqueue document")?;
            eprintln!("{}", "Document enqueued".green());
            println!("{}", ticket);
            Ok(())
        }
        DocumentCommands::Generate { document, output } => {
            let artifact = client
                .jobs(document.kind())
                .generate(&document.payload().await?, &document.format)
                .await
                .context("Failed to generate document")?;
            write_artifact(output.as_ref(), &artifact).await?;
            print_artifact_saved(output.as_ref(), artifact.len());
            Ok(())
        }
        DocumentCommands::Render { document, output } => {
            let artifact = client
                .jobs(document.kind())
                .process(&document.payload().await?, &document.format)
                .await
                .context("Failed to render document")?;
            write_artifact(output.as_ref(), &artifact).await?;
            print_artifact_saved(output.as_ref(), artifact.len());
            Ok(())
        }
    }
}
