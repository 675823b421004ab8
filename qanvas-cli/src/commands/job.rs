//! Job command handlers
//!
//! Handles operations on an already enqueued job: probing its status,
//! waiting for it, downloading, clearing and MIME resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use qanvas_client::{JobClient, JobTicket};

use super::{colorize_status, print_artifact_saved};
use crate::io::write_artifact;
use crate::types::KindArg;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Probe a job once
    Status {
        /// Ticket URL returned by enqueue
        ticket: String,

        #[arg(long, value_enum, default_value_t = KindArg::Document)]
        kind: KindArg,
    },
    /// Wait until a job is processed
    Wait {
        /// Ticket URL returned by enqueue
        ticket: String,

        #[arg(long, value_enum, default_value_t = KindArg::Document)]
        kind: KindArg,
    },
    /// Download a processed job
    Download {
        /// Ticket URL returned by enqueue
        ticket: String,

        #[arg(long, value_enum, default_value_t = KindArg::Document)]
        kind: KindArg,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a processed job from the service
    Clear {
        /// Ticket URL returned by enqueue
        ticket: String,

        #[arg(long, value_enum, default_value_t = KindArg::Document)]
        kind: KindArg,
    },
    /// Print the MIME type of a processed job
    Mime {
        /// Ticket URL returned by enqueue
        ticket: String,

        #[arg(long, value_enum, default_value_t = KindArg::Document)]
        kind: KindArg,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The job command to execute
/// * `client` - Client built from the global flags
pub async fn handle_job_command(command: JobCommands, client: &JobClient) -> Result<()> {
    match command {
        JobCommands::Status { ticket, kind } => {
            let ticket = JobTicket::new(ticket);
            let status = client.jobs(kind.into()).check_status(&ticket).await?;
            println!("{}", colorize_status(&status));
            Ok(())
        }
        JobCommands::Wait { ticket, kind } => {
            let ticket = JobTicket::new(ticket);
            client
                .jobs(kind.into())
                .wait_for_processed(&ticket)
                .await
                .context("Job did not finish")?;
            println!("{}", "✓ Processed".green());
            Ok(())
        }
        JobCommands::Download {
            ticket,
            kind,
            output,
        } => {
            let ticket = JobTicket::new(ticket);
            let artifact = client.jobs(kind.into()).download(&ticket).await?;
            write_artifact(output.as_ref(), &artifact).await?;
            print_artifact_saved(output.as_ref(), artifact.len());
            Ok(())
        }
        JobCommands::Clear { ticket, kind } => {
            let ticket = JobTicket::new(ticket);
            if client.jobs(kind.into()).clear_one(&ticket).await {
                println!("{}", "✓ Cleared".green());
            } else {
                println!("{}", "⚠ Service did not confirm the deletion".yellow());
            }
            Ok(())
        }
        JobCommands::Mime { ticket, kind } => {
            let ticket = JobTicket::new(ticket);
            match client.jobs(kind.into()).resolve_mime_type(&ticket).await? {
                Some(mime) => println!("{}", mime),
                None => println!("{}", "Job is not processed yet".yellow()),
            }
            Ok(())
        }
    }
}
