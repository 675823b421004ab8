//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod chart;
mod document;
mod job;
mod queue;

pub use chart::ChartCommands;
pub use document::DocumentCommands;
pub use job::JobCommands;
pub use queue::QueueCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use qanvas_client::JobStatus;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Chart rendering
    Chart {
        #[command(subcommand)]
        command: ChartCommands,
    },
    /// Document generation
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// Operations on an enqueued job, addressed by its ticket URL
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Queue management
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        Commands::Chart { command } => chart::handle_chart_command(command, &client).await,
        Commands::Document { command } => {
            document::handle_document_command(command, &client).await
        }
        Commands::Job { command } => job::handle_job_command(command, &client).await,
        Commands::Queue { command } => queue::handle_queue_command(command, &client).await,
    }
}

/// Colorize job status for display
pub(crate) fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Ready => status_str.green(),
        JobStatus::Failed(_) => status_str.red(),
    }
}

/// Report where an artifact went
///
/// Artifacts written to stdout get no banner so they can be piped.
pub(crate) fn print_artifact_saved(output: Option<&std::path::PathBuf>, bytes: usize) {
    if let Some(path) = output {
        eprintln!(
            "{} Wrote {} bytes to {}",
            "✓".green(),
            bytes,
            path.display().to_string().cyan()
        );
    }
}
