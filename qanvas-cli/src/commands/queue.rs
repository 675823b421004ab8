//! Queue command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use qanvas_client::{JobClient, JobKind};

use crate::types::KindArg;

/// Queue subcommands
#[derive(Subcommand)]
pub enum QueueCommands {
    /// Drop every queued job of a kind (all kinds when omitted)
    Clear {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
}

/// Handle queue commands
///
/// Clearing is best effort: a refused clear is reported but does not fail
/// the command.
pub async fn handle_queue_command(command: QueueCommands, client: &JobClient) -> Result<()> {
    match command {
        QueueCommands::Clear { kind } => {
            let kinds: Vec<JobKind> = match kind {
                Some(kind) => vec![kind.into()],
                None => JobKind::ALL.to_vec(),
            };

            for kind in kinds {
                if client.jobs(kind).clear_queue().await {
                    println!("  {} {} queue cleared", "✓".green(), kind);
                } else {
                    println!("  {} {} queue not cleared", "✗".red(), kind);
                }
            }
            Ok(())
        }
    }
}
