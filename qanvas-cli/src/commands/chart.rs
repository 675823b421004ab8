//! Chart command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use qanvas_client::{JobClient, JobKind};
use qanvas_core::dto::payload::JobPayload;

use super::print_artifact_saved;
use crate::io::{read_chart_payload, write_artifact};

/// Chart subcommands
#[derive(Subcommand)]
pub enum ChartCommands {
    /// Queue a chart and print its ticket
    Enqueue {
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Render a chart synchronously, without queueing
    Generate {
        #[command(flatten)]
        chart: ChartArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Queue a chart, wait for it, download it and clear it
    Render {
        #[command(flatten)]
        chart: ChartArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Chart input shared by every chart subcommand
#[derive(Args)]
pub struct ChartArgs {
    /// JSON file holding the chart options
    #[arg(long)]
    pub options: PathBuf,

    /// Output format
    #[arg(long, default_value = "svg")]
    pub format: String,

    /// Width in pixels
    #[arg(long, default_value_t = 600)]
    pub width: u32,
}

impl ChartArgs {
    async fn payload(&self) -> Result<JobPayload> {
        Ok(read_chart_payload(&self.options, self.width).await?.into())
    }
}

/// Handle chart commands
///
/// # Arguments
/// * `command` - The chart command to execute
/// * `client` - Client built from the global flags
pub async fn handle_chart_command(command: ChartCommands, client: &JobClient) -> Result<()> {
    let charts = client.jobs(JobKind::Chart);

    match command {
        ChartCommands::Enqueue { chart } => {
            let ticket = charts
                .enqueue(&chart.payload().await?, &chart.format)
                .await
                .context("Failed to enqueue chart")?;
            eprintln!("{}", "Chart enqueued".green());
            println!("{}", ticket);
            Ok(())
        }
        ChartCommands::Generate { chart, output } => {
            let artifact = charts
                .generate(&chart.payload().await?, &chart.format)
                .await
                .context("Failed to generate chart")?;
            write_artifact(output.as_ref(), &artifact).await?;
            print_artifact_saved(output.as_ref(), artifact.len());
            Ok(())
        }
        ChartCommands::Render { chart, output } => {
            let artifact = charts
                .process(&chart.payload().await?, &chart.format)
                .await
                .context("Failed to render chart")?;
            write_artifact(output.as_ref(), &artifact).await?;
            print_artifact_saved(output.as_ref(), artifact.len());
            Ok(())
        }
    }
}
