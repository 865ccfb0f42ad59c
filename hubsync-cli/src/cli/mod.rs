//! Command line interface

pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cli::commands::{summary, sync};

#[derive(Parser)]
#[command(
    name = "hubsync-cli",
    about = "Sync HubSpot jobs, deals and contacts into an xlsx workbook",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pull jobs, deals and contacts from HubSpot into the workbook
    Sync(sync::SyncArgs),
    /// Print stage counts from the dashboard sheet
    Summary(summary::SummaryArgs),
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync(args) => sync::handle_sync_command(args).await,
        Commands::Summary(args) => summary::handle_summary_command(args).await,
    }
}
