//! Sync command handler

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::config::{FileConfig, SyncConfig};
use crate::sync::run_sync;

#[derive(Args)]
pub struct SyncArgs {
    /// Workbook path (defaults to the config file, then hubsync.xlsx)
    #[arg(long)]
    pub workbook: Option<PathBuf>,

    /// Config file path (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only keep jobs whose pipeline label matches
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub async fn handle_sync_command(args: SyncArgs) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let file = FileConfig::load(args.config.as_deref())?;
    let mut config = SyncConfig::resolve(file, args.workbook);
    if let Some(pipeline) = args.pipeline {
        config.filter_pipeline_label = pipeline;
    }

    let report = run_sync(&config).await?;

    println!(
        "Synced {} HubSpot job rows to \"{}\".",
        report.rows.to_string().bright_green().bold(),
        report.sheet
    );
    Ok(())
}
