//! Summary command handler

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::*;

use crate::config::{FileConfig, SyncConfig};
use crate::sheet::reader::load_workbook;
use crate::sync::columns::SUMMARY_SHEET;
use crate::sync::summary::{stage_summary, StageSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Workbook path (defaults to the config file, then hubsync.xlsx)
    #[arg(long)]
    pub workbook: Option<PathBuf>,

    /// Config file path (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub async fn handle_summary_command(args: SummaryArgs) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let file = FileConfig::load(args.config.as_deref())?;
    let config = SyncConfig::resolve(file, args.workbook);

    let workbook = load_workbook(&config.workbook)?;
    let summary = stage_summary(workbook.sheet(SUMMARY_SHEET));

    match args.format {
        OutputFormat::Table => print_table(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => print!("{}", to_csv(&summary)),
    }
    Ok(())
}

fn print_table(summary: &StageSummary) {
    println!("{}", "Pipeline Stage Summary".bold());
    for row in &summary.rows {
        println!("{:<28} {:>5}", row.stage, row.count);
    }
    // pad before coloring so ANSI codes do not skew the alignment
    let total = format!("{:<28} {:>5}", "Total", summary.total);
    println!("{}", total.bold());
}

fn to_csv(summary: &StageSummary) -> String {
    let mut out = String::from("stage,count\n");
    for row in &summary.rows {
        out.push_str(&format!("{},{}\n", csv_escape(&row.stage), row.count));
    }
    out.push_str(&format!("total,{}\n", summary.total));
    out
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
