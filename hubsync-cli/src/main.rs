//! HubSpot to Excel workbook sync CLI

use anyhow::Result;
use clap::Parser;

mod api;
mod cli;
mod config;
mod sheet;
mod sync;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = cli::Cli::parse();
    cli::run(cli).await
}
