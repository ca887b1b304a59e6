// src/bin/cli.rs
use clap::Parser;
use moms_scrape::cli::{self, Args};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let summary = cli::run(Args::parse()).await?;
    cli::print_summary(&summary);
    Ok(())
}
