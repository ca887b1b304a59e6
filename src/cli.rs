// src/cli.rs
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{self, AppOptions};
use crate::config::options::{ExportFormat, StateScope, UnknownCountPolicy};
use crate::core::HttpBrowser;
use crate::error::Result;
use crate::progress::LogProgress;
use crate::runner::{self, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "moms_scrape", version, about = "Scrape MOMS certificate records into a CSV/TSV file")]
pub struct Args {
    /// key=value config file; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Output file (default moms.csv / moms.tsv)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// csv | tsv
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Largest result count collected without refining
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Name components refinement may use (1..=3)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub max_depth: Option<u8>,

    /// `all`, `none`, or a comma list of state codes
    #[arg(long)]
    pub states: Option<StateScope>,

    /// When a page's result count can't be read: collect | refine
    #[arg(long)]
    pub on_unknown: Option<UnknownCountPolicy>,

    /// Where to save the landing page
    #[arg(long, conflicts_with = "no_dump")]
    pub dump: Option<PathBuf>,

    /// Don't save the landing page
    #[arg(long)]
    pub no_dump: bool,

    /// -v debug, -vv trace
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn options(&self) -> Result<AppOptions> {
        let mut opts = AppOptions::default();
        if let Some(path) = &self.config {
            config::file::load(path, &mut opts)?;
        }

        let scrape = &mut opts.scrape;
        if let Some(v) = &self.base_url { scrape.base_url = v.clone(); }
        if let Some(v) = self.threshold { scrape.threshold = v; }
        if let Some(v) = self.max_depth { scrape.max_depth = v as usize; }
        if let Some(v) = &self.states { scrape.states = v.clone(); }
        if let Some(v) = self.on_unknown { scrape.on_unknown = v; }

        let export = &mut opts.export;
        if let Some(v) = self.format { export.format = v; }
        if let Some(v) = &self.out { export.set_path(v); }
        if let Some(v) = &self.dump { export.dump_path = Some(v.clone()); }
        if self.no_dump { export.dump_path = None; }
        Ok(opts)
    }
}

pub async fn run(args: Args) -> Result<RunSummary> {
    crate::log::init(args.verbose);
    let opts = args.options()?;
    let mut browser = HttpBrowser::new()?.with_request_timeout(opts.scrape.form_timeout());
    let mut progress = LogProgress::new();
    runner::run(&mut browser, &opts, &mut progress).await
}

pub fn print_summary(summary: &RunSummary) {
    let s = &summary.search;
    println!(
        "Searches: {} ({} refined, {} collected, {} over threshold at depth limit, {} unreadable)",
        s.queries, s.refined, s.collected, s.saturated, s.unreadable
    );
    println!(
        "Profiles: {} found, {} recorded, {} skipped",
        summary.references, summary.records, summary.skipped.len()
    );
    match &summary.written {
        Some(path) => println!("Wrote {}", path.display()),
        None => println!("Nothing written"),
    }
}
