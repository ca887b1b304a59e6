// src/runner.rs
use std::path::PathBuf;

use tracing::info;

use crate::{
    browser::Browser,
    config::AppOptions,
    error::Result,
    file,
    profile::{self, Row, Skipped},
    progress::Progress,
    search::{self, EnumerationStats},
};

/// What a run produced.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub search: EnumerationStats,
    /// Unique profile references found.
    pub references: usize,
    pub records: usize,
    pub skipped: Vec<Skipped>,
    /// `None` when there was nothing to write.
    pub written: Option<PathBuf>,
}

/// Landing page → search → profiles → file, on one browsing session.
pub async fn run<B>(
    browser: &mut B,
    opts: &AppOptions,
    progress: &mut dyn Progress,
) -> Result<RunSummary>
where
    B: Browser + ?Sized,
{
    let scrape = &opts.scrape;

    info!("Opening {}", scrape.base_url);
    browser.navigate(&scrape.base_url, scrape.landing_timeout()).await?;
    browser.wait(scrape.landing_settle()).await;

    if let Some(dump) = &opts.export.dump_path {
        let content = browser.content().await?;
        file::dump_page(dump, &content)?;
    }

    let found = search::enumerate(browser, scrape, progress).await?;
    let collected = profile::collect_profiles(browser, &found.refs, scrape, progress).await;

    let rows: Vec<Row> = collected.records.iter().map(|r| r.to_row()).collect();
    let written = file::write_records(&opts.export.out_path(), &rows, opts.export.format)?;

    Ok(RunSummary {
        search: found.stats,
        references: found.refs.len(),
        records: collected.records.len(),
        skipped: collected.skipped,
        written,
    })
}
