// src/search/enumerate.rs
//
// Depth-first walk of the name-prefix tree. A node whose count exceeds the
// threshold is refined by one more name component (26 children); any other
// node has its result links collected. Nodes at the depth limit are always
// collected.
use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use url::Url;

use crate::browser::Browser;
use crate::config::consts::*;
use crate::config::options::{ScrapeOptions, UnknownCountPolicy};
use crate::error::{BrowserError, Result};
use crate::progress::Progress;
use super::count::{ResultCount, parse_result_count};
use super::query::Query;

/// Unique profile URLs, absolute and fragment-free.
pub type ProfileRefs = BTreeSet<String>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Searches issued.
    pub queries: usize,
    /// Searches whose 26 children were issued.
    pub refined: usize,
    /// Searches whose links were taken.
    pub collected: usize,
    /// Collected at the depth limit while still over the threshold.
    pub saturated: usize,
    /// Searches whose count could not be read.
    pub unreadable: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Enumeration {
    pub refs: ProfileRefs,
    pub stats: EnumerationStats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Collect,
    Refine,
}

pub fn decide(count: &ResultCount, depth: usize, opts: &ScrapeOptions) -> Decision {
    if depth >= opts.depth_limit() {
        return Decision::Collect;
    }
    match count {
        ResultCount::Known(n) if *n > opts.threshold => Decision::Refine,
        ResultCount::Known(_) => Decision::Collect,
        ResultCount::Unknown | ResultCount::ParseError(_) => match opts.on_unknown {
            UnknownCountPolicy::Collect => Decision::Collect,
            UnknownCountPolicy::Refine => Decision::Refine,
        },
    }
}

pub async fn enumerate<B>(
    browser: &mut B,
    opts: &ScrapeOptions,
    progress: &mut dyn Progress,
) -> Result<Enumeration>
where
    B: Browser + ?Sized,
{
    let base = Url::parse(&opts.base_url)
        .map_err(|_| BrowserError::InvalidUrl { url: opts.base_url.clone() })?;

    // Seeds in reverse so the stack pops A..Z, state by state.
    let mut stack: Vec<Query> = Vec::new();
    for state in opts.states.passes().into_iter().rev() {
        let root = Query::root(state);
        stack.extend(ALPHABET.iter().rev().filter_map(|&c| root.refine(c)));
    }

    info!(seeds = stack.len(), threshold = opts.threshold, max_depth = opts.depth_limit(), "Starting search phase");
    progress.begin("search", 0);

    let mut out = Enumeration::default();
    while let Some(query) = stack.pop() {
        let count = perform_search(browser, &query, opts).await?;
        out.stats.queries += 1;
        match &count {
            ResultCount::Known(n) => debug!(%query, count = n, "searched"),
            ResultCount::Unknown => {
                out.stats.unreadable += 1;
                warn!(%query, "result count not found on page");
            }
            ResultCount::ParseError(e) => {
                out.stats.unreadable += 1;
                warn!(%query, error = %e, "result count unreadable");
            }
        }

        match decide(&count, query.depth(), opts) {
            Decision::Refine => {
                out.stats.refined += 1;
                stack.extend(ALPHABET.iter().rev().filter_map(|&c| query.refine(c)));
            }
            Decision::Collect => {
                if let Some(n) = count.known().filter(|&n| n > opts.threshold) {
                    out.stats.saturated += 1;
                    warn!(%query, count = n, threshold = opts.threshold,
                        "depth limit reached; collecting only the links shown");
                }
                let urls = extract_profile_refs(browser, &base).await?;
                debug!(%query, links = urls.len(), "collected");
                out.stats.collected += 1;
                out.refs.extend(urls);
            }
        }
        progress.item_done(&query.to_string());
    }

    progress.finish();
    info!(
        queries = out.stats.queries,
        profiles = out.refs.len(),
        saturated = out.stats.saturated,
        "Search phase complete"
    );
    Ok(out)
}

/// Fill and submit the search form for `query`; read the reported count.
///
/// Every name field is written on each search, blank when unset, so values
/// from a deeper previous search never leak into a shallower one.
pub async fn perform_search<B>(
    browser: &mut B,
    query: &Query,
    opts: &ScrapeOptions,
) -> Result<ResultCount, BrowserError>
where
    B: Browser + ?Sized,
{
    browser.wait_for_selector(SEL_LAST_NAME, opts.form_timeout()).await?;

    let names = [
        (SEL_FIRST_NAME, &query.first),
        (SEL_LAST_NAME, &query.last),
        (SEL_MIDDLE_NAME, &query.middle),
    ];
    for (sel, value) in names {
        browser.fill(sel, value.as_deref().unwrap_or("")).await?;
    }
    if let Some(state) = &query.state {
        browser.fill(SEL_STATE, state).await?;
    }
    browser.fill(SEL_DATE_FROM, &opts.date_from).await?;
    browser.fill(SEL_DATE_TO, &opts.date_to).await?;

    browser.click(SEL_SEARCH_BUTTON).await?;
    browser.wait(opts.search_settle()).await;

    Ok(match browser.read_text("body").await {
        Ok(text) => parse_result_count(&text),
        Err(e) => ResultCount::ParseError(e.to_string()),
    })
}

/// Profile links on the current results page, normalized against `base`.
pub async fn extract_profile_refs<B>(browser: &mut B, base: &Url) -> Result<Vec<String>, BrowserError>
where
    B: Browser + ?Sized,
{
    let links = browser.query(SEL_PROFILE_LINK).await?;
    let mut urls = Vec::with_capacity(links.len());
    for link in &links {
        let Some(href) = browser.read_attribute(link, "href").await? else { continue };
        match normalize_ref(base, &href) {
            Some(url) => urls.push(url),
            None => debug!(href = %href, "skipping unusable link"),
        }
    }
    Ok(urls)
}

/// Absolute form of `href` (relative links resolve against `base`), fragment dropped.
pub fn normalize_ref(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url.to_string())
}
