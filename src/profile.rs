// src/profile.rs
//
// Visits each profile reference once and reads the fixed field set.
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::browser::Browser;
use crate::config::consts::{PROFILE_FIELDS, PROFILE_URL_FIELD};
use crate::config::options::ScrapeOptions;
use crate::progress::Progress;
use crate::search::ProfileRefs;

/// One output row: column name → value, in column order.
pub type Row = IndexMap<String, String>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    pub applicant_1: String,
    pub applicant_2: String,
    pub certificate_number: String,
    pub date_filed: String,
    pub county: String,
    pub profile_url: String,
}

impl ProfileRecord {
    fn values(&self) -> [&str; 6] {
        [
            self.applicant_1.as_str(),
            self.applicant_2.as_str(),
            self.certificate_number.as_str(),
            self.date_filed.as_str(),
            self.county.as_str(),
            self.profile_url.as_str(),
        ]
    }

    /// Column names, in output order.
    pub fn columns() -> [&'static str; 6] {
        let [a, b, c, d, e] = PROFILE_FIELDS.map(|(name, _)| name);
        [a, b, c, d, e, PROFILE_URL_FIELD]
    }

    pub fn to_row(&self) -> Row {
        Self::columns()
            .into_iter()
            .zip(self.values())
            .map(|(k, v)| (s!(k), s!(v)))
            .collect()
    }
}

/// A reference that could not be visited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub url: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct Collection {
    pub records: Vec<ProfileRecord>,
    pub skipped: Vec<Skipped>,
}

/// Visit every reference once. A reference that fails to load is logged and
/// skipped; nothing here aborts the run.
pub async fn collect_profiles<B>(
    browser: &mut B,
    refs: &ProfileRefs,
    opts: &ScrapeOptions,
    progress: &mut dyn Progress,
) -> Collection
where
    B: Browser + ?Sized,
{
    info!("Scraping {} profiles", refs.len());
    progress.begin("profiles", refs.len());

    let mut out = Collection::default();
    for url in refs {
        if let Err(e) = browser.navigate(url, opts.profile_timeout()).await {
            if e.is_timeout() {
                warn!("Timeout while loading {}", url);
            } else {
                warn!("Could not load {}: {}", url, e);
            }
            progress.item_failed(url, &e.to_string());
            out.skipped.push(Skipped { url: url.clone(), reason: e.to_string() });
            continue;
        }
        out.records.push(scrape_profile(browser).await);
        progress.item_done(url);
    }

    progress.finish();
    info!(records = out.records.len(), skipped = out.skipped.len(), "Profile phase complete");
    out
}

/// Read the fields of the currently loaded profile page. Missing fields are empty.
pub async fn scrape_profile<B>(browser: &mut B) -> ProfileRecord
where
    B: Browser + ?Sized,
{
    let [a1, a2, cert, filed, county] = PROFILE_FIELDS.map(|(_, sel)| sel);
    ProfileRecord {
        applicant_1: safe_text(browser, a1).await,
        applicant_2: safe_text(browser, a2).await,
        certificate_number: safe_text(browser, cert).await,
        date_filed: safe_text(browser, filed).await,
        county: safe_text(browser, county).await,
        profile_url: s!(browser.url()),
    }
}

async fn safe_text<B>(browser: &mut B, selector: &str) -> String
where
    B: Browser + ?Sized,
{
    browser.read_text(selector).await.unwrap_or_default()
}
