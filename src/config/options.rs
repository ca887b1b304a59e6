// src/config/options.rs
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
}

/// Whether (and which) states cross the name search space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StateScope {
    /// No state filter; one pass over the names.
    #[default]
    Ignore,
    /// Every code in `STATES`.
    All,
    Only(Vec<String>),
}

impl StateScope {
    /// One entry per outer pass; `None` means "no state filter".
    pub fn passes(&self) -> Vec<Option<String>> {
        match self {
            StateScope::Ignore => vec![None],
            StateScope::All => STATES.iter().map(|s| Some(s!(*s))).collect(),
            StateScope::Only(v) => v.iter().cloned().map(Some).collect(),
        }
    }
}

impl FromStr for StateScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(StateScope::Ignore);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(StateScope::All);
        }
        let mut codes = Vec::new();
        for part in s.split(',') {
            let code = part.trim().to_ascii_uppercase();
            if code.is_empty() { continue; }
            if !STATES.contains(&code.as_str()) {
                return Err(format!("Unknown state code: {}", code));
            }
            if !codes.contains(&code) { codes.push(code); }
        }
        if codes.is_empty() {
            return Ok(StateScope::Ignore);
        }
        Ok(StateScope::Only(codes))
    }
}

/// What to do when a search page's result count cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownCountPolicy {
    /// Treat the page as small enough and take its links.
    #[default]
    Collect,
    /// Treat the page as too broad and refine (collects at max depth).
    Refine,
}

impl FromStr for UnknownCountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collect" => Ok(UnknownCountPolicy::Collect),
            "refine" => Ok(UnknownCountPolicy::Refine),
            other => Err(format!("Unknown policy: {} (expected collect|refine)", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub base_url: String,
    pub threshold: u32,
    /// Number of name components refinement may use (1..=3).
    pub max_depth: usize,
    pub states: StateScope,
    pub on_unknown: UnknownCountPolicy,
    pub date_from: String,
    pub date_to: String,
    pub landing_timeout_ms: u64,
    pub landing_settle_ms: u64,
    pub form_timeout_ms: u64,
    pub search_settle_ms: u64,
    pub profile_timeout_ms: u64,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            threshold: THRESHOLD,
            max_depth: MAX_DEPTH,
            states: StateScope::Ignore,
            on_unknown: UnknownCountPolicy::Collect,
            date_from: s!(DATE_FROM),
            date_to: s!(DATE_TO),
            landing_timeout_ms: LANDING_TIMEOUT_MS,
            landing_settle_ms: LANDING_SETTLE_MS,
            form_timeout_ms: FORM_TIMEOUT_MS,
            search_settle_ms: SEARCH_SETTLE_MS,
            profile_timeout_ms: PROFILE_TIMEOUT_MS,
        }
    }
}

impl ScrapeOptions {
    /// `max_depth` clamped to the three name components.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.clamp(1, MAX_DEPTH)
    }

    /// Options with every wait zeroed. Used by tests and benches.
    pub fn without_waits(mut self) -> Self {
        self.landing_settle_ms = 0;
        self.search_settle_ms = 0;
        self
    }

    pub fn landing_timeout(&self) -> Duration { Duration::from_millis(self.landing_timeout_ms) }
    pub fn landing_settle(&self) -> Duration { Duration::from_millis(self.landing_settle_ms) }
    pub fn form_timeout(&self) -> Duration { Duration::from_millis(self.form_timeout_ms) }
    pub fn search_settle(&self) -> Duration { Duration::from_millis(self.search_settle_ms) }
    pub fn profile_timeout(&self) -> Duration { Duration::from_millis(self.profile_timeout_ms) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out_path: Option<PathBuf>,
    /// Landing page dump; `None` disables it.
    pub dump_path: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_path: None,
            dump_path: Some(PathBuf::from(PAGE_DUMP_FILE)),
        }
    }
}

impl ExportOptions {
    /// The user's path as given, or the default file named for the current format.
    pub fn out_path(&self) -> PathBuf {
        match &self.out_path {
            Some(p) => p.clone(),
            None => {
                let stem = Path::new(OUTPUT_FILE)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| s!("moms"));
                PathBuf::from(join!(&stem, ".", self.format.ext()))
            }
        }
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.out_path = Some(path.into());
    }
}
