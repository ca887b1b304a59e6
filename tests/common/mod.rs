// tests/common/mod.rs
//
// Scripted stand-in for the portal: search counts and result links keyed by
// the name prefixes submitted, profile pages keyed by URL.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use moms_scrape::config::consts::*;
use moms_scrape::config::options::ScrapeOptions;
use moms_scrape::core::Element;
use moms_scrape::{Browser, BrowserError, ElementHandle};

pub const BASE: &str = "https://moms.mn.gov/";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Page {
    Search(Option<String>),
    Profile(String),
}

#[derive(Default)]
pub struct FakePortal {
    counts: HashMap<String, u32>,
    bodies: HashMap<String, String>,
    links: HashMap<String, Vec<String>>,
    profiles: HashMap<String, HashMap<String, String>>,
    timeouts: HashSet<String>,

    page: Option<Page>,
    url: String,
    staged: HashMap<String, String>,

    /// Search keys in submission order, e.g. "A", "AB", "MN:ABC".
    pub searches: Vec<String>,
    /// Profile URLs navigated to, in order.
    pub visits: Vec<String>,
}

impl FakePortal {
    pub fn new() -> Self { Self::default() }

    /// Count reported for the search `key` ("A" = first A, "AB" = first A last B, ...).
    pub fn count(mut self, key: &str, n: u32) -> Self {
        self.counts.insert(key.to_string(), n);
        self
    }

    /// Raw body text for the search `key`, replacing the count line.
    pub fn body(mut self, key: &str, text: &str) -> Self {
        self.bodies.insert(key.to_string(), text.to_string());
        self
    }

    pub fn links(mut self, key: &str, hrefs: &[&str]) -> Self {
        self.links.insert(key.to_string(), hrefs.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Profile page with the given `#id → text` fields.
    pub fn profile(mut self, url: &str, fields: &[(&str, &str)]) -> Self {
        let map = fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.profiles.insert(url.to_string(), map);
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.timeouts.insert(url.to_string());
        self
    }

    fn key(&self) -> String {
        let get = |sel: &str| self.staged.get(sel).cloned().unwrap_or_default();
        let names = format!("{}{}{}", get(SEL_FIRST_NAME), get(SEL_LAST_NAME), get(SEL_MIDDLE_NAME));
        match self.staged.get(SEL_STATE) {
            Some(state) => format!("{state}:{names}"),
            None => names,
        }
    }

    fn current_key(&self) -> Option<&str> {
        match &self.page {
            Some(Page::Search(Some(k))) => Some(k),
            _ => None,
        }
    }

    /// A fresh session starts on the search form.
    fn has_form(&self) -> bool {
        matches!(self.page, None | Some(Page::Search(_)))
    }
}

fn not_found(selector: &str) -> BrowserError {
    BrowserError::SelectorNotFound { selector: selector.to_string() }
}

#[async_trait]
impl Browser for FakePortal {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
        if self.timeouts.contains(url) {
            return Err(BrowserError::Timeout { url: url.to_string() });
        }
        if url == BASE {
            self.page = Some(Page::Search(None));
        } else if self.profiles.contains_key(url) {
            self.visits.push(url.to_string());
            self.page = Some(Page::Profile(url.to_string()));
        } else {
            return Err(BrowserError::Http { url: url.to_string(), status: 404 });
        }
        self.url = url.to_string();
        self.staged.clear();
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<(), BrowserError> {
        if selector == SEL_LAST_NAME && self.has_form() { Ok(()) } else { Err(not_found(selector)) }
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        if !self.has_form() {
            return Err(not_found(selector));
        }
        self.staged.insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        if selector != SEL_SEARCH_BUTTON || !self.has_form() {
            return Err(not_found(selector));
        }
        let key = self.key();
        self.searches.push(key.clone());
        self.page = Some(Page::Search(Some(key)));
        self.url = format!("{BASE}Search.aspx");
        Ok(())
    }

    async fn query(&mut self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError> {
        assert_eq!(selector, SEL_PROFILE_LINK);
        let hrefs = self.current_key().and_then(|k| self.links.get(k)).cloned().unwrap_or_default();
        Ok(hrefs.iter().map(|h| Element::new("a", &[("href", h.as_str())], "record")).collect())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String, BrowserError> {
        match self.page.clone() {
            Some(Page::Search(Some(key))) if selector == "body" => Ok(self
                .bodies
                .get(&key)
                .cloned()
                .unwrap_or_else(|| format!("{} results found", self.counts.get(&key).copied().unwrap_or(0)))),
            Some(Page::Profile(url)) => {
                let id = selector.trim_start_matches('#');
                self.profiles[&url].get(id).cloned().ok_or_else(|| not_found(selector))
            }
            _ => Err(not_found(selector)),
        }
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        Ok(String::from("<html><body><form id=\"search\"></form></body></html>"))
    }

    fn url(&self) -> &str { &self.url }
}

pub fn opts() -> ScrapeOptions {
    ScrapeOptions::default().without_waits()
}

/// Full profile field set for a certificate number.
pub fn fields(cert: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("applicant1", "DOE, JANE"),
        ("applicant2", "ROE, JOHN"),
        ("certificate", cert),
        ("dateFiled", "06/01/1999"),
        ("county", "Hennepin"),
    ]
}

/// Read a written table back into cells. Quoted fields may hold the
/// separator and doubled quotes; records are one per line.
pub fn read_table(text: &str, sep: char) -> Vec<Vec<String>> {
    text.lines().filter(|l| !l.is_empty()).map(|l| split_record(l, sep)).collect()
}

fn split_record(line: &str, sep: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                cell.push('"');
            }
            '"' => quoted = !quoted,
            c if c == sep && !quoted => cells.push(std::mem::take(&mut cell)),
            c => cell.push(c),
        }
    }
    cells.push(cell);
    cells
}
