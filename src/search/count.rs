// src/search/count.rs
use std::sync::LazyLock;

use regex::Regex;

// Group 2: page-size wording ("50 records per page"). Group 3: a summary
// verb ("45 results found").
static COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d[\d,]*)\s+(?:results?|records?|matches)\b(\s+(?:per|each|on\s+each)\s+page)?(\s+(?:found|returned|matched))?",
    )
    .expect("count pattern")
});
static NONE_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bno\s+(?:results?|records?|matches)\b").expect("none-found pattern")
});

/// Result count reported by a search page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultCount {
    Known(u32),
    /// The page says nothing recognisable about a count.
    Unknown,
    /// A count was there but unreadable, or the page text couldn't be read.
    ParseError(String),
}

impl ResultCount {
    pub fn known(&self) -> Option<u32> {
        match self {
            ResultCount::Known(n) => Some(*n),
            _ => None,
        }
    }
}

/// Read "N results" / "N records" (commas allowed) from page text.
/// "No results" / "No records" read as zero. Page-size phrases are never
/// counts; a phrase followed by "found"/"returned" wins over a bare one.
pub fn parse_result_count(text: &str) -> ResultCount {
    let phrases: Vec<_> = COUNT.captures_iter(text).filter(|c| c.get(2).is_none()).collect();
    let best = phrases.iter().find(|c| c.get(3).is_some()).or_else(|| phrases.first());
    if let Some(cap) = best {
        let raw = &cap[1];
        return match raw.replace(',', "").parse::<u32>() {
            Ok(n) => ResultCount::Known(n),
            Err(e) => ResultCount::ParseError(format!("{raw}: {e}")),
        };
    }
    if NONE_FOUND.is_match(text) {
        return ResultCount::Known(0);
    }
    ResultCount::Unknown
}
