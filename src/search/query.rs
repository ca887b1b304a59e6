// src/search/query.rs
use std::fmt;

/// One search: name prefixes (first, then last, then middle) and an optional
/// state. The date range comes from the scrape options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Query {
    pub state: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub middle: Option<String>,
}

impl Query {
    /// No name filter yet.
    pub fn root(state: Option<String>) -> Self {
        Self { state, ..Self::default() }
    }

    /// Number of name components set.
    pub fn depth(&self) -> usize {
        [&self.first, &self.last, &self.middle]
            .iter()
            .filter(|c| c.is_some())
            .count()
    }

    /// Narrow by the next unset component. `None` once all three are set.
    pub fn refine(&self, letter: char) -> Option<Query> {
        let mut child = self.clone();
        let slot = if child.first.is_none() {
            &mut child.first
        } else if child.last.is_none() {
            &mut child.last
        } else if child.middle.is_none() {
            &mut child.middle
        } else {
            return None;
        };
        *slot = Some(letter.to_string());
        Some(child)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("first", &self.first),
            ("last", &self.last),
            ("middle", &self.middle),
            ("state", &self.state),
        ];
        let mut sep = "";
        for (k, v) in parts {
            if let Some(v) = v {
                write!(f, "{sep}{k}={v}")?;
                sep = ",";
            }
        }
        if sep.is_empty() {
            write!(f, "(all)")?;
        }
        Ok(())
    }
}
