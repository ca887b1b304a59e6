// src/search/mod.rs
mod count;
mod enumerate;
mod query;

pub use count::{ResultCount, parse_result_count};
pub use enumerate::{
    Decision, Enumeration, EnumerationStats, ProfileRefs,
    decide, enumerate, extract_profile_refs, normalize_ref, perform_search,
};
pub use query::Query;
