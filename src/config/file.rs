// src/config/file.rs
//
// `key=value` config file. Blank lines and `#` comments are skipped,
// unknown keys are ignored, malformed values are errors.
use std::{fs, path::Path, str::FromStr};

use crate::error::{Result, ScrapeError};
use super::options::AppOptions;

pub fn load(path: &Path, opts: &mut AppOptions) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
    apply(&text, opts)
}

pub fn apply(text: &str, opts: &mut AppOptions) -> Result<()> {
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let Some(eq) = line.find('=') else {
            return Err(ScrapeError::Config(format!("line {}: expected key=value", n + 1)));
        };
        let key = line[..eq].trim();
        let val = line[eq + 1..].trim();
        let scrape = &mut opts.scrape;
        match key {
            "base_url" => scrape.base_url = val.to_string(),
            "threshold" => scrape.threshold = value(key, val)?,
            "max_depth" => scrape.max_depth = value(key, val)?,
            "states" => scrape.states = value(key, val)?,
            "on_unknown" => scrape.on_unknown = value(key, val)?,
            "date_from" => scrape.date_from = val.to_string(),
            "date_to" => scrape.date_to = val.to_string(),
            "landing_timeout_ms" => scrape.landing_timeout_ms = value(key, val)?,
            "landing_settle_ms" => scrape.landing_settle_ms = value(key, val)?,
            "form_timeout_ms" => scrape.form_timeout_ms = value(key, val)?,
            "search_settle_ms" => scrape.search_settle_ms = value(key, val)?,
            "profile_timeout_ms" => scrape.profile_timeout_ms = value(key, val)?,
            "format" => opts.export.format = value(key, val)?,
            "out" => opts.export.set_path(val),
            "dump" => {
                opts.export.dump_path = if val.is_empty() { None } else { Some(val.into()) };
            }
            _ => {}
        }
    }
    Ok(())
}

fn value<T>(key: &str, val: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    val.parse::<T>()
        .map_err(|e| ScrapeError::Config(format!("{}: {}", key, e)))
}
