// src/log.rs
use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Timestamps log lines with time since [`init`].
struct Elapsed;

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", fmt_elapsed(start().elapsed().as_millis()))
    }
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "moms_scrape=info",
        1 => "moms_scrape=debug",
        _ => "moms_scrape=trace,reqwest=debug",
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `verbosity`.
/// Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    start();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(Elapsed)
                .with_target(false),
        )
        .try_init();
}
