// src/progress.rs
use tracing::info;

/// Progress reporting for the long-running stages (search, profile visits).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start of a stage with the number of items, if known.
    fn begin(&mut self, _stage: &str, _total: usize) {}

    /// One unit completed (a search issued, a profile recorded).
    fn item_done(&mut self, _label: &str) {}

    /// One unit given up on. The stage itself logs the reason.
    fn item_failed(&mut self, _label: &str, _reason: &str) {}

    /// Called at the end of a stage, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Reports through `tracing`; used by the CLI.
#[derive(Default)]
pub struct LogProgress {
    stage: String,
    done: usize,
    failed: usize,
    total: usize,
}

impl LogProgress {
    pub fn new() -> Self { Self::default() }
}

impl Progress for LogProgress {
    fn begin(&mut self, stage: &str, total: usize) {
        self.stage = s!(stage);
        self.done = 0;
        self.failed = 0;
        self.total = total;
        if total > 0 {
            info!("{}: {} item(s)", stage, total);
        } else {
            info!("{}: starting", stage);
        }
    }
    fn item_done(&mut self, _label: &str) {
        self.done += 1;
        if self.total > 0 && self.done % 50 == 0 {
            info!("{}: {}/{}", self.stage, self.done, self.total);
        }
    }
    fn item_failed(&mut self, _label: &str, _reason: &str) {
        self.failed += 1;
    }
    fn finish(&mut self) {
        if self.total == 0 {
            info!("{}: complete ({} done)", self.stage, self.done);
        } else {
            info!("{}: complete ({}/{}, {} failed)", self.stage, self.done, self.total, self.failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_done_and_failed_per_stage() {
        let mut p = LogProgress::new();
        p.begin("profiles", 3);
        p.item_done("a");
        p.item_failed("b", "timeout loading b");
        p.item_done("c");
        assert_eq!((p.done, p.failed, p.total), (2, 1, 3));

        p.begin("search", 0);
        assert_eq!((p.done, p.failed), (0, 0));
    }
}
