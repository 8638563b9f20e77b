//! Observation of scan progress.
//!
//! The local similarity scan can take a long time on a whole-brain volume.
//! Callers who wish to follow it inject a [`ProgressSink`], which is told
//! how many windows were processed out of the total. Reporting is purely
//! observational and has no effect on the result.
//!
//! [`ProgressSink`]: ./trait.ProgressSink.html
use indicatif::{ProgressBar, ProgressStyle};

/// Receiver of `(windows done, windows total)` updates. Updates arrive in
/// non-decreasing order of `done`, possibly from a worker thread.
pub trait ProgressSink: Sync {
    /// Record that `done` out of `total` windows were processed.
    fn update(&self, done: u64, total: u64);
}

/// A sink which ignores all updates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _done: u64, _total: u64) {}
}

impl<F> ProgressSink for F
where
    F: Fn(u64, u64) + Sync,
{
    fn update(&self, done: u64, total: u64) {
        self(done, total)
    }
}

/// A sink drawing a terminal progress bar.
#[derive(Debug, Clone)]
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Create a bar drawn to standard error.
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(
            "{prefix} [{bar:40.cyan/blue}] {percent:>3}% {pos}/{len} windows [{elapsed_precise}<{eta_precise}]",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix("local");
        BarProgress { bar }
    }

    /// Wrap an existing bar.
    pub fn with_bar(bar: ProgressBar) -> Self {
        BarProgress { bar }
    }

    /// The underlying bar.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        BarProgress::new()
    }
}

impl ProgressSink for BarProgress {
    fn update(&self, done: u64, total: u64) {
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        self.bar.set_position(done);
        if done >= total {
            self.bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BarProgress, NoProgress, ProgressSink};
    use indicatif::{ProgressBar, ProgressDrawTarget};
    use std::sync::Mutex;

    #[test]
    fn closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |done: u64, total: u64| seen.lock().unwrap().push((done, total));
        sink.update(1, 4);
        sink.update(4, 4);
        NoProgress.update(4, 4);
        assert_eq!(*seen.lock().unwrap(), vec![(1, 4), (4, 4)]);
    }

    #[test]
    fn bar_sink() {
        let sink = BarProgress::with_bar(ProgressBar::with_draw_target(
            Some(0),
            ProgressDrawTarget::hidden(),
        ));
        sink.update(3, 10);
        assert_eq!(sink.bar().length(), Some(10));
        assert_eq!(sink.bar().position(), 3);
        sink.update(10, 10);
        assert!(sink.bar().is_finished());
    }
}
