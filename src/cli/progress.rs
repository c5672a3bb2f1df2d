//! Terminal progress displays built on indicatif

use std::sync::Arc;
use std::time::Duration;

use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::application::ports::{NoopUploadProgress, UploadProgress};
use crate::application::BatchObserver;
use crate::domain::batch::{BatchCounters, FileFailure, FilePair};

const TICK: Duration = Duration::from_millis(80);

fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {msg:<24!} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉░")
}

fn percent_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg:<24!} [{bar:30.green/blue}] {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉░")
}

fn summary_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} [{bar:30.green/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉░")
}

/// Byte-level upload bar
pub struct UploadBar {
    bar: ProgressBar,
}

impl UploadBar {
    /// Bar drawn on its own line on stderr
    pub fn new(label: &str) -> Self {
        Self::attached(ProgressBar::new(0), label)
    }

    fn attached(bar: ProgressBar, label: &str) -> Self {
        bar.set_style(bytes_style());
        bar.set_message(format!("↑ {}", label));
        Self { bar }
    }
}

impl UploadProgress for UploadBar {
    fn start(&self, total_bytes: u64) {
        self.bar.set_length(total_bytes);
        self.bar.set_position(0);
        self.bar.enable_steady_tick(TICK);
    }

    fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for UploadBar {
    fn drop(&mut self) {
        // Failed uploads never call finish
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Percentage bar for a remote job; hidden until the job exists
#[derive(Clone)]
pub struct ProcessingBar {
    bar: ProgressBar,
}

impl ProcessingBar {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::hidden());
        bar.set_style(percent_style());
        bar.set_message(format!("⚙ {}", label));
        Self { bar }
    }

    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(TICK);
    }

    pub fn set_percent(&self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Live display for a batch: one summary line, optional per-file upload
/// bars, and failures printed above the bars as they happen.
pub struct BatchProgressDisplay {
    multi: MultiProgress,
    summary: ProgressBar,
    show_uploads: bool,
}

impl BatchProgressDisplay {
    /// The length is set by the first count update
    pub fn new(show_uploads: bool) -> Self {
        Self::with_target(ProgressDrawTarget::stderr(), show_uploads)
    }

    fn with_target(target: ProgressDrawTarget, show_uploads: bool) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let summary = multi.add(ProgressBar::new(0));
        summary.set_style(summary_style());
        summary.enable_steady_tick(TICK);
        Self {
            multi,
            summary,
            show_uploads,
        }
    }

    /// Clear the live lines
    pub fn finish(&self) {
        self.summary.finish_and_clear();
        self.multi.clear().ok();
    }
}

/// Status line for the current counts
pub fn counts_message(counters: &BatchCounters) -> String {
    let mut message = format!(
        "uploading {} · processing {} · done {}",
        counters.uploading, counters.processing, counters.completed
    );
    if counters.failed > 0 {
        message.push_str(&format!(" · {}", format!("failed {}", counters.failed).red()));
    }
    message
}

impl BatchObserver for BatchProgressDisplay {
    fn on_counts(&self, counters: &BatchCounters, total: usize) {
        self.summary.set_length(total as u64);
        self.summary.set_position(counters.finished() as u64);
        self.summary.set_message(counts_message(counters));
    }

    fn on_completed(&self, pair: &FilePair) {
        if self.show_uploads {
            self.multi
                .println(format!(
                    "{} {} → {}",
                    "✓".green(),
                    pair.display_name(),
                    pair.output().display()
                ))
                .ok();
        }
    }

    fn on_failure(&self, failure: &FileFailure) {
        self.multi
            .println(format!(
                "{} {} ({}): {}",
                "✗".red(),
                failure.file_name(),
                failure.stage,
                failure.message
            ))
            .ok();
    }

    fn upload_progress(&self, pair: &FilePair) -> Arc<dyn UploadProgress> {
        if !self.show_uploads {
            return Arc::new(NoopUploadProgress);
        }
        let bar = self.multi.insert_before(&self.summary, ProgressBar::new(0));
        Arc::new(UploadBar::attached(bar, &pair.display_name()))
    }
}
