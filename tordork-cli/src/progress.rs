//! Terminal progress display

use indicatif::{ProgressBar, ProgressStyle};
use tordork_core::query_preview;
use tordork_runtime::{DispatchReport, ProgressReporter, QueryReport};

/// Progress bar with one status line per finished query
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("Processing: {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Status line printed for a finished query
pub fn status_line(report: &QueryReport) -> String {
    let query = query_preview(report.query());
    match report {
        QueryReport::Finished(_) if report.succeeded() => {
            format!("✔️ {} links found for: {}", report.link_count(), query)
        }
        QueryReport::Finished(_) => format!("❌ No results for: {}", query),
        QueryReport::Faulted { error, .. } => {
            format!("⚠️ Unexpected error for: {} ({})", query, error)
        }
    }
}

impl ProgressReporter for BarProgress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_query_finished(&self, report: &QueryReport, completed: usize, _total: usize) {
        self.bar.println(status_line(report));
        self.bar.set_position(completed as u64);
    }

    fn on_finish(&self, _report: &DispatchReport) {
        self.bar.finish();
    }
}
