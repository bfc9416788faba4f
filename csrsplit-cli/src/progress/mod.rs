//! Progress reporting module

use csrsplit_core::OutputFile;
use csrsplit_engine::RunObserver;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::OnceLock;
use std::time::Duration;

/// Progress bar over rendered output files
pub struct ProgressReporter {
    progress_bar: OnceLock<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: OnceLock::new(),
            quiet,
        }
    }

    /// Initialize progress bar for file rendering
    pub fn init_files(&self, total_files: u64) {
        if self.quiet {
            return;
        }

        self.progress_bar.get_or_init(|| {
            let pb = ProgressBar::new(total_files);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
            {
                pb.set_style(style.progress_chars("##-"));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
    }

    /// Update progress for a completed file
    pub fn file_completed(&self, filename: &str) {
        if let Some(pb) = self.progress_bar.get() {
            pb.set_message(format!("Rendered: {filename}"));
            pb.inc(1);
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = self.progress_bar.get() {
            pb.finish_with_message("Complete");
        }
    }
}

impl RunObserver for ProgressReporter {
    fn files_planned(&self, count: usize) {
        self.init_files(count as u64);
    }

    fn file_written(&self, file: &OutputFile) {
        self.file_completed(&file.pdf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_has_no_bar() {
        let reporter = ProgressReporter::new(true);
        reporter.files_planned(3);
        reporter.file_completed("pdf/narrative_body.pdf");
        reporter.finish();
        assert!(reporter.progress_bar.get().is_none());
    }

    #[test]
    fn test_bar_counts_files() {
        let reporter = ProgressReporter::new(false);
        reporter.init_files(2);
        reporter.file_completed("pdf/Table_14_1_01.pdf");
        assert_eq!(reporter.progress_bar.get().map(|pb| pb.position()), Some(1));
        reporter.finish();
    }
}
