//! Output rendering
//!
//! Segment boundaries are fixed before anything is written, so every output
//! file is an independent job: it reads a disjoint page range and writes a
//! disjoint file. Jobs run on a dedicated rayon pool and the first failure
//! aborts the run.

use crate::error::{EngineError, Result};
use crate::source::PageRenderer;
use csrsplit_core::naming::{PDF_DIR, TEXT_DIR};
use csrsplit_core::{OutputFile, Page, PageRange};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Counts of files written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Rendered PDFs
    pub pdf_files: usize,
    /// Raw text dumps
    pub text_files: usize,
}

/// Writes rendered PDFs and raw text files under an output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    threads: usize,
    write_text: bool,
}

impl OutputWriter {
    /// Writer rooted at `output_dir`, one worker per CPU, text dumps on
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            threads: num_cpus::get(),
            write_text: true,
        }
    }

    /// Worker count, at least one
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Enable or disable raw text dumps
    pub fn write_text(mut self, enabled: bool) -> Self {
        self.write_text = enabled;
        self
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory layout
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.output_dir.join(PDF_DIR))?;
        if self.write_text {
            fs::create_dir_all(self.output_dir.join(TEXT_DIR))?;
        }
        Ok(())
    }

    /// Render every file, calling `on_done` after each one completes
    pub fn write_all(
        &self,
        files: &[OutputFile],
        pages: &[Page],
        renderer: &dyn PageRenderer,
        on_done: &(dyn Fn(&OutputFile) + Sync),
    ) -> Result<WriteSummary> {
        self.prepare()?;
        log::info!(
            "rendering {} files with {} threads",
            files.len(),
            self.threads
        );

        let job = |file: &OutputFile| -> Result<()> {
            self.write_one(file, pages, renderer)?;
            on_done(file);
            Ok(())
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
            pool.install(|| files.par_iter().map(job).collect::<Result<Vec<_>>>())?;
        }
        #[cfg(not(feature = "parallel"))]
        files.iter().map(job).collect::<Result<Vec<_>>>()?;

        Ok(WriteSummary {
            pdf_files: files.len(),
            text_files: if self.write_text { files.len() } else { 0 },
        })
    }

    fn write_one(&self, file: &OutputFile, pages: &[Page], renderer: &dyn PageRenderer) -> Result<()> {
        renderer.render_range(file.pages, &self.output_dir.join(&file.pdf))?;
        if self.write_text {
            let path = self.output_dir.join(&file.text);
            fs::write(&path, segment_text(pages, file.pages)).map_err(|e| EngineError::Render {
                file: file.text.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Text of a page range with `--- Page k ---` separators between pages
///
/// `k` is the position of the following page within the range, starting
/// at 2.
pub fn segment_text(pages: &[Page], range: PageRange) -> String {
    let mut out = String::new();
    for (offset, number) in range.pages().enumerate() {
        if offset > 0 {
            out.push_str(&format!("\n--- Page {} ---\n", offset + 1));
        }
        if let Some(page) = number.checked_sub(1).and_then(|i| pages.get(i as usize)) {
            out.push_str(&page.text);
        }
    }
    out
}
