//! Deterministic output file names

use std::collections::HashSet;

/// Stem of the narrative body files
pub const NARRATIVE_STEM: &str = "narrative_body";

/// Subdirectory holding rendered PDFs
pub const PDF_DIR: &str = "pdf";

/// Subdirectory holding raw text dumps
pub const TEXT_DIR: &str = "text";

/// Replace every character that is not ASCII alphanumeric with `_`
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Relative path of the rendered PDF for a stem
pub fn pdf_path(stem: &str) -> String {
    format!("{PDF_DIR}/{stem}.pdf")
}

/// Relative path of the raw text dump for a stem
pub fn text_path(stem: &str) -> String {
    format!("{TEXT_DIR}/{stem}.txt")
}

/// Recover the stem from a manifest `file` entry
pub fn stem_of(file: &str) -> &str {
    let name = file.rsplit('/').next().unwrap_or(file);
    name.strip_suffix(".pdf").unwrap_or(name)
}

/// Hands out unique stems in order of appearance
///
/// The first occurrence of an id gets the plain sanitized stem, later ones
/// `_2`, `_3` and so on. The same sequence of ids always yields the same
/// stems.
#[derive(Debug)]
pub struct FileNamer {
    issued: HashSet<String>,
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl FileNamer {
    pub fn new() -> Self {
        let mut issued = HashSet::new();
        issued.insert(NARRATIVE_STEM.to_string());
        Self { issued }
    }

    /// Unique stem for `id`
    pub fn stem_for(&mut self, id: &str) -> String {
        let base = sanitize_id(id);
        let mut candidate = base.clone();
        let mut n = 1;
        while self.issued.contains(&candidate) {
            n += 1;
            candidate = format!("{base}_{n}");
        }
        self.issued.insert(candidate.clone());
        candidate
    }
}
