//! Document sources
//!
//! A source turns an input file into per-page text for detection and, for
//! PDFs, re-serializes page ranges into standalone documents.

use crate::error::{EngineError, Result};
use csrsplit_core::{Page, PageRange};
use lopdf::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Page separator in `pdftotext` output
const FORM_FEED: char = '\u{c}';

/// Text of every page plus the pages that failed to extract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPages {
    /// One entry per source page, in order, 1-indexed
    pub pages: Vec<Page>,
    /// Pages whose text extraction failed; their text is empty
    pub unreadable: Vec<u32>,
}

impl ExtractedPages {
    /// True when no page carries any text
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Produces per-page plain text
pub trait PageTextSource {
    /// File name reported in the manifest
    fn name(&self) -> &str;

    /// Number of pages in the source
    fn page_count(&self) -> u32;

    /// Extract the text of every page in order
    fn extract_pages(&self) -> Result<ExtractedPages>;
}

/// Writes a page range of the source as a standalone PDF
pub trait PageRenderer: Send + Sync {
    /// Render `range` to `dest`
    fn render_range(&self, range: PageRange, dest: &Path) -> Result<()>;
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// PDF input backed by `lopdf`
#[derive(Debug)]
pub struct PdfSource {
    path: PathBuf,
    name: String,
    document: Document,
}

impl PdfSource {
    /// Parse a PDF file
    pub fn open(path: &Path) -> Result<Self> {
        let document = Document::load(path).map_err(|e| EngineError::Pdf {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let source = Self::from_document(path, document);
        if source.page_count() == 0 {
            return Err(EngineError::NoExtractablePages(path.to_path_buf()));
        }
        log::info!("loaded {} ({} pages)", source.name, source.page_count());
        Ok(source)
    }

    /// Wrap an already parsed document
    pub fn from_document(path: &Path, document: Document) -> Self {
        Self {
            path: path.to_path_buf(),
            name: file_name(path),
            document,
        }
    }

    /// Path the document was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn page_text(&self, number: u32) -> Option<String> {
        match self.document.extract_text(&[number]) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("text extraction failed on page {number}: {e}");
                None
            }
        }
    }
}

impl PageTextSource for PdfSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn extract_pages(&self) -> Result<ExtractedPages> {
        let numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();

        #[cfg(feature = "parallel")]
        let texts: Vec<Option<String>> = {
            use rayon::prelude::*;
            numbers.par_iter().map(|&n| self.page_text(n)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let texts: Vec<Option<String>> = numbers.iter().map(|&n| self.page_text(n)).collect();

        let mut extracted = ExtractedPages::default();
        for (index, text) in texts.into_iter().enumerate() {
            let number = index as u32 + 1;
            if text.is_none() {
                extracted.unreadable.push(number);
            }
            extracted
                .pages
                .push(Page::new(number, text.unwrap_or_default()));
        }
        Ok(extracted)
    }
}

impl PageRenderer for PdfSource {
    fn render_range(&self, range: PageRange, dest: &Path) -> Result<()> {
        let render_error = |reason: String| EngineError::Render {
            file: dest.display().to_string(),
            reason,
        };

        let mut document = self.document.clone();
        let outside: Vec<u32> = document
            .get_pages()
            .keys()
            .copied()
            .filter(|&n| !range.contains(n))
            .collect();
        if outside.len() == document.get_pages().len() {
            return Err(render_error(format!("no pages in range {range}")));
        }

        document.delete_pages(&outside);
        document.prune_objects();
        document
            .save(dest)
            .map_err(|e| render_error(e.to_string()))?;
        log::debug!("rendered pages {range} to {}", dest.display());
        Ok(())
    }
}

/// Pre-extracted text where pages are separated by form feeds
///
/// This is the layout `pdftotext` produces. Text sources support detection
/// and dry runs; they cannot be rendered.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    pages: Vec<String>,
}

impl TextSource {
    /// Read a text dump
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_text(file_name(path), &content))
    }

    /// Split already loaded text into pages
    pub fn from_text(name: impl Into<String>, content: &str) -> Self {
        let content = content.strip_suffix(FORM_FEED).unwrap_or(content);
        let pages = if content.is_empty() {
            Vec::new()
        } else {
            content.split(FORM_FEED).map(str::to_string).collect()
        };
        Self {
            name: name.into(),
            pages,
        }
    }
}

impl PageTextSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_pages(&self) -> Result<ExtractedPages> {
        Ok(ExtractedPages {
            pages: self
                .pages
                .iter()
                .enumerate()
                .map(|(i, text)| Page::new(i as u32 + 1, text.as_str()))
                .collect(),
            unreadable: Vec::new(),
        })
    }
}

/// An opened input document
#[derive(Debug)]
pub enum SourceDocument {
    /// Renderable PDF
    Pdf(PdfSource),
    /// Text dump, detection only
    Text(TextSource),
}

impl SourceDocument {
    /// Open a PDF or a form-feed separated text file
    ///
    /// `.txt` files are read as text; anything else must start with the PDF
    /// header.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EngineError::InputNotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(EngineError::UnsupportedInput {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        if extension.as_deref() == Some("txt") {
            return Ok(SourceDocument::Text(TextSource::open(path)?));
        }

        let mut header = [0u8; 5];
        let is_pdf = {
            use std::io::Read;
            let mut file = fs::File::open(path)?;
            file.read_exact(&mut header).is_ok() && &header == b"%PDF-"
        };
        if !is_pdf {
            return Err(EngineError::UnsupportedInput {
                path: path.to_path_buf(),
                reason: "missing %PDF- header".to_string(),
            });
        }
        Ok(SourceDocument::Pdf(PdfSource::open(path)?))
    }

    /// The text side of the source
    pub fn text_source(&self) -> &dyn PageTextSource {
        match self {
            SourceDocument::Pdf(pdf) => pdf,
            SourceDocument::Text(text) => text,
        }
    }

    /// The rendering side, PDFs only
    pub fn renderer(&self) -> Option<&dyn PageRenderer> {
        match self {
            SourceDocument::Pdf(pdf) => Some(pdf),
            SourceDocument::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with_suffix(suffix: &str) -> NamedTempFile {
        Builder::new().suffix(suffix).tempfile().unwrap()
    }

    #[test]
    fn test_text_source_splits_on_form_feed() {
        let source = TextSource::from_text("csr.txt", "page one\u{c}page two\u{c}");
        assert_eq!(source.page_count(), 2);
        let extracted = source.extract_pages().unwrap();
        assert_eq!(extracted.pages[1], Page::new(2, "page two"));
        assert!(extracted.unreadable.is_empty());
    }

    #[test]
    fn test_text_source_without_form_feed_is_one_page() {
        let source = TextSource::from_text("notes.txt", "just one page\n");
        assert_eq!(source.page_count(), 1);
    }

    #[test]
    fn test_empty_text_has_no_pages() {
        let source = TextSource::from_text("empty.txt", "");
        assert_eq!(source.page_count(), 0);
        assert!(source.extract_pages().unwrap().is_blank());
    }

    #[test]
    fn test_missing_input() {
        let err = SourceDocument::open(Path::new("/nonexistent/csr.pdf")).unwrap_err();
        assert!(matches!(err, EngineError::InputNotFound(_)));
    }

    #[test]
    fn test_non_pdf_rejected() {
        let mut file = temp_with_suffix(".pdf");
        file.write_all(b"hello, not a pdf").unwrap();
        let err = SourceDocument::open(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedInput { .. }));
    }

    #[test]
    fn test_text_input_is_not_renderable() {
        let mut file = temp_with_suffix(".txt");
        file.write_all(b"Synopsis\x0cTable 14-1.01\nDemographics").unwrap();
        let source = SourceDocument::open(file.path()).unwrap();
        assert!(source.renderer().is_none());
        assert_eq!(source.text_source().page_count(), 2);
    }
}
