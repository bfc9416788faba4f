//! Validation of an existing output directory
//!
//! Loads `manifest.json`, runs the manifest checks from `csrsplit-core`, then
//! inspects every referenced PDF. Nothing on disk is modified.

use crate::error::Result;
use crate::manifest_io::read_manifest;
use csrsplit_core::{check_manifest, Check, Manifest, ValidationReport, Violation};
use std::fs;
use std::path::Path;

/// Run every check against `dir`
///
/// A missing or unparsable manifest is an error; everything else is reported
/// as a [`Violation`].
pub fn validate_output_dir(dir: &Path) -> Result<ValidationReport> {
    let manifest = read_manifest(dir)?;
    log::info!(
        "validating {} ({} TFLs)",
        dir.display(),
        manifest.tlfs.len()
    );

    let mut violations = check_manifest(&manifest);
    violations.extend(check_files(&manifest, dir));
    Ok(ValidationReport::new(&Check::ALL, violations))
}

fn check_files(manifest: &Manifest, dir: &Path) -> Vec<Violation> {
    let referenced = manifest
        .narrative
        .iter()
        .map(|n| (n.file.as_str(), n.page_count))
        .chain(manifest.tlfs.iter().map(|t| (t.file.as_str(), t.page_count)));

    let mut violations = Vec::new();
    for (file, expected) in referenced {
        let path = dir.join(file);
        let size = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                violations.push(Violation::MissingFile {
                    file: file.to_string(),
                });
                continue;
            }
        };
        if size == 0 {
            violations.push(Violation::EmptyFile {
                file: file.to_string(),
            });
            continue;
        }

        match lopdf::Document::load(&path) {
            Ok(document) => {
                let actual = document.get_pages().len() as u32;
                if actual != expected {
                    violations.push(Violation::RenderedPageCount {
                        file: file.to_string(),
                        expected,
                        actual,
                    });
                }
            }
            Err(e) => violations.push(Violation::UnreadablePdf {
                file: file.to_string(),
                reason: e.to_string(),
            }),
        }
    }
    violations
}
