//! Manifest persistence: `manifest.json` and the flattened `manifest.csv`

use crate::error::{EngineError, Result};
use csrsplit_core::naming::NARRATIVE_STEM;
use csrsplit_core::Manifest;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the JSON manifest inside an output directory
pub const MANIFEST_JSON: &str = "manifest.json";

/// Name of the CSV manifest inside an output directory
pub const MANIFEST_CSV: &str = "manifest.csv";

/// One row of `manifest.csv`; field order is the column order
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    title: &'a str,
    file: &'a str,
    pages_in_source_start: u32,
    pages_in_source_end: u32,
    page_count: u32,
    population: &'a str,
    source_program: &'a str,
}

/// Current UTC time in the manifest's timestamp format
pub fn extraction_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Write `manifest.json` into `dir`
pub fn write_json(manifest: &Manifest, dir: &Path, pretty: bool) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_JSON);
    let mut file = fs::File::create(&path)?;
    if pretty {
        serde_json::to_writer_pretty(&mut file, manifest)?;
    } else {
        serde_json::to_writer(&mut file, manifest)?;
    }
    writeln!(file)?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

/// Write `manifest.csv` into `dir`, narrative row first
pub fn write_csv(manifest: &Manifest, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_CSV);
    let mut writer = csv::Writer::from_path(&path)?;

    if let Some(narrative) = &manifest.narrative {
        writer.serialize(CsvRow {
            id: NARRATIVE_STEM,
            kind: "narrative",
            title: "",
            file: &narrative.file,
            pages_in_source_start: narrative.pages_in_source.start,
            pages_in_source_end: narrative.pages_in_source.end,
            page_count: narrative.page_count,
            population: "",
            source_program: "",
        })?;
    }

    for tfl in &manifest.tlfs {
        writer.serialize(CsvRow {
            id: &tfl.id,
            kind: tfl.kind.as_str(),
            title: &tfl.title,
            file: &tfl.file,
            pages_in_source_start: tfl.pages_in_source.start,
            pages_in_source_end: tfl.pages_in_source.end,
            page_count: tfl.page_count,
            population: &tfl.population,
            source_program: tfl.source_program.as_deref().unwrap_or_default(),
        })?;
    }

    writer.flush()?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

/// Load `manifest.json` from an output directory
pub fn read_manifest(dir: &Path) -> Result<Manifest> {
    let path = dir.join(MANIFEST_JSON);
    if !path.is_file() {
        return Err(EngineError::ManifestMissing(dir.to_path_buf()));
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}
