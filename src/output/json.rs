//! JSON result document
//!
//! The whole collection is written once, at the end of a run, as a UTF-8
//! array indented with four spaces. The document is staged next to its final
//! path and renamed into place, so an interrupted write never leaves a
//! truncated file where the previous results were.

use crate::record::{EnrichedRecord, ResultCollection};
use crate::HarvestError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the records to `path`, replacing any existing file
pub fn write_results(path: &Path, records: &[EnrichedRecord]) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    {
        let mut writer = BufWriter::new(File::create(&staging)?);
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        records.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    fs::rename(&staging, path)?;

    tracing::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a result document written by [`write_results`]
pub fn read_results(path: &Path) -> Result<ResultCollection, HarvestError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
