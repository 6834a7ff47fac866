use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{ChecklistDocument, IncidentDataset};

/// Persist the dataset as pretty JSON, atomically
pub fn save_dataset(path: &Path, dataset: &IncidentDataset) -> Result<()> {
    write_json_atomic(path, dataset)
}

/// Persist the checklist document as pretty JSON, atomically
pub fn save_checklists(path: &Path, document: &ChecklistDocument) -> Result<()> {
    write_json_atomic(path, document)
}

/// Write JSON to a staging file in the target directory, then rename over
/// the destination. A reader never observes a partially written file.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create staging file in {:?}", dir))?;
    serde_json::to_writer_pretty(&mut staging, value).context("Failed to serialize JSON")?;
    staging.flush().context("Failed to flush staging file")?;
    staging
        .persist(path)
        .with_context(|| format!("Failed to replace {:?}", path))?;
    Ok(())
}
