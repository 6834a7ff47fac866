use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::IncidentDataset;

/// Load the stored dataset, treating corruption as an empty dataset.
///
/// A missing file is the normal first-run state. Unreadable or unparsable
/// backing data is discarded rather than merged, so a corrupt file can never
/// poison newly ingested records.
pub fn load_dataset(path: &Path) -> IncidentDataset {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return IncidentDataset::default();
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read dataset, starting empty");
            return IncidentDataset::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(dataset) => dataset,
        Err(err) => {
            warn!(path = %path.display(), %err, "dataset is corrupt, starting empty");
            IncidentDataset::default()
        }
    }
}

/// Read one raw document for ingestion
pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read document: {:?}", path))
}
