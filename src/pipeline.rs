use thiserror::Error;
use tracing::{debug, warn};

use crate::heuristics::{ClassifierConfig, ExtractorConfig};
use crate::models::{ChecklistCache, IncidentDataset, IncidentRecord, StandardItemSet};
use crate::stages::{
    build_checklists, decode_lossy, is_garbled, parse_report, sanitize, BuildResult,
    NormalizerConfig, ParserConfig,
};

/// All pipeline configuration, loaded once at startup and shared by value.
///
/// The keyword, noise, and standard-item tables are never mutated after
/// construction, which keeps classification and extraction deterministic
/// across calls.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub normalizer: NormalizerConfig,
    pub classifier: ClassifierConfig,
    pub extractor: ExtractorConfig,
    pub parser: ParserConfig,
    pub standard_items: StandardItemSet,
    /// Sanitized documents at or below this many characters are rejected
    pub min_document_chars: usize,
}

/// A raw document handed over by a fetch or upload collaborator
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Source identifier (URL, file path, upload name)
    pub source: String,
    /// Department label to stamp on the parsed record
    pub department: String,
    /// Raw document bytes, possibly with invalid sequences
    pub bytes: Vec<u8>,
}

/// Why a single document was skipped. Always recovered inside the batch
/// loop; the batch itself never fails.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("document bytes could not be decoded into usable text")]
    Decode,
    #[error("document text is too short after sanitizing ({chars} chars)")]
    TooShort { chars: usize },
    #[error("document text looks garbled")]
    Garbled,
}

/// Outcome counts for one ingest batch, the pipeline's only external
/// failure signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Documents handed to the pipeline
    pub attempted: usize,
    /// Documents parsed and appended to the dataset
    pub accepted: usize,
    /// Documents skipped as unreadable, too short, or garbled
    pub skipped: usize,
}

/// Ingest one document: decode, sanitize, quality-gate, parse
pub fn ingest_document(
    document: &RawDocument,
    config: &PipelineConfig,
) -> Result<IncidentRecord, IngestError> {
    let raw = decode_lossy(&document.bytes);
    if raw.trim().is_empty() {
        return Err(IngestError::Decode);
    }

    let text = sanitize(&raw, &config.normalizer);
    let chars = text.chars().count();
    if chars <= config.min_document_chars {
        return Err(IngestError::TooShort { chars });
    }
    if is_garbled(&text, &config.normalizer) {
        return Err(IngestError::Garbled);
    }

    Ok(parse_report(
        &text,
        &document.source,
        &document.department,
        &config.parser,
        &config.classifier,
    ))
}

/// Ingest a batch of documents, appending accepted records to the dataset.
///
/// Documents are processed independently: a failure skips that document and
/// the batch continues. Existing records are never touched.
pub fn ingest_batch(
    dataset: &mut IncidentDataset,
    documents: &[RawDocument],
    config: &PipelineConfig,
) -> IngestSummary {
    let mut summary = IngestSummary::default();

    for document in documents {
        summary.attempted += 1;
        match ingest_document(document, config) {
            Ok(record) => {
                debug!(source = %document.source, description = %record.description, "accepted document");
                dataset.append(record);
                summary.accepted += 1;
            }
            Err(err) => {
                warn!(source = %document.source, %err, "skipping document");
                summary.skipped += 1;
            }
        }
    }

    summary
}

/// Rebuild the checklist document for the dataset, reusing the cache when it
/// already holds a document for this dataset version.
pub fn rebuild_checklists(
    dataset: &IncidentDataset,
    cache: &mut ChecklistCache,
    config: &PipelineConfig,
) -> BuildResult {
    if let Some(document) = cache.document_for(dataset.version) {
        debug!(version = dataset.version, "checklist cache hit");
        return BuildResult {
            document: document.clone(),
            total_records: dataset.len(),
            accepted_records: dataset
                .records()
                .iter()
                .filter(|r| !is_garbled(&r.description, &config.normalizer))
                .count(),
        };
    }

    let result = build_checklists(dataset.records(), config);
    cache.store(dataset.version, result.document.clone());
    result
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            classifier: ClassifierConfig::default(),
            extractor: ExtractorConfig::default(),
            parser: ParserConfig::default(),
            standard_items: StandardItemSet::default(),
            min_document_chars: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    fn document(text: &str) -> RawDocument {
        RawDocument {
            source: "upload.pdf".to_string(),
            department: "PDF解析".to_string(),
            bytes: text.as_bytes().to_vec(),
        }
    }

    const REPORT: &str = "概要輸血のポンピング中に製剤の有効期限切れに気づかず準備を進めてしまった事例である \
                          原因繁忙による思い込み 対策有効期限を二重に照合する。";

    #[test]
    fn test_ingest_accepts_valid_report() {
        let record = ingest_document(&document(REPORT), &config()).unwrap();
        assert!(record.description.starts_with("輸血のポンピング中に"));
        assert!(record.prevention.contains("二重に照合する"));
        assert_eq!(record.department, "PDF解析");
    }

    #[test]
    fn test_ingest_rejects_short_document() {
        let err = ingest_document(&document("概要短い報告"), &config()).unwrap_err();
        assert!(matches!(err, IngestError::TooShort { .. }));
    }

    #[test]
    fn test_ingest_rejects_empty_bytes() {
        let err = ingest_document(&document("   "), &config()).unwrap_err();
        assert!(matches!(err, IngestError::Decode));
    }

    #[test]
    fn test_batch_continues_after_failures() {
        let mut dataset = IncidentDataset::default();
        let documents = vec![document("短すぎる"), document(REPORT), document("")];

        let summary = ingest_batch(&mut dataset, &documents, &config());

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.version, 1);
    }

    #[test]
    fn test_rebuild_uses_cache_until_version_changes() {
        let mut dataset = IncidentDataset::default();
        let mut cache = ChecklistCache::default();
        let config = config();

        ingest_batch(&mut dataset, &[document(REPORT)], &config);
        let first = rebuild_checklists(&dataset, &mut cache, &config);
        assert!(cache.document_for(dataset.version).is_some());

        // Same version: served from cache, identical output
        let cached = rebuild_checklists(&dataset, &mut cache, &config);
        assert_eq!(first.document, cached.document);

        // New record invalidates the cached version
        ingest_batch(&mut dataset, &[document(REPORT)], &config);
        assert!(cache.document_for(dataset.version).is_none());
        let rebuilt = rebuild_checklists(&dataset, &mut cache, &config);
        assert_eq!(rebuilt.total_records, 2);
    }
}
