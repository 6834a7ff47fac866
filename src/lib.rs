pub mod heuristics;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use heuristics::{classify_procedure, extract_action_items, ClassifierConfig, ExtractorConfig};
pub use io::{load_dataset, read_document, save_checklists, save_dataset};
pub use models::{
    Category, ChecklistCache, ChecklistDocument, IncidentDataset, IncidentRecord, StandardItemSet,
};
pub use pipeline::{
    ingest_batch, ingest_document, rebuild_checklists, IngestError, IngestSummary, PipelineConfig,
    RawDocument,
};
pub use stages::{
    build_checklists, decode_lossy, is_garbled, parse_report, sanitize, strip_noise, BuildResult,
    NormalizerConfig, ParserConfig,
};
