pub mod classify;
pub mod extract;

pub use classify::{classify_procedure, ClassifierConfig};
pub use extract::{extract_action_items, ExtractorConfig};
