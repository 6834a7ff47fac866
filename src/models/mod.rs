pub mod category;
pub mod checklist;
pub mod record;

pub use category::Category;
pub use checklist::{
    ChecklistCache, ChecklistDocument, StandardItemSet, DERIVED_BULLET, REFERENCE_HEADER_PREFIX,
    SECTION_HEADER_PREFIX, STANDARD_BULLET,
};
pub use record::{IncidentDataset, IncidentRecord};
