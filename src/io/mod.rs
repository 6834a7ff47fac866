pub mod input;
pub mod output;

pub use input::{load_dataset, read_document};
pub use output::{save_checklists, save_dataset};
