//! SQLite persistence for repetitive task templates.

mod model;
mod repository;

pub use model::{RepetitiveTaskTemplateChangesDB, RepetitiveTaskTemplateDB};
pub use repository::RepetitiveTaskTemplateRepository;
