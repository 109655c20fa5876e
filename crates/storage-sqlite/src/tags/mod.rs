//! SQLite persistence for tags.

mod model;
mod repository;

pub use model::{TagChangesDB, TagDB};
pub use repository::TagRepository;
