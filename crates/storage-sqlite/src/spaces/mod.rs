//! SQLite persistence for spaces.

mod model;
mod repository;

pub use model::{SpaceChangesDB, SpaceDB};
pub use repository::SpaceRepository;
