//! SQLite persistence for tasks.

mod model;
mod repository;

pub use model::{TaskChangesDB, TaskDB};
pub use repository::TaskRepository;
