//! SQLite persistence for the per-user changelog.

mod model;
mod repository;

pub use model::ChangeRecordDB;
pub use repository::{append_change, ChangeLogRepository, ChangeWriteRequest};
