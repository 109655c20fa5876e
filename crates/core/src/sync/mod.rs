//! Sync domain: cursor handling and the changelog-driven sync resolver.

mod sync_model;
mod sync_service;

pub use sync_model::*;
pub use sync_service::*;

#[cfg(test)]
mod tests;
