//! SQLite backend for the placement portal's student store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each student is stored as a JSON
//! document alongside a handful of extracted columns used for matching,
//! filtering and sorting.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
