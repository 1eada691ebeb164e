//! Core types for the placement portal: the student record, its schema
//! rules, the [`store::StudentStore`] trait and the import result shape.
//!
//! No HTTP or database code lives here; every other crate builds on it.

pub mod error;
pub mod import;
pub mod schema;
pub mod store;
pub mod student;

pub use error::{Error, Result};
