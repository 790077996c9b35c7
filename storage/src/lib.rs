//! FILENAME: storage/src/lib.rs
//! SQLite-backed execution of composed report statements.
//!
//! The engine crates never touch a database; this crate owns the one
//! suspension point of a report request. It executes a [`BoundQuery`]
//! inside a read-only transaction, binds its named parameters, and converts
//! every result row into the flat string records the pivot engine consumes.
//! Errors pass through verbatim - no retry, no recovery.

pub mod error;
pub mod reader;
pub mod fixtures;

pub use error::StorageError;
pub use reader::{Reader, SqliteReader};
