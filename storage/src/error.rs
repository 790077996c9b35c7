//! FILENAME: storage/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQL error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("column '{column}' holds a value that cannot cross the boundary as text")]
    UnsupportedValue { column: String },
}
