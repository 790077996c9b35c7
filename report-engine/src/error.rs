//! FILENAME: report-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabulateError {
    #[error("record is missing the '{column}' column")]
    MissingColumn { column: String },
}

impl TabulateError {
    pub fn missing(column: &str) -> Self {
        TabulateError::MissingColumn {
            column: column.to_string(),
        }
    }
}
