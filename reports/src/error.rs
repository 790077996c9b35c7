//! FILENAME: reports/src/error.rs

use report_engine::TabulateError;
use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("tabulation error: {0}")]
    Tabulate(#[from] TabulateError),

    #[error("invalid date: {0}")]
    InvalidDate(#[from] chrono::ParseError),
}
