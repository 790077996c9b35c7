//! FILENAME: reports/src/lib.rs
//! Report services - the seam between options, storage and the pivot engine.
//!
//! A service call owns the full request flow: resolve the date range, derive
//! the time buckets, compose the statement, run it through the injected
//! reader, tabulate the rows, and fill the trend cells the engine only
//! reserves. Nothing is cached; every call computes from scratch.

pub mod buckets;
pub mod cost;
pub mod error;
pub mod trend;
pub mod uptime;

pub use buckets::{buckets_for_range, default_range};
pub use cost::CostReport;
pub use error::ReportError;
pub use uptime::UptimeReport;

/// Cell value a bucket holds until a real observation lands in it, shared by
/// both shipped reports.
pub const EMPTY_CELL: &str = "0.00";
