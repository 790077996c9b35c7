//! FILENAME: composer/src/lib.rs
//! Dynamic grouped-query composition for report statements.
//!
//! This crate turns request-shaped report options into a single parameterized
//! SQL statement. Every candidate column is described by a [`FieldSpec`]
//! whose [`Activation`] decides which clauses the column participates in:
//! a dimension can be always-on, switched off, promoted to a GROUP BY
//! dimension, or pinned to an exact-match filter value.
//!
//! Layers:
//! - `field`: FieldSpec and the tri-state activation rules (what a column IS)
//! - `compose`: clause projections and statement assembly (HOW we build SQL)
//! - `options`: request option structs for the shipped reports (WHAT callers send)
//!
//! The whole crate is pure: nothing here touches a database or can fail.
//! A malformed fragment surfaces only when the storage layer executes the
//! statement.

pub mod field;
pub mod compose;
pub mod options;

pub use field::{Activation, FieldSpec};
pub use compose::{
    BoundQuery, bound_params, build_group_by, build_order_by, build_select,
    build_statement, build_where,
};
pub use options::{CostReportOptions, Interval, UptimeReportOptions, TIME_BUCKET_COLUMN};
