//! FILENAME: report-engine/src/lib.rs
//! Pivot-table aggregation engine for report data.
//!
//! This crate turns the flat rows a composed statement returns into a
//! complete pivot table: one row per observed category combination, one
//! column per requested time bucket, a total/trend slot per row and a footer
//! of column aggregates. It performs no I/O and holds no state across calls;
//! every table is computed fresh from its arguments.
//!
//! Layers:
//! - `definition`: Serializable configuration and input rows (what the table IS)
//! - `table`: Renderable output rows and footer (WHAT we return)
//! - `engine`: Calculation engine (HOW we calculate)
//!
//! Algorithm:
//! 1. Enumerate every observed category-value combination (Cartesian product)
//! 2. Materialize a placeholder skeleton row per combination
//! 3. Copy real values from the flat rows into the skeleton
//! 4. Drop rows that stayed entirely empty
//! 5. Aggregate row totals/averages and the footer
//! 6. Sort with the report-specific ordering, tie-broken on the row key

pub mod definition;
pub mod table;
pub mod engine;
pub mod error;

pub use definition::{
    Aggregation, FlatRecord, PivotKey, RowOrdering, TableDefinition,
};
pub use table::{PivotRow, PivotTable, TOTAL_COLUMN, TREND_COLUMN};
pub use engine::{enumerate_combinations, format_number, parse_number, tabulate};
pub use error::TabulateError;
