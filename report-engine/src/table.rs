//! FILENAME: report-engine/src/table.rs
//! Renderable pivot-table output.
//!
//! A PivotRow serializes as one flat JSON object (category cells, bucket
//! cells, trend, total) so the dashboard can consume rows directly. The row
//! key is carried for deterministic ordering but never serialized.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::definition::PivotKey;

/// Cell added to every row with its aggregate across the time buckets.
pub const TOTAL_COLUMN: &str = "total";

/// Cell slot reserved on every row; filled by the report service, never
/// computed by the aggregation engine.
pub const TREND_COLUMN: &str = "trend";

// ============================================================================
// PIVOT ROW
// ============================================================================

/// One pivot-table row: every category column, every requested time bucket,
/// and (after aggregation) the `trend` and `total` cells.
#[derive(Debug, Clone, Serialize)]
pub struct PivotRow {
    /// Canonical key of this row's category combination.
    #[serde(skip)]
    pub key: PivotKey,

    /// Column name to cell value.
    #[serde(flatten)]
    pub cells: FxHashMap<String, String>,
}

impl PivotRow {
    /// Creates a row from its key, materializing the category cells.
    pub fn from_key(key: PivotKey) -> Self {
        let mut cells = FxHashMap::default();
        for (column, value) in key.decode() {
            cells.insert(column, value);
        }
        PivotRow { key, cells }
    }

    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn set_cell(&mut self, column: &str, value: String) {
        self.cells.insert(column.to_string(), value);
    }
}

// ============================================================================
// PIVOT TABLE
// ============================================================================

/// The computed table: ordered rows plus one footer of column aggregates
/// (the row column set minus the category columns).
#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    pub rows: Vec<PivotRow>,
    pub footer: FxHashMap<String, String>,
}
