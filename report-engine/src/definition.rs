//! FILENAME: report-engine/src/definition.rs
//! Table definition - the serializable configuration and its input rows.
//!
//! These types DESCRIBE a pivot table: which columns categorize rows, which
//! buckets span the time axis, where the value lives and how rows aggregate
//! and sort. They are immutable snapshots of request intent; the engine only
//! reads them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::TabulateError;

/// One flat result row: column name to string cell. Numeric values arrive as
/// decimal strings and stay strings until arithmetic needs them.
pub type FlatRecord = FxHashMap<String, String>;

// ============================================================================
// PIVOT KEY
// ============================================================================

/// Canonical encoding of one category-column → value assignment.
///
/// Columns are sorted alphabetically and each `column:value` pair is
/// terminated by `^` (e.g. `region:eu-west-1^team:T01^`), so two records
/// with the same category values encode identically whatever order their
/// columns were observed in. The encoded form also serves as the explicit
/// tie-break key for every sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PivotKey(String);

impl PivotKey {
    /// Encodes a set of `(column, value)` pairs, sorting by column name.
    pub fn encode(pairs: &[(&str, &str)]) -> Self {
        let mut sorted: SmallVec<[(&str, &str); 4]> = SmallVec::from_slice(pairs);
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut encoded = String::new();
        for (column, value) in sorted {
            encoded.push_str(column);
            encoded.push(':');
            encoded.push_str(value);
            encoded.push('^');
        }
        PivotKey(encoded)
    }

    /// Encodes the key of a record over the given category columns.
    /// Fails if the record lacks one of them.
    pub fn from_record(
        record: &FlatRecord,
        category_columns: &[String],
    ) -> Result<Self, TabulateError> {
        let mut pairs: SmallVec<[(&str, &str); 4]> =
            SmallVec::with_capacity(category_columns.len());
        for column in category_columns {
            let value = record
                .get(column)
                .ok_or_else(|| TabulateError::missing(column))?;
            pairs.push((column.as_str(), value.as_str()));
        }
        Ok(Self::encode(&pairs))
    }

    /// Decodes the key back into its `(column, value)` pairs.
    pub fn decode(&self) -> Vec<(String, String)> {
        self.0
            .split_terminator('^')
            .filter_map(|pair| pair.split_once(':'))
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// AGGREGATION & ORDERING
// ============================================================================

/// How a row folds its bucket cells into the `total` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Sum across every bucket cell; unparseable cells count as 0.
    Sum,
    /// Mean over the cells holding a real observation. A cell still equal to
    /// the placeholder counts as "no observation", not as a true zero - the
    /// two are indistinguishable once serialized, an ambiguity inherited
    /// from the data source.
    Average,
}

/// Final row ordering of a report. Both orderings are stable and tie-break
/// on the encoded row key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowOrdering {
    /// Descending numeric order on the most recent time bucket.
    LatestValueDescending,
    /// Ascending string order on the named category column.
    CategoryAscending(String),
}

// ============================================================================
// TABLE DEFINITION
// ============================================================================

/// The complete description of one pivot-table computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Columns whose value combinations become rows.
    pub category_columns: Vec<String>,

    /// Requested time buckets, oldest first. Every row carries a cell for
    /// each of them regardless of data sparsity.
    pub time_buckets: Vec<String>,

    /// Record column holding the bucket label.
    pub time_column: String,

    /// Record column holding the measure.
    pub value_column: String,

    /// Cell value a bucket keeps until a real observation lands in it.
    pub placeholder: String,

    pub aggregation: Aggregation,

    pub ordering: RowOrdering,
}
