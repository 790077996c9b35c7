//! FILENAME: report-engine/src/engine.rs
//! Calculation engine - flat records in, sorted pivot table out.
//!
//! The pipeline works over the explicit key list produced by the
//! combination enumerator; that list is the canonical row order until the
//! final sort, so nothing depends on map iteration order.
//!
//! Steps:
//! 1. Enumerate observed category combinations (Cartesian product)
//! 2. Build the placeholder skeleton, one row per combination
//! 3. Populate real values from the records
//! 4. Drop rows that stayed entirely empty
//! 5. Aggregate row totals and the footer
//! 6. Sort with the report ordering, tie-broken on the row key

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::definition::{
    Aggregation, FlatRecord, PivotKey, RowOrdering, TableDefinition,
};
use crate::error::TabulateError;
use crate::table::{PivotRow, PivotTable, TOTAL_COLUMN, TREND_COLUMN};

// ============================================================================
// NUMERIC CONVENTIONS
// ============================================================================

/// Parses a decimal-string cell. Failures are deliberately folded to 0 so a
/// single malformed cell cannot fail a whole report.
pub fn parse_number(cell: &str) -> f64 {
    cell.trim().parse().unwrap_or(0.0)
}

/// Serializes a computed value back to the boundary format: shortest
/// representation, no trailing zeros.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

// ============================================================================
// COMBINATION ENUMERATOR
// ============================================================================

/// Enumerates every observed category-value combination.
///
/// Per column, the distinct values actually observed in `records` (sorted,
/// so the result is canonical for a record set regardless of record order);
/// across columns, their Cartesian product, encoded as keys. The key count
/// is the product of the per-column distinct counts - high-cardinality
/// columns multiply through, and this routine does nothing to stop them.
pub fn enumerate_combinations(
    records: &[FlatRecord],
    category_columns: &[String],
) -> Result<(Vec<PivotKey>, Vec<Vec<String>>), TabulateError> {
    let per_column = distinct_column_values(records, category_columns)?;

    let keys = cartesian_product(&per_column)
        .into_iter()
        .map(|combo| {
            let pairs: SmallVec<[(&str, &str); 4]> = category_columns
                .iter()
                .map(String::as_str)
                .zip(combo)
                .collect();
            PivotKey::encode(&pairs)
        })
        .collect();

    Ok((keys, per_column))
}

/// Collects the distinct values observed per category column, sorted.
fn distinct_column_values(
    records: &[FlatRecord],
    category_columns: &[String],
) -> Result<Vec<Vec<String>>, TabulateError> {
    let mut sets: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); category_columns.len()];

    for record in records {
        for (column, set) in category_columns.iter().zip(sets.iter_mut()) {
            let value = record
                .get(column)
                .ok_or_else(|| TabulateError::missing(column))?;
            set.insert(value.as_str());
        }
    }

    Ok(sets
        .into_iter()
        .map(|set| set.into_iter().map(str::to_string).collect())
        .collect())
}

/// Cartesian product over per-column value sets, in index order.
///
/// Zero columns yield the single empty combination (an ungrouped report
/// collapses to one totals row); a column with zero observed values yields
/// no combinations at all.
fn cartesian_product(sets: &[Vec<String>]) -> Vec<SmallVec<[&str; 4]>> {
    if sets.is_empty() {
        return vec![SmallVec::new()];
    }
    if sets.iter().any(|set| set.is_empty()) {
        return Vec::new();
    }

    let mut combos = Vec::with_capacity(sets.iter().map(Vec::len).product());
    let mut indices = vec![0usize; sets.len()];

    'outer: loop {
        combos.push(
            indices
                .iter()
                .zip(sets)
                .map(|(&i, set)| set[i].as_str())
                .collect(),
        );

        // Odometer increment, rightmost digit first.
        let mut level = sets.len() - 1;
        loop {
            indices[level] += 1;
            if indices[level] < sets[level].len() {
                continue 'outer;
            }
            indices[level] = 0;
            if level == 0 {
                break 'outer;
            }
            level -= 1;
        }
    }

    combos
}

// ============================================================================
// SKELETON & POPULATION
// ============================================================================

/// One row per key, category cells decoded from the key, every bucket cell
/// set to the placeholder. Guarantees the complete category x bucket
/// rectangle whatever the data sparsity.
fn build_skeleton(
    keys: &[PivotKey],
    time_buckets: &[String],
    placeholder: &str,
) -> Vec<PivotRow> {
    keys.iter()
        .map(|key| {
            let mut row = PivotRow::from_key(key.clone());
            for bucket in time_buckets {
                row.cells.insert(bucket.clone(), placeholder.to_string());
            }
            row
        })
        .collect()
}

/// Copies record values into their skeleton cells.
///
/// A record outside the requested buckets leaves its row untouched, and a
/// key without a skeleton row is silently ignored (keys are derived from the
/// same record set, so neither is expected).
fn populate(
    records: &[FlatRecord],
    rows: &mut [PivotRow],
    definition: &TableDefinition,
) -> Result<(), TabulateError> {
    let index: FxHashMap<PivotKey, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.key.clone(), i))
        .collect();
    let buckets: FxHashSet<&str> = definition
        .time_buckets
        .iter()
        .map(String::as_str)
        .collect();

    for record in records {
        let key = PivotKey::from_record(record, &definition.category_columns)?;
        let bucket = record
            .get(&definition.time_column)
            .ok_or_else(|| TabulateError::missing(&definition.time_column))?;
        let value = record
            .get(&definition.value_column)
            .ok_or_else(|| TabulateError::missing(&definition.value_column))?;

        let Some(&row_index) = index.get(&key) else {
            continue;
        };
        if buckets.contains(bucket.as_str()) {
            rows[row_index].cells.insert(bucket.clone(), value.clone());
        }
    }

    Ok(())
}

/// Drops rows whose bucket cells all still equal the placeholder.
///
/// A real observation that happens to serialize to the placeholder is
/// indistinguishable from "no observation" and drops with it - inherited
/// from the data source, where both cross the boundary as the same string.
fn drop_empty_rows(rows: &mut Vec<PivotRow>, definition: &TableDefinition) {
    rows.retain(|row| {
        definition
            .time_buckets
            .iter()
            .any(|bucket| row.cell(bucket) != Some(definition.placeholder.as_str()))
    });
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Folds one column of cells with the table's aggregation rule.
fn aggregate_cells<'a, I>(cells: I, aggregation: Aggregation, placeholder: &str) -> f64
where
    I: Iterator<Item = Option<&'a str>>,
{
    match aggregation {
        Aggregation::Sum => cells.map(|cell| parse_number(cell.unwrap_or(""))).sum(),
        Aggregation::Average => {
            // Placeholder cells are "no observation", not true zeros.
            let observed: SmallVec<[f64; 12]> = cells
                .filter_map(|cell| cell.filter(|c| *c != placeholder))
                .map(parse_number)
                .collect();
            if observed.is_empty() {
                0.0
            } else {
                observed.iter().sum::<f64>() / observed.len() as f64
            }
        }
    }
}

/// Writes each row's `total`, reserves its `trend` slot, and computes the
/// footer of column aggregates.
fn aggregate(
    rows: &mut [PivotRow],
    definition: &TableDefinition,
) -> FxHashMap<String, String> {
    for row in rows.iter_mut() {
        let total = aggregate_cells(
            definition.time_buckets.iter().map(|b| row.cell(b)),
            definition.aggregation,
            &definition.placeholder,
        );
        row.set_cell(TOTAL_COLUMN, format_number(total));
        row.set_cell(TREND_COLUMN, String::new());
    }

    let mut footer = FxHashMap::default();
    for column in definition
        .time_buckets
        .iter()
        .map(String::as_str)
        .chain([TOTAL_COLUMN])
    {
        let value = aggregate_cells(
            rows.iter().map(|row| row.cell(column)),
            definition.aggregation,
            &definition.placeholder,
        );
        footer.insert(column.to_string(), format_number(value));
    }
    footer.insert(TREND_COLUMN.to_string(), String::new());

    footer
}

// ============================================================================
// SORTING
// ============================================================================

/// Applies the report ordering. Both branches tie-break on the encoded row
/// key so output order is identical across runs.
fn sort_rows(rows: &mut [PivotRow], definition: &TableDefinition) {
    match &definition.ordering {
        RowOrdering::LatestValueDescending => {
            let Some(latest) = definition.time_buckets.last() else {
                return;
            };
            rows.sort_by(|a, b| {
                let a_value = parse_number(a.cell(latest).unwrap_or(""));
                let b_value = parse_number(b.cell(latest).unwrap_or(""));
                b_value
                    .total_cmp(&a_value)
                    .then_with(|| a.key.cmp(&b.key))
            });
        }
        RowOrdering::CategoryAscending(column) => {
            rows.sort_by(|a, b| {
                a.cell(column)
                    .cmp(&b.cell(column))
                    .then_with(|| a.key.cmp(&b.key))
            });
        }
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Computes the complete pivot table for one report request.
///
/// No cancellation or time limit is threaded through: very large record sets or
/// high-cardinality category columns run unbounded, a documented gap of the
/// current design.
pub fn tabulate(
    definition: &TableDefinition,
    records: &[FlatRecord],
) -> Result<PivotTable, TabulateError> {
    let (keys, _) = enumerate_combinations(records, &definition.category_columns)?;

    let mut rows = build_skeleton(&keys, &definition.time_buckets, &definition.placeholder);
    populate(records, &mut rows, definition)?;
    drop_empty_rows(&mut rows, definition);

    let footer = aggregate(&mut rows, definition);
    sort_rows(&mut rows, definition);

    Ok(PivotTable { rows, footer })
}
