//! FILENAME: reports/src/cost.rs
//! Cost report service.

use chrono::Utc;
use composer::{CostReportOptions, TIME_BUCKET_COLUMN};
use report_engine::{tabulate, Aggregation, PivotTable, RowOrdering, TableDefinition};
use storage::Reader;
use tracing::debug;

use crate::buckets::{buckets_for_range, default_range};
use crate::error::ReportError;
use crate::trend;
use crate::EMPTY_CELL;

/// Computes the cost pivot table: costs summed per bucket, rows ordered by
/// descending spend in the most recent bucket.
pub struct CostReport<'a, R: Reader> {
    reader: &'a R,
}

impl<'a, R: Reader> CostReport<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        CostReport { reader }
    }

    pub fn run(&self, options: &CostReportOptions) -> Result<PivotTable, ReportError> {
        let options = resolve_range(options);
        let buckets = buckets_for_range(
            options.start_date.as_deref().unwrap_or_default(),
            options.end_date.as_deref().unwrap_or_default(),
            options.interval,
        )?;

        let query = options.statement();
        debug!(sql = %query.sql, "composed cost statement");
        let records = self.reader.select(&query)?;
        debug!(records = records.len(), buckets = buckets.len(), "fetched cost rows");

        let definition = TableDefinition {
            category_columns: options.grouped_columns(),
            time_buckets: buckets.clone(),
            time_column: TIME_BUCKET_COLUMN.to_string(),
            value_column: CostReportOptions::VALUE_COLUMN.to_string(),
            placeholder: EMPTY_CELL.to_string(),
            aggregation: Aggregation::Sum,
            ordering: RowOrdering::LatestValueDescending,
        };

        let mut table = tabulate(&definition, &records)?;
        trend::annotate(&mut table, &buckets);
        debug!(rows = table.rows.len(), "cost table computed");
        Ok(table)
    }
}

/// Fills an unset date range with the default window ending today.
fn resolve_range(options: &CostReportOptions) -> CostReportOptions {
    let mut options = options.clone();
    if options.start_date.is_none() || options.end_date.is_none() {
        let (start, end) = default_range(Utc::now().date_naive(), options.interval);
        options.start_date.get_or_insert(start);
        options.end_date.get_or_insert(end);
    }
    options
}
