//! FILENAME: reports/src/uptime.rs
//! Uptime report service.

use chrono::Utc;
use composer::{UptimeReportOptions, TIME_BUCKET_COLUMN};
use report_engine::{tabulate, Aggregation, PivotTable, RowOrdering, TableDefinition};
use storage::Reader;
use tracing::debug;

use crate::buckets::{buckets_for_range, default_range};
use crate::error::ReportError;
use crate::trend;
use crate::EMPTY_CELL;

/// Category column the uptime table orders on.
const ORDER_COLUMN: &str = "team";

/// Computes the uptime pivot table: samples averaged per bucket, rows in
/// ascending team order.
pub struct UptimeReport<'a, R: Reader> {
    reader: &'a R,
}

impl<'a, R: Reader> UptimeReport<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        UptimeReport { reader }
    }

    pub fn run(&self, options: &UptimeReportOptions) -> Result<PivotTable, ReportError> {
        let options = resolve_range(options);
        let buckets = buckets_for_range(
            options.start_date.as_deref().unwrap_or_default(),
            options.end_date.as_deref().unwrap_or_default(),
            options.interval,
        )?;

        let query = options.statement();
        debug!(sql = %query.sql, "composed uptime statement");
        let records = self.reader.select(&query)?;
        debug!(records = records.len(), buckets = buckets.len(), "fetched uptime rows");

        let definition = TableDefinition {
            category_columns: options.grouped_columns(),
            time_buckets: buckets.clone(),
            time_column: TIME_BUCKET_COLUMN.to_string(),
            value_column: UptimeReportOptions::VALUE_COLUMN.to_string(),
            placeholder: EMPTY_CELL.to_string(),
            aggregation: Aggregation::Average,
            ordering: RowOrdering::CategoryAscending(ORDER_COLUMN.to_string()),
        };

        let mut table = tabulate(&definition, &records)?;
        trend::annotate(&mut table, &buckets);
        debug!(rows = table.rows.len(), "uptime table computed");
        Ok(table)
    }
}

/// Fills an unset date range with the default window ending today.
fn resolve_range(options: &UptimeReportOptions) -> UptimeReportOptions {
    let mut options = options.clone();
    if options.start_date.is_none() || options.end_date.is_none() {
        let (start, end) = default_range(Utc::now().date_naive(), options.interval);
        options.start_date.get_or_insert(start);
        options.end_date.get_or_insert(end);
    }
    options
}
