//! FILENAME: reports/src/trend.rs
//! Trend annotation.
//!
//! The aggregation engine only reserves the `trend` slot; this module fills
//! it with the percentage change between the two most recent buckets, on
//! every row and on the footer.

use report_engine::{format_number, parse_number, PivotTable, TREND_COLUMN};

/// Fills the `trend` cell of every row and the footer.
///
/// With fewer than two buckets, or a previous bucket at 0 (which includes
/// placeholders and unparseable cells), the trend is 0.
pub fn annotate(table: &mut PivotTable, time_buckets: &[String]) {
    let [.., previous, latest] = time_buckets else {
        return;
    };

    for row in &mut table.rows {
        let trend = percent_change(
            parse_number(row.cell(previous).unwrap_or("")),
            parse_number(row.cell(latest).unwrap_or("")),
        );
        row.set_cell(TREND_COLUMN, format_number(trend));
    }

    let footer_trend = percent_change(
        parse_number(table.footer.get(previous).map(String::as_str).unwrap_or("")),
        parse_number(table.footer.get(latest).map(String::as_str).unwrap_or("")),
    );
    table
        .footer
        .insert(TREND_COLUMN.to_string(), format_number(footer_trend));
}

fn percent_change(previous: f64, latest: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (latest - previous) / previous * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_engine::{PivotKey, PivotRow};

    /// One-row table with the same cells mirrored into the footer.
    fn create_test_table(cells: &[(&str, &str)]) -> PivotTable {
        let mut row = PivotRow::from_key(PivotKey::encode(&[("team", "T01")]));
        for (column, value) in cells {
            row.set_cell(column, value.to_string());
        }
        let mut table = PivotTable {
            rows: vec![row],
            footer: Default::default(),
        };
        for (column, value) in cells {
            table.footer.insert(column.to_string(), value.to_string());
        }
        table
    }

    #[test]
    fn test_trend_is_percent_change() {
        let buckets = vec!["2025-03".to_string(), "2025-04".to_string()];
        let mut table = create_test_table(&[("2025-03", "100"), ("2025-04", "200")]);

        annotate(&mut table, &buckets);
        assert_eq!(table.rows[0].cell(TREND_COLUMN), Some("100"));
        assert_eq!(table.footer.get(TREND_COLUMN).map(String::as_str), Some("100"));
    }

    #[test]
    fn test_trend_with_empty_previous_bucket() {
        let buckets = vec!["2025-03".to_string(), "2025-04".to_string()];
        let mut table = create_test_table(&[("2025-03", "0.00"), ("2025-04", "50")]);

        annotate(&mut table, &buckets);
        assert_eq!(table.rows[0].cell(TREND_COLUMN), Some("0"));
    }

    #[test]
    fn test_trend_needs_two_buckets() {
        let buckets = vec!["2025-04".to_string()];
        let mut table = create_test_table(&[("2025-04", "50")]);

        annotate(&mut table, &buckets);
        // Slot untouched: stays whatever the aggregator reserved.
        assert_eq!(table.rows[0].cell(TREND_COLUMN), None);
    }
}
