//! FILENAME: composer/src/options.rs
//! Request option structs for the shipped reports.
//!
//! These mirror the dashboard query-string convention: every dimension is an
//! optional string whose value is resolved through the tri-state activation
//! rules (absent → always-on, `""` → off, `"true"` → group by, anything else
//! → exact-match filter). Date range and interval always bind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compose::{bound_params, build_statement, BoundQuery};
use crate::field::{Activation, FieldSpec};

/// Column alias every composed statement gives its time bucket.
pub const TIME_BUCKET_COLUMN: &str = "date";

// ============================================================================
// INTERVAL
// ============================================================================

/// Time-bucket granularity of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Daily,
    #[default]
    Monthly,
}

impl Interval {
    /// strftime format that folds a date into its bucket label.
    pub fn date_format(&self) -> &'static str {
        match self {
            Interval::Daily => "%Y-%m-%d",
            Interval::Monthly => "%Y-%m",
        }
    }
}

// ============================================================================
// COST REPORT OPTIONS
// ============================================================================

/// Options for the cost report over AWS cost line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CostReportOptions {
    /// Inclusive range start, `%Y-%m-%d`.
    pub start_date: Option<String>,

    /// Inclusive range end, `%Y-%m-%d`.
    pub end_date: Option<String>,

    pub interval: Interval,

    // Tri-state dimension activations, as received from the client.
    pub team: Option<String>,
    pub account: Option<String>,
    pub region: Option<String>,
    pub service: Option<String>,
}

impl CostReportOptions {
    pub const TABLE: &'static str = "cost_lines";
    pub const VALUE_COLUMN: &'static str = "cost";

    /// The FieldSpec list this request composes over.
    pub fn fields(&self) -> Vec<FieldSpec> {
        let mut fields = vec![bucket_field("usage_date")];
        for (column, value) in [
            ("team", &self.team),
            ("account", &self.account),
            ("region", &self.region),
            ("service", &self.service),
        ] {
            fields.push(FieldSpec::dimension(column, Activation::resolve(value.as_deref())));
        }
        fields.push(measure_field(Self::VALUE_COLUMN, "SUM(cost) AS cost"));
        fields
    }

    /// Composes the bound statement for this request.
    pub fn statement(&self) -> BoundQuery {
        let fields = self.fields();
        BoundQuery {
            sql: build_statement(Self::TABLE, "", &fields),
            params: bound_params(&fields, self.base_params()),
        }
    }

    /// Dimension columns the pivot table groups on.
    pub fn grouped_columns(&self) -> Vec<String> {
        grouped_columns(&self.fields())
    }

    fn base_params(&self) -> BTreeMap<String, String> {
        range_params(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.interval,
        )
    }
}

// ============================================================================
// UPTIME REPORT OPTIONS
// ============================================================================

/// Options for the uptime report over AWS uptime samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UptimeReportOptions {
    /// Inclusive range start, `%Y-%m-%d`.
    pub start_date: Option<String>,

    /// Inclusive range end, `%Y-%m-%d`.
    pub end_date: Option<String>,

    pub interval: Interval,

    pub team: Option<String>,
    pub service: Option<String>,
}

impl UptimeReportOptions {
    pub const TABLE: &'static str = "uptime_samples";
    pub const VALUE_COLUMN: &'static str = "uptime";

    /// The FieldSpec list this request composes over.
    pub fn fields(&self) -> Vec<FieldSpec> {
        vec![
            bucket_field("sampled_at"),
            FieldSpec::dimension("team", Activation::resolve(self.team.as_deref())),
            FieldSpec::dimension("service", Activation::resolve(self.service.as_deref())),
            measure_field(Self::VALUE_COLUMN, "AVG(uptime) AS uptime"),
        ]
    }

    /// Composes the bound statement for this request.
    pub fn statement(&self) -> BoundQuery {
        let fields = self.fields();
        BoundQuery {
            sql: build_statement(Self::TABLE, "", &fields),
            params: bound_params(&fields, self.base_params()),
        }
    }

    /// Dimension columns the pivot table groups on.
    pub fn grouped_columns(&self) -> Vec<String> {
        grouped_columns(&self.fields())
    }

    fn base_params(&self) -> BTreeMap<String, String> {
        range_params(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.interval,
        )
    }
}

// ============================================================================
// SHARED FIELD CONSTRUCTORS
// ============================================================================

/// Always-on bucket field: folds the source date column into the bucket
/// label, bounds the range, and keeps buckets grouped and ordered.
fn bucket_field(source_column: &str) -> FieldSpec {
    FieldSpec {
        key: TIME_BUCKET_COLUMN.to_string(),
        select_expr: Some(format!(
            "strftime(:date_format, {source_column}) AS {TIME_BUCKET_COLUMN}"
        )),
        where_expr: Some(format!(
            "{source_column} BETWEEN :start_date AND :end_date"
        )),
        group_by_expr: Some(TIME_BUCKET_COLUMN.to_string()),
        order_by_expr: Some(TIME_BUCKET_COLUMN.to_string()),
        activation: Activation::Always,
    }
}

/// Always-on measure field: select-only aggregate expression.
fn measure_field(key: &str, select_expr: &str) -> FieldSpec {
    FieldSpec {
        key: key.to_string(),
        select_expr: Some(select_expr.to_string()),
        where_expr: None,
        group_by_expr: None,
        order_by_expr: None,
        activation: Activation::Always,
    }
}

fn grouped_columns(fields: &[FieldSpec]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.is_grouping_column() && f.key != TIME_BUCKET_COLUMN)
        .map(|f| f.key.clone())
        .collect()
}

fn range_params(
    start_date: Option<&str>,
    end_date: Option<&str>,
    interval: Interval,
) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert(
        ":start_date".to_string(),
        start_date.unwrap_or_default().to_string(),
    );
    params.insert(
        ":end_date".to_string(),
        end_date.unwrap_or_default().to_string(),
    );
    params.insert(
        ":date_format".to_string(),
        interval.date_format().to_string(),
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_options() -> CostReportOptions {
        CostReportOptions {
            start_date: Some("2025-01-01".to_string()),
            end_date: Some("2025-04-30".to_string()),
            interval: Interval::Monthly,
            team: Some("true".to_string()),
            account: Some("".to_string()),
            region: Some("eu-west-1".to_string()),
            service: None,
        }
    }

    #[test]
    fn test_cost_statement_clauses() {
        let query = create_test_options().statement();

        // Grouped team appears in SELECT / GROUP BY / ORDER BY, never WHERE.
        assert!(query.sql.contains("date, team, region, service, SUM(cost) AS cost"));
        assert!(query.sql.contains("GROUP BY date, team, service ORDER BY date, team, service"));
        assert!(!query.sql.contains("team = :team"));

        // Filtered region appears in WHERE but not in GROUP BY.
        assert!(query.sql.contains("region = :region"));
        assert!(!query.sql.contains("GROUP BY date, team, region"));

        // Disabled account appears nowhere.
        assert!(!query.sql.contains("account"));
    }

    #[test]
    fn test_cost_statement_params() {
        let query = create_test_options().statement();

        assert_eq!(query.params.get(":start_date").map(String::as_str), Some("2025-01-01"));
        assert_eq!(query.params.get(":end_date").map(String::as_str), Some("2025-04-30"));
        assert_eq!(query.params.get(":date_format").map(String::as_str), Some("%Y-%m"));
        assert_eq!(query.params.get(":region").map(String::as_str), Some("eu-west-1"));
        assert!(!query.params.contains_key(":team"));
    }

    #[test]
    fn test_grouped_columns() {
        // Grouped team and always-on service are pivot categories; the
        // filtered and disabled dimensions are not.
        assert_eq!(
            create_test_options().grouped_columns(),
            vec!["team".to_string(), "service".to_string()]
        );

        // Absent dimensions default to always-on, so the default report
        // breaks costs down by every dimension.
        assert_eq!(
            CostReportOptions::default().grouped_columns(),
            vec![
                "team".to_string(),
                "account".to_string(),
                "region".to_string(),
                "service".to_string()
            ]
        );
    }

    #[test]
    fn test_uptime_statement() {
        let options = UptimeReportOptions {
            start_date: Some("2025-03-01".to_string()),
            end_date: Some("2025-03-14".to_string()),
            interval: Interval::Daily,
            team: Some("true".to_string()),
            service: Some("true".to_string()),
        };
        let query = options.statement();

        assert!(query.sql.contains("FROM uptime_samples"));
        assert!(query.sql.contains("AVG(uptime) AS uptime"));
        assert!(query.sql.contains("GROUP BY date, team, service"));
        assert_eq!(query.params.get(":date_format").map(String::as_str), Some("%Y-%m-%d"));
    }

    #[test]
    fn test_options_deserialize_from_query_shape() {
        let options: CostReportOptions = serde_json::from_str(
            r#"{"start_date":"2025-01-01","end_date":"2025-02-28","interval":"monthly","team":"true"}"#,
        )
        .unwrap();
        assert_eq!(options.interval, Interval::Monthly);
        assert_eq!(options.team.as_deref(), Some("true"));
        assert!(options.region.is_none());
    }
}
