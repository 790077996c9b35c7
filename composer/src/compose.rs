//! FILENAME: composer/src/compose.rs
//! Clause projections and statement assembly.
//!
//! Four projections walk a FieldSpec list in input order and join the
//! fragments the activations admit; `build_statement` interpolates them into
//! the fixed SELECT / FROM / WHERE / GROUP BY / ORDER BY template.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldSpec;

// ============================================================================
// BOUND QUERY
// ============================================================================

/// A composed statement plus the values for its named placeholders.
///
/// Parameter keys carry their leading `:` so they can be handed to the
/// storage layer without reshaping. The map is ordered to keep statement
/// logging and test output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundQuery {
    /// Final SQL text.
    pub sql: String,

    /// Placeholder name (`:start_date`, `:team`, …) to bound value.
    pub params: BTreeMap<String, String>,
}

// ============================================================================
// CLAUSE PROJECTIONS
// ============================================================================

/// Builds the SELECT list: Always, Grouped and Filtered fields, in order.
pub fn build_select(fields: &[FieldSpec]) -> String {
    join_fragments(fields, ", ", |f| {
        f.activation.in_select().then(|| f.select_expr.as_deref()).flatten()
    })
}

/// Builds the WHERE body: Always and Filtered fields, in order.
pub fn build_where(fields: &[FieldSpec]) -> String {
    join_fragments(fields, " AND ", |f| {
        f.activation.in_where().then(|| f.where_expr.as_deref()).flatten()
    })
}

/// Builds the GROUP BY body: Always and Grouped fields, in order.
pub fn build_group_by(fields: &[FieldSpec]) -> String {
    join_fragments(fields, ", ", |f| {
        f.activation.in_group_by().then(|| f.group_by_expr.as_deref()).flatten()
    })
}

/// Builds the ORDER BY body: Always and Grouped fields, in order.
pub fn build_order_by(fields: &[FieldSpec]) -> String {
    join_fragments(fields, ", ", |f| {
        f.activation.in_group_by().then(|| f.order_by_expr.as_deref()).flatten()
    })
}

fn join_fragments<'a, F>(fields: &'a [FieldSpec], separator: &str, pick: F) -> String
where
    F: Fn(&'a FieldSpec) -> Option<&'a str>,
{
    fields
        .iter()
        .filter_map(pick)
        .collect::<Vec<_>>()
        .join(separator)
}

// ============================================================================
// STATEMENT ASSEMBLY
// ============================================================================

/// Interpolates the four clause bodies into the fixed statement template.
///
/// Contract: every clause is emitted even when its body is empty. Callers
/// are responsible for keeping unconditionally-required clauses non-empty;
/// the shipped option types always contribute at least one always-on field
/// per clause.
pub fn build_statement(table: &str, joins: &str, fields: &[FieldSpec]) -> String {
    let from = if joins.is_empty() {
        table.to_string()
    } else {
        format!("{table} {joins}")
    };

    format!(
        "SELECT {select} FROM {from} WHERE {where_body} GROUP BY {group_by} ORDER BY {order_by}",
        select = build_select(fields),
        where_body = build_where(fields),
        group_by = build_group_by(fields),
        order_by = build_order_by(fields),
    )
}

/// Extends a base parameter map with one entry per Filtered field.
pub fn bound_params(
    fields: &[FieldSpec],
    base: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut params = base;
    for field in fields {
        if let Some(value) = field.activation.filter_value() {
            params.insert(format!(":{}", field.key), value.to_string());
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Activation;

    fn create_test_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec {
                key: "date".to_string(),
                select_expr: Some("strftime(:date_format, usage_date) AS date".to_string()),
                where_expr: Some("usage_date BETWEEN :start_date AND :end_date".to_string()),
                group_by_expr: Some("date".to_string()),
                order_by_expr: Some("date".to_string()),
                activation: Activation::Always,
            },
            FieldSpec::dimension("team", Activation::Grouped),
            FieldSpec::dimension("region", Activation::Filtered("eu-west-1".to_string())),
            FieldSpec::dimension("service", Activation::Disabled),
            FieldSpec {
                key: "cost".to_string(),
                select_expr: Some("SUM(cost) AS cost".to_string()),
                where_expr: None,
                group_by_expr: None,
                order_by_expr: None,
                activation: Activation::Always,
            },
        ]
    }

    #[test]
    fn test_select_projection() {
        let fields = create_test_fields();
        assert_eq!(
            build_select(&fields),
            "strftime(:date_format, usage_date) AS date, team, region, SUM(cost) AS cost"
        );
    }

    #[test]
    fn test_where_projection() {
        let fields = create_test_fields();
        // Grouped fields never filter; disabled fields vanish.
        assert_eq!(
            build_where(&fields),
            "usage_date BETWEEN :start_date AND :end_date AND region = :region"
        );
    }

    #[test]
    fn test_group_and_order_projections() {
        let fields = create_test_fields();
        assert_eq!(build_group_by(&fields), "date, team");
        assert_eq!(build_order_by(&fields), "date, team");
    }

    #[test]
    fn test_statement_template() {
        let fields = create_test_fields();
        let sql = build_statement("cost_lines", "", &fields);
        assert!(sql.starts_with("SELECT strftime"));
        assert!(sql.contains(" FROM cost_lines WHERE "));
        assert!(sql.contains(" GROUP BY date, team ORDER BY date, team"));
    }

    #[test]
    fn test_statement_with_joins() {
        let fields = create_test_fields();
        let sql = build_statement("cost_lines", "JOIN teams ON teams.id = cost_lines.team_id", &fields);
        assert!(sql.contains("FROM cost_lines JOIN teams ON teams.id = cost_lines.team_id WHERE"));
    }

    #[test]
    fn test_empty_clause_bodies_still_emitted() {
        let sql = build_statement("cost_lines", "", &[]);
        assert_eq!(sql, "SELECT  FROM cost_lines WHERE  GROUP BY  ORDER BY ");
    }

    #[test]
    fn test_bound_params_collects_filters() {
        let fields = create_test_fields();
        let mut base = BTreeMap::new();
        base.insert(":start_date".to_string(), "2025-01-01".to_string());

        let params = bound_params(&fields, base);
        assert_eq!(params.get(":start_date").map(String::as_str), Some("2025-01-01"));
        assert_eq!(params.get(":region").map(String::as_str), Some("eu-west-1"));
        // Grouped and disabled fields bind nothing.
        assert!(!params.contains_key(":team"));
        assert!(!params.contains_key(":service"));
    }
}
