//! FILENAME: composer/src/field.rs
//! FieldSpec - one candidate column of a composed statement.
//!
//! A FieldSpec carries up to four SQL fragments (select / where / group by /
//! order by) and an activation state that decides which of them are emitted.
//! FieldSpecs are immutable snapshots: the composer only ever reads them.

use serde::{Deserialize, Serialize};

// ============================================================================
// ACTIVATION
// ============================================================================

/// Tri-state activation of a field, derived from an optional request value.
///
/// The wire convention is inherited from the dashboard API: an absent
/// parameter leaves the field always-on, an empty string disables it,
/// the literal `"true"` turns it into a grouping dimension, and any other
/// literal filters on that exact value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    /// Field participates in every clause it has a fragment for.
    Always,
    /// Field is excluded from the statement entirely.
    Disabled,
    /// Grouping dimension: selected, grouped and ordered, never filtered.
    Grouped,
    /// Exact-match filter: selected and filtered on the carried literal,
    /// never grouped or ordered.
    Filtered(String),
}

impl Activation {
    /// Resolves an optional activation value into its state.
    ///
    /// Pure function of the input: `None` → Always, `""` → Disabled,
    /// `"true"` → Grouped, anything else → Filtered(value).
    pub fn resolve(value: Option<&str>) -> Self {
        match value {
            None => Activation::Always,
            Some("") => Activation::Disabled,
            Some("true") => Activation::Grouped,
            Some(literal) => Activation::Filtered(literal.to_string()),
        }
    }

    /// Whether the field's select fragment is emitted.
    pub fn in_select(&self) -> bool {
        !matches!(self, Activation::Disabled)
    }

    /// Whether the field's where fragment is emitted.
    pub fn in_where(&self) -> bool {
        matches!(self, Activation::Always | Activation::Filtered(_))
    }

    /// Whether the field's group-by and order-by fragments are emitted.
    pub fn in_group_by(&self) -> bool {
        matches!(self, Activation::Always | Activation::Grouped)
    }

    /// The filter literal, if this activation carries one.
    pub fn filter_value(&self) -> Option<&str> {
        match self {
            Activation::Filtered(value) => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// FIELD SPEC
// ============================================================================

/// Describes one candidate column of a composed statement.
///
/// Each fragment is optional; a field with no fragment for a clause simply
/// never appears in that clause, whatever its activation says.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Name of the field; doubles as the named-parameter key for filters.
    pub key: String,

    /// Fragment emitted into the SELECT list (e.g. `team`).
    pub select_expr: Option<String>,

    /// Fragment emitted into the WHERE clause (e.g. `team = :team`).
    pub where_expr: Option<String>,

    /// Fragment emitted into the GROUP BY clause.
    pub group_by_expr: Option<String>,

    /// Fragment emitted into the ORDER BY clause.
    pub order_by_expr: Option<String>,

    /// Which clauses this field participates in.
    pub activation: Activation,
}

impl FieldSpec {
    /// Creates a dimension field: selected, grouped and ordered on the bare
    /// column name. The exact-match filter fragment references the
    /// dimension's named parameter, so it is only attached when the
    /// activation carries a literal to bind.
    pub fn dimension(column: &str, activation: Activation) -> Self {
        let where_expr = activation
            .filter_value()
            .map(|_| format!("{column} = :{column}"));
        FieldSpec {
            key: column.to_string(),
            select_expr: Some(column.to_string()),
            where_expr,
            group_by_expr: Some(column.to_string()),
            order_by_expr: Some(column.to_string()),
            activation,
        }
    }

    /// Whether this field is a grouping column of the result set: selected
    /// and grouped, i.e. a category column of the downstream pivot table.
    pub fn is_grouping_column(&self) -> bool {
        self.activation.in_group_by() && self.group_by_expr.is_some()
    }
}
