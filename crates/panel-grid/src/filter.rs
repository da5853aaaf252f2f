//! Filter values and the default per-kind predicates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::{FilterKind, FilterOptions};

/// Comparison requested by a filter control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperation {
    /// Substring match.
    Contains,
    /// Equality.
    Equal,
    /// Inequality.
    NotEqual,
    /// Strictly greater.
    GreaterThan,
    /// Greater or equal.
    GreaterThanOrEqual,
    /// Strictly less.
    LessThan,
    /// Less or equal.
    LessThanOrEqual,
}

/// A filter applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Column the filter applies to.
    pub column_name: String,
    /// Requested comparison; each kind has its own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<FilterOperation>,
    /// Filter value. `null`, blank strings and empty arrays match every row.
    #[serde(default)]
    pub value: Value,
}

impl Filter {
    /// Create a filter on a column.
    pub fn new(column_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column_name: column_name.into(),
            operation: None,
            value: value.into(),
        }
    }

    /// Set the comparison.
    #[must_use]
    pub const fn with_operation(mut self, operation: FilterOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Whether the filter value is empty and therefore matches everything.
    pub fn is_blank(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// The predicate used for columns without a custom one.
pub fn default_matches(
    kind: FilterKind,
    options: &FilterOptions,
    cell: &Value,
    filter: &Filter,
) -> bool {
    if filter.is_blank() {
        return true;
    }

    match kind {
        FilterKind::String => string_matches(cell, filter),
        FilterKind::Number => number_matches(cell, filter),
        FilterKind::Boolean => boolean_matches(cell, filter),
        FilterKind::Enum => enum_matches(options, cell, filter),
        FilterKind::List => list_matches(cell, filter),
    }
}

/// Text shown for a cell value.
pub(crate) fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(display_text).collect(),
        Value::Null => Vec::new(),
        other => vec![display_text(other)],
    }
}

fn string_matches(cell: &Value, filter: &Filter) -> bool {
    let haystack = display_text(cell).to_lowercase();
    let needle = display_text(&filter.value).to_lowercase();

    match filter.operation.unwrap_or(FilterOperation::Contains) {
        FilterOperation::Equal => haystack == needle,
        FilterOperation::NotEqual => haystack != needle,
        _ => haystack.contains(&needle),
    }
}

fn number_matches(cell: &Value, filter: &Filter) -> bool {
    let operation = filter.operation.unwrap_or(FilterOperation::Equal);
    if operation == FilterOperation::Contains {
        return display_text(cell).contains(&display_text(&filter.value));
    }

    let Some(ordering) = compare_numbers(cell, &filter.value) else {
        return false;
    };

    match operation {
        FilterOperation::Equal | FilterOperation::Contains => ordering == Ordering::Equal,
        FilterOperation::NotEqual => ordering != Ordering::Equal,
        FilterOperation::GreaterThan => ordering == Ordering::Greater,
        FilterOperation::GreaterThanOrEqual => ordering != Ordering::Less,
        FilterOperation::LessThan => ordering == Ordering::Less,
        FilterOperation::LessThanOrEqual => ordering != Ordering::Greater,
    }
}

/// Integers compare exactly; anything else as `f64`.
fn compare_numbers(actual: &Value, expected: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_integer(actual), as_integer(expected)) {
        return Some(a.cmp(&b));
    }
    as_number(actual)?.partial_cmp(&as_number(expected)?)
}

fn boolean_matches(cell: &Value, filter: &Filter) -> bool {
    let Some(expected) = as_bool(&filter.value) else {
        return false;
    };
    let actual = as_bool(cell).unwrap_or(false);

    match filter.operation {
        Some(FilterOperation::NotEqual) => actual != expected,
        _ => actual == expected,
    }
}

fn enum_matches(options: &FilterOptions, cell: &Value, filter: &Filter) -> bool {
    let actual = match (cell, &options.disabled_value) {
        (Value::Null, Some(disabled)) => disabled.clone(),
        _ => display_text(cell),
    };
    let found = as_strings(&filter.value).iter().any(|v| *v == actual);

    match filter.operation {
        Some(FilterOperation::NotEqual) => !found,
        _ => found,
    }
}

fn list_matches(cell: &Value, filter: &Filter) -> bool {
    let selected = as_strings(&filter.value);
    as_strings(cell).iter().any(|v| selected.contains(v))
}
