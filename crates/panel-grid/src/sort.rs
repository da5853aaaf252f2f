//! Row ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::display_text;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// A sort applied to one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    /// Column to sort on.
    pub column_name: String,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sorting {
    /// Ascending sort on a column.
    pub fn asc(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on a column.
    pub fn desc(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse `name` or `name:asc` / `name:desc`.
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.split_once(':') {
            None if !spec.is_empty() => Some(Self::asc(spec)),
            Some((name, "asc")) if !name.is_empty() => Some(Self::asc(name)),
            Some((name, "desc")) if !name.is_empty() => Some(Self::desc(name)),
            _ => None,
        }
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over cell values: nulls first, then booleans, numbers,
/// strings (case-insensitive, ties broken case-sensitively) and the rest by text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        _ if rank(a) == rank(b) => display_text(a).cmp(&display_text(b)),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("title", Some(Sorting::asc("title")) ; "bare name")]
    #[test_case("title:desc", Some(Sorting::desc("title")) ; "descending")]
    #[test_case("title:asc", Some(Sorting::asc("title")) ; "explicit ascending")]
    #[test_case("title:up", None ; "unknown direction")]
    #[test_case(":desc", None ; "missing name")]
    #[test_case("", None ; "empty")]
    fn test_parse(spec: &str, expected: Option<Sorting>) {
        assert_eq!(Sorting::parse(spec), expected);
    }

    #[test]
    fn test_compare_mixed_kinds() {
        assert_eq!(compare_values(&Value::Null, &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(2), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!(9)), Ordering::Greater);
    }

    #[test]
    fn test_compare_strings_case_insensitive() {
        assert_eq!(compare_values(&json!("apple"), &json!("Banana")), Ordering::Less);
        assert_eq!(compare_values(&json!("B"), &json!("b")), Ordering::Less);
        assert_eq!(compare_values(&json!("x"), &json!("x")), Ordering::Equal);
    }
}
