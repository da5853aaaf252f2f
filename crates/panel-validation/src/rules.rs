//! Field rules of a declarative schema.
//!
//! Rule names and default messages follow the wording of the validation
//! library the backend uses, so server-side and client-side failures render
//! through the same translation templates.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::issue::Constraint;

/// A compiled regular expression usable in a [`Rule::Matches`].
///
/// Serializes as its source text; invalid patterns fail to deserialize.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|e| SchemaError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the text matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl TryFrom<String> for Pattern {
    type Error = SchemaError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(&pattern)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.as_str().to_string()
    }
}

/// A single check applied to a field value.
///
/// Serializes as `{"rule": "minLength", "value": 3}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "camelCase")]
pub enum Rule {
    /// Not `null`, missing or the empty string.
    IsNotEmpty,
    /// A string of at least this many characters.
    MinLength(usize),
    /// A string of at most this many characters.
    MaxLength(usize),
    /// A number not less than this.
    Min(f64),
    /// A number not greater than this.
    Max(f64),
    /// An integral number.
    IsInt,
    /// An array with at least this many elements.
    ArrayMinSize(usize),
    /// An array with at most this many elements.
    ArrayMaxSize(usize),
    /// One of the listed values.
    IsIn(Vec<String>),
    /// A string matching the pattern.
    Matches(Pattern),
}

impl Rule {
    /// Rule name as reported in constraints.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsNotEmpty => "isNotEmpty",
            Self::MinLength(_) => "minLength",
            Self::MaxLength(_) => "maxLength",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::IsInt => "isInt",
            Self::ArrayMinSize(_) => "arrayMinSize",
            Self::ArrayMaxSize(_) => "arrayMaxSize",
            Self::IsIn(_) => "isIn",
            Self::Matches(_) => "matches",
        }
    }

    /// Rule arguments, in template order.
    pub fn arguments(&self) -> Vec<String> {
        match self {
            Self::IsNotEmpty | Self::IsInt => Vec::new(),
            Self::MinLength(n) | Self::MaxLength(n) | Self::ArrayMinSize(n) | Self::ArrayMaxSize(n) => {
                vec![n.to_string()]
            }
            Self::Min(x) | Self::Max(x) => vec![format_number(*x)],
            Self::IsIn(values) => vec![values.join(", ")],
            Self::Matches(pattern) => vec![pattern.as_str().to_string()],
        }
    }

    /// Check a value, returning the failed constraint if any.
    pub fn check(&self, property: &str, value: &Value) -> Option<Constraint> {
        if self.passes(value) {
            None
        } else {
            Some(Constraint::new(self.name(), self.message(property)).with_arguments(self.arguments()))
        }
    }

    fn passes(&self, value: &Value) -> bool {
        match self {
            Self::IsNotEmpty => !matches!(value, Value::Null) && value.as_str() != Some(""),
            Self::MinLength(n) => value.as_str().is_some_and(|s| s.chars().count() >= *n),
            Self::MaxLength(n) => value.as_str().is_some_and(|s| s.chars().count() <= *n),
            Self::Min(min) => value.as_f64().is_some_and(|x| x >= *min),
            Self::Max(max) => value.as_f64().is_some_and(|x| x <= *max),
            Self::IsInt => {
                value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|x| x.fract() == 0.0)
            }
            Self::ArrayMinSize(n) => value.as_array().is_some_and(|a| a.len() >= *n),
            Self::ArrayMaxSize(n) => value.as_array().is_some_and(|a| a.len() <= *n),
            Self::IsIn(values) => match value {
                Value::String(s) => values.iter().any(|v| v == s),
                Value::Number(n) => values.iter().any(|v| *v == n.to_string()),
                Value::Bool(b) => values.iter().any(|v| *v == b.to_string()),
                _ => false,
            },
            Self::Matches(pattern) => value.as_str().is_some_and(|s| pattern.is_match(s)),
        }
    }

    fn message(&self, property: &str) -> String {
        let argument = self.arguments().into_iter().next().unwrap_or_default();
        match self {
            Self::IsNotEmpty => format!("{property} should not be empty"),
            Self::MinLength(_) => {
                format!("{property} must be longer than or equal to {argument} characters")
            }
            Self::MaxLength(_) => {
                format!("{property} must be shorter than or equal to {argument} characters")
            }
            Self::Min(_) => format!("{property} must not be less than {argument}"),
            Self::Max(_) => format!("{property} must not be greater than {argument}"),
            Self::IsInt => format!("{property} must be an integer number"),
            Self::ArrayMinSize(_) => format!("{property} must contain at least {argument} elements"),
            Self::ArrayMaxSize(_) => {
                format!("{property} must contain no more than {argument} elements")
            }
            Self::IsIn(_) => {
                format!("{property} must be one of the following values: {argument}")
            }
            Self::Matches(_) => format!("{property} must match {argument} regular expression"),
        }
    }
}

fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.0}")
    } else {
        x.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(Rule::IsNotEmpty, json!("x"), true ; "not empty string")]
    #[test_case(Rule::IsNotEmpty, json!(""), false ; "empty string")]
    #[test_case(Rule::IsNotEmpty, Value::Null, false ; "null")]
    #[test_case(Rule::IsNotEmpty, json!([]), true ; "empty array is not empty")]
    #[test_case(Rule::MinLength(3), json!("abc"), true ; "min length boundary")]
    #[test_case(Rule::MinLength(3), json!("ab"), false ; "too short")]
    #[test_case(Rule::MinLength(1), json!(5), false ; "min length non string")]
    #[test_case(Rule::MaxLength(2), json!("žž"), true ; "counts characters")]
    #[test_case(Rule::MaxLength(2), json!("abc"), false ; "too long")]
    #[test_case(Rule::Min(1.0), json!(1), true ; "min boundary")]
    #[test_case(Rule::Min(1.0), json!(0.5), false ; "below min")]
    #[test_case(Rule::Max(10.0), json!(11), false ; "above max")]
    #[test_case(Rule::IsInt, json!(4), true ; "integer")]
    #[test_case(Rule::IsInt, json!(4.0), true ; "integral float")]
    #[test_case(Rule::IsInt, json!(4.5), false ; "fraction")]
    #[test_case(Rule::IsInt, json!("4"), false ; "string is not int")]
    #[test_case(Rule::ArrayMinSize(2), json!(["a", "b"]), true ; "enough elements")]
    #[test_case(Rule::ArrayMinSize(2), json!(["a"]), false ; "too few elements")]
    #[test_case(Rule::ArrayMaxSize(1), json!(["a", "b"]), false ; "too many elements")]
    #[test_case(Rule::IsIn(vec!["tips".into(), "bits".into()]), json!("bits"), true ; "allowed value")]
    #[test_case(Rule::IsIn(vec!["tips".into()]), json!("normal"), false ; "disallowed value")]
    #[test_case(Rule::IsIn(vec!["1".into()]), json!(1), true ; "number in list")]
    fn test_rule_check(rule: Rule, value: Value, passes: bool) {
        assert_eq!(rule.check("field", &value).is_none(), passes);
    }

    #[test]
    fn test_matches_rule() {
        let rule = Rule::Matches(Pattern::new(r"^[a-zA-Z0-9_]{11}$").unwrap());
        assert!(rule.check("videoId", &json!("dQw4w9WgXcQ")).is_none());

        let constraint = rule.check("videoId", &json!("nope")).unwrap();
        assert_eq!(constraint.rule, "matches");
        assert_eq!(constraint.arguments, vec![r"^[a-zA-Z0-9_]{11}$"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(Pattern::new("("), Err(SchemaError::InvalidPattern { .. })));
    }

    #[test]
    fn test_constraint_messages_and_arguments() {
        let constraint = Rule::MinLength(3).check("title", &json!("a")).unwrap();
        assert_eq!(constraint.rule, "minLength");
        assert_eq!(constraint.message, "title must be longer than or equal to 3 characters");
        assert_eq!(constraint.arguments, vec!["3"]);

        let constraint = Rule::Min(1.5).check("bits", &json!(1)).unwrap();
        assert_eq!(constraint.message, "bits must not be less than 1.5");

        let constraint = Rule::IsNotEmpty.check("title", &Value::Null).unwrap();
        assert_eq!(constraint.message, "title should not be empty");
        assert!(constraint.arguments.is_empty());
    }

    #[test]
    fn test_rule_serde_shape() {
        let rules: Vec<Rule> = serde_json::from_value(json!([
            { "rule": "isNotEmpty" },
            { "rule": "minLength", "value": 3 },
            { "rule": "isIn", "value": ["tips", "bits"] },
            { "rule": "matches", "value": "^a+$" }
        ]))
        .unwrap();

        assert_eq!(rules.len(), 4);
        assert_eq!(rules[1].name(), "minLength");
        assert!(matches!(&rules[3], Rule::Matches(p) if p.as_str() == "^a+$"));

        let back = serde_json::to_value(&rules[1]).unwrap();
        assert_eq!(back, json!({ "rule": "minLength", "value": 3 }));

        let back = serde_json::to_value(&rules[3]).unwrap();
        assert_eq!(back, json!({ "rule": "matches", "value": "^a+$" }));
    }

    #[test]
    fn test_bad_pattern_fails_to_deserialize() {
        let result: Result<Rule, _> = serde_json::from_value(json!({ "rule": "matches", "value": "(" }));
        assert!(result.is_err());
    }
}
