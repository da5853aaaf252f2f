//! Validation issues: one per failing field, with the failed constraints.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One failed rule on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Rule name, e.g. `isNotEmpty` or `minLength`.
    pub rule: String,
    /// Default (untranslated) message.
    pub message: String,
    /// Rule arguments, substituted as `$constraint1`, `$constraint2`, ...
    pub arguments: Vec<String>,
}

impl Constraint {
    /// Create a constraint without arguments.
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            arguments: Vec::new(),
        }
    }

    /// Attach rule arguments.
    #[must_use]
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Arguments for template substitution.
    ///
    /// Constraints received from the server carry no separate arguments; their
    /// message is split on `|` instead.
    pub fn template_arguments(&self) -> Vec<&str> {
        if self.arguments.is_empty() {
            self.message.split('|').collect()
        } else {
            self.arguments.iter().map(String::as_str).collect()
        }
    }
}

/// A field that failed validation.
///
/// Serializes as `{"property": "title", "constraints": {"isNotEmpty": "..."}}`,
/// keeping constraint order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Field name.
    pub property: String,
    /// Failed constraints, in the order they were reported.
    #[serde(default, with = "constraint_map")]
    pub constraints: Vec<Constraint>,
}

impl ValidationIssue {
    /// Create an issue with no constraints.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            constraints: Vec::new(),
        }
    }

    /// Add a failed constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Shorthand for a constraint with a rule and message.
    #[must_use]
    pub fn constraint(self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_constraint(Constraint::new(rule, message))
    }

    /// The first reported constraint.
    pub fn first(&self) -> Option<&Constraint> {
        self.constraints.first()
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.constraints.iter().map(|c| c.message.as_str()).collect();
        write!(f, "{}: {}", self.property, messages.join(", "))
    }
}

mod constraint_map {
    use super::{
        Constraint, Deserializer, MapAccess, SerializeMap, Serializer, Visitor, fmt,
    };

    pub fn serialize<S: Serializer>(constraints: &[Constraint], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(constraints.len()))?;
        for constraint in constraints {
            map.serialize_entry(&constraint.rule, &constraint.message)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Constraint>, D::Error> {
        deserializer.deserialize_map(ConstraintVisitor)
    }

    struct ConstraintVisitor;

    impl<'de> Visitor<'de> for ConstraintVisitor {
        type Value = Vec<Constraint>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of rule names to messages")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut constraints = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((rule, message)) = access.next_entry::<String, String>()? {
                constraints.push(Constraint::new(rule, message));
            }
            Ok(constraints)
        }
    }
}
