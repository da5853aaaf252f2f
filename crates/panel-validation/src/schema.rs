//! Declarative validation schemas.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::IssueCollector;
use crate::error::{SchemaError, SchemaResult};
use crate::issue::ValidationIssue;
use crate::rules::Rule;

/// Something that validates a candidate object.
pub trait ValidationEngine {
    /// Validate a candidate, returning every failing field.
    fn validate_value(&self, candidate: &Value) -> Result<(), Vec<ValidationIssue>>;
}

/// Rules for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRules {
    /// Field name.
    pub field: String,
    /// Rules, checked in order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// An ordered list of fields and their rules.
///
/// Serializes as `[{"field": "title", "rules": [{"rule": "isNotEmpty"}]}]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldRules>", into = "Vec<FieldRules>")]
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> SchemaResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::EmptyField(self.fields.len()));
        }
        if self.fields.iter().any(|f| f.field == name) {
            return Err(SchemaError::DuplicateField(name));
        }
        self.fields.push(FieldRules {
            field: name,
            rules: rules.into_iter().collect(),
        });
        Ok(self)
    }

    /// Parse a schema from JSON.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let fields: Vec<FieldRules> = serde_json::from_str(json)?;
        Self::try_from(fields)
    }

    /// Declared fields, in order.
    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    /// Check a candidate object. Missing fields are checked as `null`.
    pub fn check(&self, candidate: &Value) -> Vec<ValidationIssue> {
        let mut collector = IssueCollector::new();
        for field in &self.fields {
            let value = candidate.get(&field.field).unwrap_or(&Value::Null);
            for rule in &field.rules {
                if let Some(constraint) = rule.check(&field.field, value) {
                    collector.push(&field.field, constraint);
                }
            }
        }
        collector.into_issues()
    }

    /// Serialize and check a typed candidate.
    pub fn validate<T: Serialize>(&self, candidate: &T) -> SchemaResult<Vec<ValidationIssue>> {
        let value = serde_json::to_value(candidate)?;
        if !value.is_object() {
            return Err(SchemaError::NotAnObject(kind_of(&value)));
        }
        Ok(self.check(&value))
    }
}

impl ValidationEngine for Schema {
    fn validate_value(&self, candidate: &Value) -> Result<(), Vec<ValidationIssue>> {
        let issues = self.check(candidate);
        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

impl TryFrom<Vec<FieldRules>> for Schema {
    type Error = SchemaError;

    fn try_from(fields: Vec<FieldRules>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.field.trim().is_empty() {
                return Err(SchemaError::EmptyField(index));
            }
            if !seen.insert(field.field.as_str()) {
                return Err(SchemaError::DuplicateField(field.field.clone()));
            }
        }
        Ok(Self { fields })
    }
}

impl From<Schema> for Vec<FieldRules> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
