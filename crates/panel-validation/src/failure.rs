//! Failures reported from outside the form: a server rejection, a transport
//! error, or a cleared result after a successful re-validation.

use serde_json::Value;

use crate::issue::ValidationIssue;

/// A failure handed to [`FormValidator::ingest_external_failure`].
///
/// [`FormValidator::ingest_external_failure`]: crate::FormValidator::ingest_external_failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalFailure {
    /// Structured per-field issues.
    Issues(Vec<ValidationIssue>),
    /// A single message.
    Message(String),
    /// Nothing failed; clear stored errors.
    Cleared,
}

impl ExternalFailure {
    /// Wrap any error as a message.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::Message(err.to_string())
    }

    /// Interpret a server response body.
    ///
    /// Accepts `{"errors": [issue, ...]}`, a bare issue array, a string,
    /// `{"message": "..."}` or `null`. Anything else is reported verbatim.
    pub fn from_response(body: &Value) -> Self {
        match body {
            Value::Null => Self::Cleared,
            Value::String(message) => Self::Message(message.clone()),
            Value::Array(_) => issues_or_message(body),
            Value::Object(map) => {
                if let Some(errors) = map.get("errors") {
                    issues_or_message(errors)
                } else if let Some(Value::String(message)) = map.get("message") {
                    Self::Message(message.clone())
                } else {
                    Self::Message(body.to_string())
                }
            }
            other => Self::Message(other.to_string()),
        }
    }

    /// Whether this clears errors without reporting anything.
    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }
}

fn issues_or_message(value: &Value) -> ExternalFailure {
    match serde_json::from_value::<Vec<ValidationIssue>>(value.clone()) {
        Ok(issues) if issues.is_empty() => ExternalFailure::Cleared,
        Ok(issues) => ExternalFailure::Issues(issues),
        Err(_) => match value {
            Value::String(message) => ExternalFailure::Message(message.clone()),
            other => ExternalFailure::Message(other.to_string()),
        },
    }
}

impl From<Vec<ValidationIssue>> for ExternalFailure {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        Self::Issues(issues)
    }
}

impl From<&str> for ExternalFailure {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for ExternalFailure {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl<T: Into<ExternalFailure>> From<Option<T>> for ExternalFailure {
    fn from(failure: Option<T>) -> Self {
        failure.map_or(Self::Cleared, Into::into)
    }
}
