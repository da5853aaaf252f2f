//! Collector for building validation issue lists fluently.

use crate::issue::{Constraint, ValidationIssue};

/// Collects failed constraints, merging those on the same field into one
/// issue.
///
/// # Example
///
/// ```
/// use panel_validation::{Constraint, IssueCollector};
///
/// let result = IssueCollector::new()
///     .check("title", Some(Constraint::new("isNotEmpty", "title should not be empty")))
///     .check("title", None)
///     .finish();
///
/// assert_eq!(result.unwrap_err().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Record a constraint failure, if any.
    #[must_use]
    pub fn check(mut self, property: &str, failure: Option<Constraint>) -> Self {
        if let Some(constraint) = failure {
            self.push(property, constraint);
        }
        self
    }

    /// Add a validation check.
    ///
    /// The closure returns `Ok(())` when the field passes, or the failed
    /// constraint.
    #[must_use]
    pub fn validate<F>(self, property: &str, check: F) -> Self
    where
        F: FnOnce() -> Result<(), Constraint>,
    {
        self.check(property, check().err())
    }

    /// Record a failure in place.
    pub fn push(&mut self, property: &str, constraint: Constraint) {
        match self.issues.iter_mut().find(|i| i.property == property) {
            Some(issue) => issue.constraints.push(constraint),
            None => self
                .issues
                .push(ValidationIssue::new(property).with_constraint(constraint)),
        }
    }

    /// Check if any issues have been collected.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Number of fields with issues.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Finish collection.
    ///
    /// Returns `Ok(())` if every check passed, or all issues in the order
    /// their fields first failed.
    pub fn finish(self) -> Result<(), Vec<ValidationIssue>> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self.issues)
        }
    }

    /// Consume and return all collected issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}
