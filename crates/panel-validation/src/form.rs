//! Dirty-tracked form validation state.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use panel_i18n::Translate;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::FormError;
use crate::failure::ExternalFailure;
use crate::issue::ValidationIssue;
use crate::messages::MessageRenderer;
use crate::notify::{Notification, Notifier};
use crate::schema::ValidationEngine;

/// Headline of the notification raised for structured failures.
pub const ISSUES_HEADLINE: &str = "Unexpected errors during validation";

/// Coarse state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormState {
    /// No field touched.
    Clean,
    /// Some fields touched, none of them failing.
    PartiallyDirty,
    /// At least one touched field is failing.
    Invalid,
}

/// What an input needs to render its error state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProps {
    /// Field name.
    pub field: String,
    /// CSS class, `prop-<field>`.
    pub class_name: String,
    /// Whether the field is dirty and failing.
    pub is_invalid: bool,
    /// First rendered message, only when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_message: Option<String>,
}

impl FieldProps {
    /// Input handler: marks the field dirty.
    pub fn on_input(&self, form: &mut FormValidator) {
        form.mark_dirty(&self.field);
    }
}

/// Proof that a save was started; hand it back to
/// [`FormValidator::finish_save`].
#[derive(Debug)]
#[must_use = "a started save must be finished"]
pub struct SaveTicket {
    generation: u64,
}

/// Validation state of one form instance.
///
/// Errors are stored as reported; only those on fields the user has touched
/// are shown or block submission.
pub struct FormValidator {
    renderer: MessageRenderer,
    notifier: Arc<dyn Notifier>,
    dirty: BTreeSet<String>,
    errors: Vec<ValidationIssue>,
    generation: u64,
    saving: bool,
}

impl FormValidator {
    /// Create a validator in the clean state.
    pub fn new(translator: Arc<dyn Translate>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            renderer: MessageRenderer::new(translator),
            notifier,
            dirty: BTreeSet::new(),
            errors: Vec::new(),
            generation: 0,
            saving: false,
        }
    }

    /// Override the label of a field in messages.
    #[must_use]
    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.renderer = self.renderer.with_label(field, label);
        self
    }

    /// Override several labels.
    #[must_use]
    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.renderer = self.renderer.with_labels(labels);
        self
    }

    /// The message renderer in use.
    pub fn renderer(&self) -> &MessageRenderer {
        &self.renderer
    }

    /// Mark a field as touched. Returns `true` if it was not dirty yet.
    pub fn mark_dirty(&mut self, field: &str) -> bool {
        if self.dirty.contains(field) {
            return false;
        }
        debug!(field, "dirtying field");
        self.dirty.insert(field.to_string());
        true
    }

    /// Whether a field has been touched.
    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Touched fields.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Replace the stored errors with the result of a validation pass.
    pub fn set_validation_result(&mut self, issues: Vec<ValidationIssue>) {
        self.errors = issues;
    }

    /// Drop all stored errors.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Run a validation engine and store its result. Returns `true` when the
    /// candidate passed.
    pub fn revalidate(&mut self, engine: &dyn ValidationEngine, candidate: &Value) -> bool {
        match engine.validate_value(candidate) {
            Ok(()) => {
                self.clear_errors();
                true
            }
            Err(issues) => {
                self.set_validation_result(issues);
                false
            }
        }
    }

    /// Back to the clean state. Saves started before the reset become stale.
    pub fn reset(&mut self) {
        self.dirty.clear();
        self.errors.clear();
        self.generation += 1;
        self.saving = false;
    }

    /// Stored errors, including those on untouched fields.
    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// Errors on touched fields.
    pub fn visible_errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors
            .iter()
            .filter(|issue| self.dirty.contains(&issue.property))
    }

    /// Whether submission must be blocked.
    pub fn has_blocking_errors(&self) -> bool {
        self.visible_errors().next().is_some()
    }

    /// Current coarse state.
    pub fn state(&self) -> FormState {
        if self.has_blocking_errors() {
            FormState::Invalid
        } else if self.dirty.is_empty() {
            FormState::Clean
        } else {
            FormState::PartiallyDirty
        }
    }

    /// Rendered messages per field, for every stored error.
    pub fn errors_per_attribute(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for issue in &self.errors {
            map.entry(issue.property.clone())
                .or_default()
                .extend(self.renderer.render_issue(issue));
        }
        map
    }

    /// One rendered line per constraint, as shown in notifications.
    pub fn errors_list(&self, issues: &[ValidationIssue]) -> Vec<String> {
        self.renderer.render_all(issues)
    }

    /// Props for the input bound to `field`.
    pub fn field_props(&self, field: &str) -> FieldProps {
        let is_invalid = self.visible_errors().any(|issue| issue.property == field);
        let helper_message = if is_invalid {
            self.errors
                .iter()
                .filter(|issue| issue.property == field)
                .find_map(|issue| issue.first().map(|c| self.renderer.render(field, c)))
        } else {
            None
        };

        FieldProps {
            field: field.to_string(),
            class_name: format!("prop-{field}"),
            is_invalid,
            helper_message,
        }
    }

    /// Surface a failure reported from outside the form.
    ///
    /// Structured issues mark their fields dirty and are stored; a message
    /// clears structured errors. Both raise a notification. `Cleared` only
    /// drops stored errors.
    pub fn ingest_external_failure(&mut self, failure: impl Into<ExternalFailure>) {
        match failure.into() {
            ExternalFailure::Issues(issues) => {
                error!(fields = issues.len(), "errors during validation");
                for issue in &issues {
                    self.mark_dirty(&issue.property);
                }
                let lines = self.errors_list(&issues);
                self.errors = issues;
                self.notifier
                    .notify(Notification::error(ISSUES_HEADLINE).with_lines(lines));
            }
            ExternalFailure::Message(message) => {
                error!(%message, "errors during validation");
                self.errors.clear();
                self.notifier.notify(Notification::error(message));
            }
            ExternalFailure::Cleared => self.errors.clear(),
        }
    }

    /// Start a save.
    ///
    /// Refused while touched fields are failing or another save is running.
    pub fn begin_save(&mut self) -> Result<SaveTicket, FormError> {
        if self.saving {
            return Err(FormError::SaveInFlight);
        }
        let blocking = self.visible_errors().count();
        if blocking > 0 {
            return Err(FormError::Blocked(blocking));
        }
        self.saving = true;
        Ok(SaveTicket {
            generation: self.generation,
        })
    }

    /// Finish a save with its outcome.
    ///
    /// Returns `false` when the ticket predates a [`reset`](Self::reset); its
    /// outcome is discarded.
    pub fn finish_save(&mut self, ticket: SaveTicket, outcome: Result<(), ExternalFailure>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding outcome of stale save"
            );
            return false;
        }
        self.saving = false;
        match outcome {
            Ok(()) => self.clear_errors(),
            Err(failure) => self.ingest_external_failure(failure),
        }
        true
    }

    /// Whether a save is running.
    pub fn is_saving(&self) -> bool {
        self.saving
    }
}

impl std::fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidator")
            .field("dirty", &self.dirty)
            .field("errors", &self.errors.len())
            .field("generation", &self.generation)
            .field("saving", &self.saving)
            .finish_non_exhaustive()
    }
}
