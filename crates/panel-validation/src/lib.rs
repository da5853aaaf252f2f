//! Form validation for the admin panel.
//!
//! A [`Schema`] lists the rules of each form field and checks a candidate
//! object into a list of [`ValidationIssue`]s. A [`FormValidator`] keeps
//! those issues together with the set of fields the user has touched, and
//! only shows (and only blocks submission on) errors of touched fields.
//!
//! # Local validation
//!
//! ```
//! use std::sync::Arc;
//! use panel_i18n::Identity;
//! use panel_validation::{FormValidator, RecordingNotifier, Rule, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new().field("title", [Rule::IsNotEmpty])?;
//! let mut form = FormValidator::new(Arc::new(Identity), Arc::new(RecordingNotifier::new()));
//!
//! form.revalidate(&schema, &json!({ "title": "" }));
//! // Untouched: the error is stored but not shown.
//! assert!(!form.field_props("title").is_invalid);
//!
//! form.mark_dirty("title");
//! let props = form.field_props("title");
//! assert!(props.is_invalid);
//! assert_eq!(props.helper_message.as_deref(), Some("Title should not be empty"));
//! # Ok::<(), panel_validation::SchemaError>(())
//! ```
//!
//! # Server failures
//!
//! Failures reported by the server go through
//! [`FormValidator::ingest_external_failure`], which accepts issue lists,
//! plain messages or nothing at all (see [`ExternalFailure`]), and raises a
//! [`Notification`] through the configured [`Notifier`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod error;
mod failure;
mod form;
mod issue;
mod messages;
mod notify;
mod rules;
mod schema;

pub use builder::IssueCollector;
pub use error::{FormError, SchemaError, SchemaResult};
pub use failure::ExternalFailure;
pub use form::{FieldProps, FormState, FormValidator, ISSUES_HEADLINE, SaveTicket};
pub use issue::{Constraint, ValidationIssue};
pub use messages::{FALLBACK_LABEL, MessageRenderer};
pub use notify::{Notification, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use rules::{Pattern, Rule};
pub use schema::{FieldRules, Schema, ValidationEngine};

#[cfg(test)]
mod tests;
