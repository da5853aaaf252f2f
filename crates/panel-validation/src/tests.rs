//! Form state tests, including property-based tests with proptest.

use std::sync::Arc;

use crate::*;
use panel_i18n::{Catalog, Identity, Translate};
use proptest::prelude::*;
use serde_json::json;

fn form() -> (FormValidator, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    (FormValidator::new(Arc::new(Identity), notifier.clone()), notifier)
}

fn title_issue() -> ValidationIssue {
    ValidationIssue::new("title").constraint("isNotEmpty", "title should not be empty")
}

fn poll_schema() -> Schema {
    Schema::new()
        .field("title", [Rule::IsNotEmpty])
        .and_then(|s| s.field("options", [Rule::ArrayMinSize(2)]))
        .and_then(|s| {
            s.field(
                "type",
                [Rule::IsIn(vec!["tips".into(), "bits".into(), "normal".into(), "numbers".into()])],
            )
        })
        .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_new_form_is_clean() {
    let (form, _) = form();
    assert_eq!(form.state(), FormState::Clean);
    assert!(!form.has_blocking_errors());
    assert!(form.errors().is_empty());
}

#[test]
fn test_dirty_title_with_error_is_invalid() {
    let (mut form, _) = form();
    form.mark_dirty("title");
    form.set_validation_result(vec![title_issue()]);

    let props = form.field_props("title");
    assert!(props.is_invalid);
    assert_eq!(props.class_name, "prop-title");
    assert_eq!(props.helper_message.as_deref(), Some("Title should not be empty"));
    assert_eq!(form.state(), FormState::Invalid);
}

#[test]
fn test_template_drives_helper_message() {
    let translator: Arc<dyn Translate> = Arc::new(
        Catalog::new()
            .with_entry("properties.title", "title")
            .with_entry("errors.isNotEmpty", "$property is required"),
    );
    let mut form = FormValidator::new(translator, Arc::new(RecordingNotifier::new()));
    form.mark_dirty("title");
    form.set_validation_result(vec![title_issue()]);

    assert_eq!(
        form.field_props("title").helper_message.as_deref(),
        Some("Title is required")
    );
}

#[test]
fn test_errors_hidden_until_dirty() {
    let (mut form, _) = form();
    form.set_validation_result(vec![title_issue()]);

    assert!(!form.field_props("title").is_invalid);
    assert!(form.field_props("title").helper_message.is_none());
    assert_eq!(form.state(), FormState::Clean);
    assert_eq!(form.errors().len(), 1);

    let props = form.field_props("title");
    props.on_input(&mut form);
    assert!(form.field_props("title").is_invalid);
}

#[test]
fn test_state_transitions() {
    let (mut form, _) = form();
    form.mark_dirty("options");
    assert_eq!(form.state(), FormState::PartiallyDirty);

    form.set_validation_result(vec![title_issue()]);
    assert_eq!(form.state(), FormState::PartiallyDirty);

    form.mark_dirty("title");
    assert_eq!(form.state(), FormState::Invalid);

    form.set_validation_result(Vec::new());
    assert_eq!(form.state(), FormState::PartiallyDirty);

    form.reset();
    assert_eq!(form.state(), FormState::Clean);
}

#[test]
fn test_mark_dirty_reports_first_touch() {
    let (mut form, _) = form();
    assert!(form.mark_dirty("title"));
    assert!(!form.mark_dirty("title"));
    assert!(form.is_dirty("title"));
    assert_eq!(form.dirty_fields().collect::<Vec<_>>(), vec!["title"]);
}

#[test]
fn test_message_failure_clears_and_notifies() {
    let (mut form, notifier) = form();
    form.mark_dirty("title");
    form.set_validation_result(vec![title_issue()]);

    form.ingest_external_failure("Network error");

    assert!(form.errors().is_empty());
    assert!(!form.has_blocking_errors());
    let received = notifier.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].severity, Severity::Error);
    assert!(received[0].to_string().contains("Network error"));
}

#[test]
fn test_issue_failure_dirties_and_notifies() {
    let (mut form, notifier) = form();
    let issues = vec![
        title_issue(),
        ValidationIssue::new("options").constraint("arrayMinSize", "options must contain at least 2 elements"),
    ];

    form.ingest_external_failure(issues);

    assert!(form.is_dirty("title"));
    assert!(form.is_dirty("options"));
    assert!(form.field_props("options").is_invalid);

    let received = notifier.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].headline, ISSUES_HEADLINE);
    assert_eq!(
        received[0].lines,
        vec!["Title should not be empty", "Options must contain at least 2 elements"]
    );
}

#[test]
fn test_cleared_failure_is_silent() {
    let (mut form, notifier) = form();
    form.mark_dirty("title");
    form.set_validation_result(vec![title_issue()]);

    form.ingest_external_failure(None::<String>);

    assert!(form.errors().is_empty());
    assert!(notifier.received().is_empty());
    assert!(form.is_dirty("title"));
}

#[test]
fn test_error_failure_becomes_message() {
    let (mut form, notifier) = form();
    let err = std::io::Error::other("socket closed");
    form.ingest_external_failure(ExternalFailure::from_error(&err));
    assert_eq!(notifier.received()[0].headline, "socket closed");
}

#[test]
fn test_revalidate_against_schema() {
    let (mut form, _) = form();
    let schema = poll_schema();

    let valid = form.revalidate(&schema, &json!({ "title": "", "options": ["a"], "type": "normal" }));
    assert!(!valid);
    assert_eq!(form.errors().len(), 2);
    assert!(!form.has_blocking_errors());

    form.mark_dirty("options");
    assert_eq!(form.visible_errors().count(), 1);

    let valid = form.revalidate(&schema, &json!({ "title": "Q", "options": ["a", "b"], "type": "tips" }));
    assert!(valid);
    assert!(form.errors().is_empty());
}

#[test]
fn test_errors_per_attribute_and_labels() {
    let (form, _) = form();
    let mut form = form.with_labels([("title", "Poll title")]);
    form.set_validation_result(vec![
        ValidationIssue::new("title")
            .constraint("isNotEmpty", "$property should not be empty")
            .constraint("minLength", "$property is too short"),
        ValidationIssue::new("options").constraint("arrayMinSize", "$property is too small"),
    ]);

    let per_attribute = form.errors_per_attribute();
    assert_eq!(
        per_attribute["title"],
        vec!["Poll title should not be empty", "Poll title is too short"]
    );
    assert_eq!(per_attribute["options"], vec!["This value is too small"]);
}

#[test]
fn test_save_blocked_by_visible_errors() {
    let (mut form, _) = form();
    form.set_validation_result(vec![title_issue()]);
    let ticket = form.begin_save().unwrap();
    assert!(form.finish_save(ticket, Ok(())));

    form.set_validation_result(vec![title_issue()]);
    form.mark_dirty("title");
    assert_eq!(form.begin_save().unwrap_err(), FormError::Blocked(1));
}

#[test]
fn test_overlapping_saves_refused() {
    let (mut form, _) = form();
    let ticket = form.begin_save().unwrap();
    assert!(form.is_saving());
    assert_eq!(form.begin_save().unwrap_err(), FormError::SaveInFlight);

    assert!(form.finish_save(ticket, Ok(())));
    assert!(!form.is_saving());
    assert!(form.begin_save().is_ok());
}

#[test]
fn test_failed_save_ingests_failure() {
    let (mut form, notifier) = form();
    let ticket = form.begin_save().unwrap();

    assert!(form.finish_save(ticket, Err(vec![title_issue()].into())));
    assert!(form.field_props("title").is_invalid);
    assert_eq!(notifier.received().len(), 1);
}

#[test]
fn test_stale_save_discarded_after_reset() {
    let (mut form, notifier) = form();
    let ticket = form.begin_save().unwrap();

    form.reset();
    assert!(!form.is_saving());

    assert!(!form.finish_save(ticket, Err("Server error".into())));
    assert!(notifier.received().is_empty());
    assert_eq!(form.state(), FormState::Clean);
}

#[test]
fn test_server_response_roundtrip_into_form() {
    let (mut form, _) = form();
    let body = json!({
        "errors": [
            { "property": "type", "constraints": { "isIn": "type must be one of the following values: tips, bits" } }
        ]
    });

    form.ingest_external_failure(ExternalFailure::from_response(&body));
    assert_eq!(
        form.field_props("type").helper_message.as_deref(),
        Some("Type must be one of the following values: tips, bits")
    );
}

#[test]
fn test_helper_message_uses_first_server_constraint() {
    let (mut form, _) = form();
    let body: serde_json::Value = serde_json::from_str(
        r#"{"errors": [{"property": "title", "constraints": {
            "isNotEmpty": "title should not be empty",
            "arrayMinSize": "z sorts first alphabetically"
        }}]}"#,
    )
    .unwrap();

    form.ingest_external_failure(ExternalFailure::from_response(&body));
    assert_eq!(
        form.field_props("title").helper_message.as_deref(),
        Some("Title should not be empty")
    );
}

#[test]
fn test_issue_without_constraints_still_marks_field_invalid() {
    let (mut form, _) = form();
    form.mark_dirty("title");
    form.set_validation_result(vec![ValidationIssue::new("title")]);

    let props = form.field_props("title");
    assert!(form.has_blocking_errors());
    assert_eq!(form.state(), FormState::Invalid);
    assert!(props.is_invalid);
    assert!(props.helper_message.is_none());
}

// =============================================================================
// Property-based tests with proptest
// =============================================================================

const FIELDS: &[&str] = &["title", "options", "type", "bits", "tips"];

fn field() -> impl Strategy<Value = String> {
    prop::sample::select(FIELDS).prop_map(str::to_string)
}

fn issues() -> impl Strategy<Value = Vec<ValidationIssue>> {
    prop::collection::vec(
        field().prop_map(|f| ValidationIssue::new(f.clone()).constraint("isNotEmpty", format!("{f} should not be empty"))),
        0..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_untouched_fields_never_invalid(
        issues in issues(),
        dirty in prop::collection::vec(field(), 0..5),
        target in field(),
    ) {
        let (mut form, _) = form();
        for f in dirty.iter().filter(|f| **f != target) {
            form.mark_dirty(f);
        }
        form.set_validation_result(issues);
        prop_assert!(!form.field_props(&target).is_invalid);
    }

    #[test]
    fn prop_dirty_field_with_issue_is_invalid(issues in issues(), target in field()) {
        let (mut form, _) = form();
        let has_issue = issues.iter().any(|i| i.property == target);
        form.set_validation_result(issues);
        form.mark_dirty(&target);
        prop_assert_eq!(form.field_props(&target).is_invalid, has_issue);
    }

    #[test]
    fn prop_reset_restores_clean(
        issues in issues(),
        dirty in prop::collection::vec(field(), 0..5),
    ) {
        let (mut form, _) = form();
        for f in &dirty {
            form.mark_dirty(f);
        }
        form.set_validation_result(issues);
        form.reset();

        prop_assert_eq!(form.state(), FormState::Clean);
        prop_assert!(form.errors().is_empty());
        prop_assert_eq!(form.dirty_fields().count(), 0);
        for f in FIELDS {
            prop_assert!(!form.field_props(f).is_invalid);
        }
    }

    #[test]
    fn prop_set_validation_result_idempotent(
        issues in issues(),
        dirty in prop::collection::vec(field(), 0..5),
    ) {
        let (mut form, _) = form();
        for f in &dirty {
            form.mark_dirty(f);
        }
        form.set_validation_result(issues.clone());
        let first: Vec<ValidationIssue> = form.visible_errors().cloned().collect();
        form.set_validation_result(issues);
        let second: Vec<ValidationIssue> = form.visible_errors().cloned().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_blocking_iff_visible(
        issues in issues(),
        dirty in prop::collection::vec(field(), 0..5),
    ) {
        let (mut form, _) = form();
        for f in &dirty {
            form.mark_dirty(f);
        }
        form.set_validation_result(issues.clone());
        let expected = issues.iter().any(|i| dirty.contains(&i.property));
        prop_assert_eq!(form.has_blocking_errors(), expected);
        prop_assert_eq!(form.begin_save().is_err(), expected);
    }

    #[test]
    fn prop_min_length_counts_chars(text in "\\PC{0,12}", n in 0usize..12) {
        let failed = Rule::MinLength(n).check("title", &json!(text)).is_some();
        prop_assert_eq!(failed, text.chars().count() < n);
    }
}
