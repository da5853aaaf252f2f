//! Rendering of constraint messages through the translation catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use panel_i18n::{Translate, capitalize, decapitalize};
use regex::{Captures, Regex};

use crate::issue::{Constraint, ValidationIssue};

/// Label used when neither an override nor a catalog entry names the field.
pub const FALLBACK_LABEL: &str = "this value";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(property|constraint(\d+))").unwrap_or_else(|_| unreachable!()));

/// Turns constraints into user-facing messages.
///
/// Templates live under `errors.<rule>` in the catalog and may reference
/// `$property` and `$constraint1`, `$constraint2`, ...
#[derive(Clone)]
pub struct MessageRenderer {
    translator: Arc<dyn Translate>,
    labels: BTreeMap<String, String>,
}

impl MessageRenderer {
    /// Create a renderer.
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self {
            translator,
            labels: BTreeMap::new(),
        }
    }

    /// Override the label of a field.
    #[must_use]
    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
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
        self.labels
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Human label of a field.
    pub fn label(&self, field: &str) -> String {
        if let Some(label) = self.labels.get(field) {
            return label.clone();
        }
        self.translator
            .lookup(&format!("properties.{field}"))
            .or_else(|| self.translator.lookup("properties.thisvalue"))
            .unwrap_or(FALLBACK_LABEL)
            .to_string()
    }

    /// Render one constraint of a field.
    pub fn render(&self, property: &str, constraint: &Constraint) -> String {
        let key = format!("errors.{}", decapitalize(&constraint.rule));
        let template = self
            .translator
            .lookup(&key)
            .unwrap_or(constraint.message.as_str());

        let label = self.label(property);
        let arguments = constraint.template_arguments();
        let text = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            match caps.get(2) {
                None => label.clone(),
                Some(index) => index
                    .as_str()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|n| arguments.get(n))
                    .map_or_else(|| caps[0].to_string(), |arg| (*arg).to_string()),
            }
        });
        capitalize(&text)
    }

    /// Render every constraint of an issue.
    pub fn render_issue(&self, issue: &ValidationIssue) -> Vec<String> {
        issue
            .constraints
            .iter()
            .map(|c| self.render(&issue.property, c))
            .collect()
    }

    /// One line per constraint across all issues.
    pub fn render_all(&self, issues: &[ValidationIssue]) -> Vec<String> {
        issues.iter().flat_map(|i| self.render_issue(i)).collect()
    }
}

impl std::fmt::Debug for MessageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRenderer")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_i18n::{Catalog, Identity};
    use test_case::test_case;

    fn catalog() -> Arc<dyn Translate> {
        Arc::new(
            Catalog::new()
                .with_entry("properties.title", "název")
                .with_entry("errors.isNotEmpty", "$property nesmí být prázdný")
                .with_entry("errors.minLength", "$property musí mít alespoň $constraint1 znaků"),
        )
    }

    #[test_case("title", "název" ; "catalog label")]
    #[test_case("options", "this value" ; "fallback label")]
    fn test_label(field: &str, expected: &str) {
        assert_eq!(MessageRenderer::new(catalog()).label(field), expected);
    }

    #[test]
    fn test_label_override_wins() {
        let renderer = MessageRenderer::new(catalog()).with_label("title", "Poll title");
        assert_eq!(renderer.label("title"), "Poll title");
    }

    #[test]
    fn test_thisvalue_entry() {
        let translator: Arc<dyn Translate> =
            Arc::new(Catalog::new().with_entry("properties.thisvalue", "tato hodnota"));
        assert_eq!(MessageRenderer::new(translator).label("anything"), "tato hodnota");
    }

    #[test]
    fn test_render_with_template() {
        let renderer = MessageRenderer::new(catalog());
        let constraint = Constraint::new("isNotEmpty", "title should not be empty");
        assert_eq!(renderer.render("title", &constraint), "Název nesmí být prázdný");

        let constraint = Constraint::new("minLength", "too short").with_arguments(["3"]);
        assert_eq!(renderer.render("title", &constraint), "Název musí mít alespoň 3 znaků");
    }

    #[test]
    fn test_render_capitalized_rule_uses_lowercase_key() {
        let renderer = MessageRenderer::new(catalog());
        let constraint = Constraint::new("IsNotEmpty", "ignored");
        assert_eq!(renderer.render("title", &constraint), "Název nesmí být prázdný");
    }

    #[test]
    fn test_render_without_template_uses_raw_message() {
        let renderer = MessageRenderer::new(Arc::new(Identity));
        let constraint = Constraint::new("isNotEmpty", "title should not be empty");
        assert_eq!(renderer.render("title", &constraint), "Title should not be empty");
    }

    #[test]
    fn test_raw_message_placeholders() {
        let renderer = MessageRenderer::new(Arc::new(Identity)).with_label("bits", "Bits");
        let constraint =
            Constraint::new("min", "$property must be at least $constraint1").with_arguments(["5"]);
        assert_eq!(renderer.render("bits", &constraint), "Bits must be at least 5");
    }

    #[test]
    fn test_unknown_argument_left_in_place() {
        let translator: Arc<dyn Translate> =
            Arc::new(Catalog::new().with_entry("errors.max", "at most $constraint2"));
        let constraint = Constraint::new("max", "x").with_arguments(["10"]);
        assert_eq!(
            MessageRenderer::new(translator).render("x", &constraint),
            "At most $constraint2"
        );
    }

    #[test]
    fn test_render_all() {
        let renderer = MessageRenderer::new(Arc::new(Identity));
        let issues = vec![
            ValidationIssue::new("title")
                .constraint("isNotEmpty", "title should not be empty")
                .constraint("minLength", "title is too short"),
            ValidationIssue::new("options").constraint("arrayMinSize", "options too small"),
        ];
        assert_eq!(
            renderer.render_all(&issues),
            vec!["Title should not be empty", "Title is too short", "Options too small"]
        );
    }
}
