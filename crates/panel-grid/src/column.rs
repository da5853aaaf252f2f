//! Declarative column specifications.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::Filter;

/// Horizontal alignment of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Width and alignment hints for the table layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHints {
    /// Cell alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    /// Column width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// The kind of filter control a column offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Free text, matched as a case-insensitive substring.
    #[default]
    String,
    /// Numeric comparison.
    Number,
    /// True/false toggle.
    Boolean,
    /// One value out of a fixed set (permissions, poll types).
    #[serde(alias = "permission")]
    Enum,
    /// Any of several selected values.
    List,
}

/// Extra options for the filter control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Offer a "disabled" choice in the filter control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_disabled: Option<bool>,
    /// Label of the "disabled" choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_name: Option<String>,
    /// Value the "disabled" choice filters on; `null` cells compare equal to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_value: Option<String>,
    /// Selectable values for list filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_values: Vec<String>,
}

/// Renders a raw filter value for display in the filter control.
#[derive(Clone)]
pub struct ValueRenderer(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl ValueRenderer {
    /// Wrap a rendering function.
    pub fn new(render: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(render))
    }

    /// Render a value.
    pub fn render(&self, value: &str) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for ValueRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueRenderer(..)")
    }
}

/// Filtering block of a column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filtering {
    /// Filter control kind.
    #[serde(alias = "type")]
    pub kind: FilterKind,
    /// Optional renderer for values shown in the filter control.
    #[serde(skip)]
    pub value_renderer: Option<ValueRenderer>,
    /// Control options.
    #[serde(default)]
    pub options: FilterOptions,
}

impl Filtering {
    /// Create a filtering block of the given kind.
    #[must_use]
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Decides whether a row matches a filter: `(cell value, filter, row)`.
pub struct Predicate<R>(Arc<dyn Fn(&Value, &Filter, &R) -> bool + Send + Sync>);

impl<R> Predicate<R> {
    /// Wrap a predicate function.
    pub fn new(matches: impl Fn(&Value, &Filter, &R) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(matches))
    }

    /// Evaluate the predicate.
    pub fn matches(&self, value: &Value, filter: &Filter, row: &R) -> bool {
        (self.0)(value, filter, row)
    }
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R> fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Computes the value shown in a cell: `(row, column name)`.
pub struct CellRenderer<R>(Arc<dyn Fn(&R, &str) -> Value + Send + Sync>);

impl<R> CellRenderer<R> {
    /// Wrap a rendering function.
    pub fn new(render: impl Fn(&R, &str) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(render))
    }

    /// Render the cell for a row.
    pub fn render(&self, row: &R, column: &str) -> Value {
        (self.0)(row, column)
    }
}

impl<R> Clone for CellRenderer<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R> fmt::Debug for CellRenderer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellRenderer(..)")
    }
}

/// Declarative description of one grid column.
///
/// The declarative parts deserialize from camelCase JSON; the predicate and
/// cell renderer can only be attached in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct ColumnSpec<R> {
    /// Field name in the row record; unique within a grid.
    pub name: String,
    /// Translation key for the header; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_key: Option<String>,
    /// Literal header label, used verbatim when set.
    #[serde(default, alias = "translation", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Width and alignment hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableHints>,
    /// Whether sorting is enabled; `None` means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    /// Filtering block; columns without one get no filter control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtering: Option<Filtering>,
    /// Hidden by default.
    #[serde(default)]
    pub hidden: bool,
    /// Custom filter predicate replacing the default one.
    #[serde(skip)]
    pub predicate: Option<Predicate<R>>,
    /// Custom cell value.
    #[serde(skip)]
    pub renderer: Option<CellRenderer<R>>,
}

impl<R> ColumnSpec<R> {
    /// Create a column for the named field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation_key: None,
            label: None,
            table: None,
            sortable: None,
            filtering: None,
            hidden: false,
            predicate: None,
            renderer: None,
        }
    }

    /// Use a translation key for the header.
    #[must_use]
    pub fn translation_key(mut self, key: impl Into<String>) -> Self {
        self.translation_key = Some(key.into());
        self
    }

    /// Use a literal header label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the cell alignment.
    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.table.get_or_insert_with(TableHints::default).align = Some(align);
        self
    }

    /// Set the column width.
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.table.get_or_insert_with(TableHints::default).width = Some(width);
        self
    }

    /// Enable or disable sorting.
    #[must_use]
    pub const fn sortable(mut self, enabled: bool) -> Self {
        self.sortable = Some(enabled);
        self
    }

    /// Add a filter control of the given kind.
    #[must_use]
    pub fn filter(self, kind: FilterKind) -> Self {
        self.filtering(Filtering::new(kind))
    }

    /// Add a fully specified filtering block.
    #[must_use]
    pub fn filtering(mut self, filtering: Filtering) -> Self {
        self.filtering = Some(filtering);
        self
    }

    /// Set the selectable values of the filter control.
    #[must_use]
    pub fn list_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filtering
            .get_or_insert_with(|| Filtering::new(FilterKind::List))
            .options
            .list_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Render filter values with the given function.
    #[must_use]
    pub fn value_renderer(mut self, render: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.filtering.get_or_insert_with(Filtering::default).value_renderer =
            Some(ValueRenderer::new(render));
        self
    }

    /// Hide the column by default.
    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Replace the default filter predicate.
    #[must_use]
    pub fn predicate(
        mut self,
        matches: impl Fn(&Value, &Filter, &R) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Predicate::new(matches));
        self
    }

    /// Compute the cell value with the given function.
    #[must_use]
    pub fn renderer(mut self, render: impl Fn(&R, &str) -> Value + Send + Sync + 'static) -> Self {
        self.renderer = Some(CellRenderer::new(render));
        self
    }

    /// Whether sorting is enabled for this column.
    pub fn is_sortable(&self) -> bool {
        self.sortable.unwrap_or(true)
    }

    /// Filter kind used by the default predicate.
    pub fn filter_kind(&self) -> FilterKind {
        self.filtering.as_ref().map(|f| f.kind).unwrap_or_default()
    }
}
