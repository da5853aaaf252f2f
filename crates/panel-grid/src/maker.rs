//! Derivation of grid configuration from column specs.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use panel_i18n::{Translate, capitalize};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::column::{CellRenderer, ColumnSpec, FilterKind, FilterOptions, Predicate, TableHints, ValueRenderer};
use crate::error::{GridError, GridResult};
use crate::filter::{Filter, default_matches};
use crate::record::Record;
use crate::sort::{SortDirection, Sorting, compare_values};

/// A column as the grid displays it.
#[derive(Debug, Clone)]
pub struct DisplayColumn<R> {
    /// Field name.
    pub key: String,
    /// Header text.
    pub title: String,
    /// Custom cell value, if any.
    pub renderer: Option<CellRenderer<R>>,
}

/// Input for the filter control builder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSetup {
    /// Field name.
    pub name: String,
    /// Header text, shared with the display column.
    pub title: String,
    /// Control kind.
    pub kind: FilterKind,
    /// Renderer for values shown in the control.
    #[serde(skip)]
    pub value_renderer: Option<ValueRenderer>,
    /// Control options.
    pub options: FilterOptions,
}

/// Everything a data grid needs, derived from a list of column specs.
#[derive(Debug, Clone)]
pub struct GridConfig<R> {
    /// One entry per spec, in spec order.
    pub display_columns: Vec<DisplayColumn<R>>,
    /// Width/alignment for columns that declare table hints.
    pub layout_hints: BTreeMap<String, TableHints>,
    /// Sort toggle per column.
    pub sort_config: BTreeMap<String, bool>,
    /// Columns hidden by default.
    pub hidden_names: BTreeSet<String>,
    /// Filter controls, for columns with a filtering block.
    pub filter_setup: Vec<FilterSetup>,
    /// Filter predicate per column.
    pub filter_predicates: BTreeMap<String, Predicate<R>>,
}

impl<R: Record + 'static> GridConfig<R> {
    /// Derive the configuration. Titles go through `translator`.
    pub fn build(columns: &[ColumnSpec<R>], translator: &dyn Translate) -> GridResult<Self> {
        check_columns(columns)?;
        Ok(Self::derive(columns, translator))
    }

    // Callers have already checked the column names.
    fn derive(columns: &[ColumnSpec<R>], translator: &dyn Translate) -> Self {
        let titles: Vec<String> = columns.iter().map(|c| title_of(c, translator)).collect();

        let display_columns = columns
            .iter()
            .zip(&titles)
            .map(|(column, title)| DisplayColumn {
                key: column.name.clone(),
                title: title.clone(),
                renderer: column.renderer.clone(),
            })
            .collect();

        let layout_hints = columns
            .iter()
            .filter_map(|c| c.table.map(|hints| (c.name.clone(), hints)))
            .collect();

        let sort_config = columns
            .iter()
            .map(|c| (c.name.clone(), c.is_sortable()))
            .collect();

        let hidden_names = columns
            .iter()
            .filter(|c| c.hidden)
            .map(|c| c.name.clone())
            .collect();

        let filter_setup = columns
            .iter()
            .zip(&titles)
            .filter_map(|(column, title)| {
                column.filtering.as_ref().map(|filtering| FilterSetup {
                    name: column.name.clone(),
                    title: title.clone(),
                    kind: filtering.kind,
                    value_renderer: filtering.value_renderer.clone(),
                    options: filtering.options.clone(),
                })
            })
            .collect();

        let filter_predicates = columns
            .iter()
            .map(|c| (c.name.clone(), predicate_of(c)))
            .collect();

        Self {
            display_columns,
            layout_hints,
            sort_config,
            hidden_names,
            filter_setup,
            filter_predicates,
        }
    }

    /// Display columns that are not hidden.
    pub fn visible_columns(&self) -> impl Iterator<Item = &DisplayColumn<R>> {
        self.display_columns
            .iter()
            .filter(|c| !self.hidden_names.contains(&c.key))
    }

    /// Look up a display column by name.
    pub fn column(&self, name: &str) -> Option<&DisplayColumn<R>> {
        self.display_columns.iter().find(|c| c.key == name)
    }

    /// Value of a cell: the column renderer if set, else the raw field.
    pub fn cell_value(&self, row: &R, name: &str) -> Value {
        match self.column(name).and_then(|c| c.renderer.as_ref()) {
            Some(renderer) => renderer.render(row, name),
            None => row.field(name).unwrap_or(Value::Null),
        }
    }

    /// Rows matching every filter. Filters on unknown columns are ignored.
    pub fn filter_rows<'a>(&self, rows: &'a [R], filters: &[Filter]) -> Vec<&'a R> {
        let active: Vec<(&Filter, &Predicate<R>)> = filters
            .iter()
            .filter_map(|filter| match self.filter_predicates.get(&filter.column_name) {
                Some(predicate) => Some((filter, predicate)),
                None => {
                    warn!(column = %filter.column_name, "ignoring filter on unknown column");
                    None
                }
            })
            .collect();

        rows.iter()
            .filter(|row| {
                active.iter().all(|(filter, predicate)| {
                    let value = self.cell_value(row, &filter.column_name);
                    predicate.matches(&value, filter, row)
                })
            })
            .collect()
    }

    /// Stable multi-column sort. Sorts on columns with sorting disabled or
    /// unknown columns are skipped.
    pub fn sort_rows(&self, rows: &mut [&R], sorting: &[Sorting]) {
        let keys: Vec<&Sorting> = sorting
            .iter()
            .filter(|s| {
                let enabled = self.sort_config.get(&s.column_name).copied().unwrap_or(false);
                if !enabled {
                    warn!(column = %s.column_name, "ignoring sort on non-sortable column");
                }
                enabled
            })
            .collect();

        if keys.is_empty() {
            return;
        }

        rows.sort_by(|a, b| {
            keys.iter().fold(Ordering::Equal, |ordering, key| {
                ordering.then_with(|| {
                    let left = self.cell_value(a, &key.column_name);
                    let right = self.cell_value(b, &key.column_name);
                    let ordering = compare_values(&left, &right);
                    match key.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
            })
        });
    }
}

/// Memoizing builder of a [`GridConfig`].
///
/// The configuration is computed on first use and reused until a different
/// column list (by pointer identity) or a new translator is installed.
pub struct ColumnMaker<R> {
    columns: Arc<[ColumnSpec<R>]>,
    translator: Arc<dyn Translate>,
    config: OnceCell<Arc<GridConfig<R>>>,
}

impl<R: Record + 'static> ColumnMaker<R> {
    /// Create a maker, rejecting duplicate or empty column names.
    pub fn new(
        columns: impl Into<Arc<[ColumnSpec<R>]>>,
        translator: Arc<dyn Translate>,
    ) -> GridResult<Self> {
        let columns = columns.into();
        check_columns(&columns)?;
        Ok(Self {
            columns,
            translator,
            config: OnceCell::new(),
        })
    }

    /// Current column specs.
    pub fn columns(&self) -> &Arc<[ColumnSpec<R>]> {
        &self.columns
    }

    /// Replace the column specs.
    ///
    /// Returns `true` when the cached configuration was invalidated, `false`
    /// when the same list was passed again.
    pub fn set_columns(&mut self, columns: Arc<[ColumnSpec<R>]>) -> GridResult<bool> {
        if Arc::ptr_eq(&self.columns, &columns) {
            return Ok(false);
        }
        check_columns(&columns)?;
        self.columns = columns;
        self.config = OnceCell::new();
        Ok(true)
    }

    /// Replace the translator, invalidating cached titles.
    pub fn set_translator(&mut self, translator: Arc<dyn Translate>) {
        self.translator = translator;
        self.config = OnceCell::new();
    }

    /// The grid configuration, computed once per column list.
    pub fn config(&self) -> Arc<GridConfig<R>> {
        Arc::clone(self.config.get_or_init(|| {
            debug!(columns = self.columns.len(), "deriving grid configuration");
            Arc::new(GridConfig::derive(&self.columns, self.translator.as_ref()))
        }))
    }
}

impl<R> std::fmt::Debug for ColumnMaker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnMaker")
            .field("columns", &self.columns.len())
            .field("cached", &self.config.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Parse column specs from JSON and check their names.
pub fn columns_from_json<R>(json: &str) -> GridResult<Vec<ColumnSpec<R>>> {
    let columns: Vec<ColumnSpec<R>> = serde_json::from_str(json)?;
    check_columns(&columns)?;
    Ok(columns)
}

fn check_columns<R>(columns: &[ColumnSpec<R>]) -> GridResult<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        if column.name.trim().is_empty() {
            return Err(GridError::EmptyName(index));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(GridError::DuplicateColumn(column.name.clone()));
        }
    }
    Ok(())
}

fn title_of<R>(column: &ColumnSpec<R>, translator: &dyn Translate) -> String {
    match &column.label {
        Some(label) => label.clone(),
        None => {
            let key = column.translation_key.as_deref().unwrap_or(&column.name);
            capitalize(&translator.translate(key))
        }
    }
}

fn predicate_of<R: 'static>(column: &ColumnSpec<R>) -> Predicate<R> {
    if let Some(predicate) = &column.predicate {
        return predicate.clone();
    }

    let kind = column.filter_kind();
    let options = column
        .filtering
        .as_ref()
        .map(|f| f.options.clone())
        .unwrap_or_default();
    Predicate::new(move |value, filter, _row| default_matches(kind, &options, value, filter))
}
