//! Grid command implementation.
//!
//! Without rows, shows the derived column configuration. With rows, applies
//! the filters and sorts and shows the visible columns.

use std::io::Write;
use std::sync::Arc;

use panel_grid::{
    ColumnMaker, ColumnSpec, DisplayColumn, Filter, FilterOperation, GridConfig, Sorting,
    columns_from_json,
};
use serde_json::Value;
use tracing::debug;

use super::{Context, read_json, read_text};
use crate::cli::GridArgs;
use crate::error::CliError;
use crate::output::{ColumnSummary, GridSummary, GridView, OutputFormat};
use crate::pages;

/// Grid command executor.
pub struct GridCommand {
    ctx: Context,
}

impl GridCommand {
    /// Create a new grid command.
    #[must_use]
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Execute the grid command.
    ///
    /// # Errors
    ///
    /// Returns an error if inputs cannot be read, columns are rejected,
    /// or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &GridArgs,
    ) -> Result<(), CliError> {
        let maker = ColumnMaker::new(load_columns(args)?, Arc::clone(&self.ctx.translator))?;
        let config = maker.config();

        match &args.rows {
            None => format.write(writer, &summarize(&config)),
            Some(path) => {
                let rows: Vec<Value> = read_json(path)?;
                let view = render(&config, &rows, args)?;
                format.write(writer, &view)
            }
        }
    }
}

fn load_columns(args: &GridArgs) -> Result<Vec<ColumnSpec<Value>>, CliError> {
    match (&args.columns, args.page) {
        (_, Some(page)) => Ok(pages::columns(page)),
        (Some(path), None) => Ok(columns_from_json(&read_text(path)?)?),
        (None, None) => Err(CliError::InvalidArgument(
            "either --columns or --page is required".into(),
        )),
    }
}

/// Summarize a grid configuration for display.
pub fn summarize(config: &GridConfig<Value>) -> GridSummary {
    let columns = config
        .display_columns
        .iter()
        .map(|column| {
            let hints = config.layout_hints.get(&column.key);
            ColumnSummary {
                key: column.key.clone(),
                title: column.title.clone(),
                sortable: config.sort_config.get(&column.key).copied().unwrap_or(true),
                hidden: config.hidden_names.contains(&column.key),
                align: hints.and_then(|h| h.align),
                width: hints.and_then(|h| h.width),
                filter: config
                    .filter_setup
                    .iter()
                    .find(|f| f.name == column.key)
                    .map(|f| f.kind),
            }
        })
        .collect();
    GridSummary { columns }
}

/// Filter, sort and project rows.
///
/// # Errors
///
/// Returns an error if a filter or sort argument is malformed.
pub fn render(config: &GridConfig<Value>, rows: &[Value], args: &GridArgs) -> Result<GridView, CliError> {
    let filters = args
        .filters
        .iter()
        .map(|f| parse_filter(f))
        .collect::<Result<Vec<_>, _>>()?;
    let sorting = args
        .sorts
        .iter()
        .map(|s| {
            Sorting::parse(s)
                .ok_or_else(|| CliError::InvalidArgument(format!("invalid sort '{s}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut matched = config.filter_rows(rows, &filters);
    config.sort_rows(&mut matched, &sorting);
    debug!(total = rows.len(), matched = matched.len(), "rendered grid");

    let columns: Vec<&DisplayColumn<Value>> = if args.all_columns {
        config.display_columns.iter().collect()
    } else {
        config.visible_columns().collect()
    };

    Ok(GridView {
        titles: columns.iter().map(|c| c.title.clone()).collect(),
        keys: columns.iter().map(|c| c.key.clone()).collect(),
        rows: matched
            .iter()
            .map(|row| columns.iter().map(|c| config.cell_value(row, &c.key)).collect())
            .collect(),
        total: rows.len(),
    })
}

/// Parse `column=value` or `column:operation=value`.
///
/// The value is read as JSON when it parses, else as a plain string, so
/// `--filter 'type=["points"]'` selects a list.
///
/// # Errors
///
/// Returns an error if the `=` is missing or the operation is unknown.
pub fn parse_filter(spec: &str) -> Result<Filter, CliError> {
    let invalid = || CliError::InvalidArgument(format!("invalid filter '{spec}'"));

    let (lhs, raw) = spec.split_once('=').ok_or_else(invalid)?;
    let (column, operation) = match lhs.split_once(':') {
        Some((column, op)) => {
            let operation: FilterOperation =
                serde_json::from_value(Value::String(op.to_string())).map_err(|_| invalid())?;
            (column, Some(operation))
        }
        None => (lhs, None),
    };
    if column.is_empty() {
        return Err(invalid());
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    let filter = Filter::new(column, value);
    Ok(match operation {
        Some(operation) => filter.with_operation(operation),
        None => filter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_i18n::Identity;
    use serde_json::json;
    use std::path::PathBuf;

    fn args() -> GridArgs {
        GridArgs {
            columns: None,
            page: None,
            rows: Some(PathBuf::from("rows.json")),
            filters: Vec::new(),
            sorts: Vec::new(),
            all_columns: false,
        }
    }

    fn songs() -> Vec<Value> {
        vec![
            json!({ "videoId": "b", "title": "Never Gonna Give You Up" }),
            json!({ "videoId": "a", "title": "Gangnam Style" }),
            json!({ "videoId": "c", "title": "Darude - Sandstorm" }),
        ]
    }

    #[test]
    fn parse_filter_plain() {
        let filter = parse_filter("title=gonna").unwrap();
        assert_eq!(filter.column_name, "title");
        assert_eq!(filter.value, json!("gonna"));
        assert!(filter.operation.is_none());
    }

    #[test]
    fn parse_filter_with_operation_and_json() {
        let filter = parse_filter("plays:greaterThanOrEqual=20").unwrap();
        assert_eq!(filter.operation, Some(FilterOperation::GreaterThanOrEqual));
        assert_eq!(filter.value, json!(20));

        let filter = parse_filter(r#"type=["points","core"]"#).unwrap();
        assert_eq!(filter.value, json!(["points", "core"]));
    }

    #[test]
    fn parse_filter_rejects_malformed() {
        assert!(parse_filter("title").is_err());
        assert!(parse_filter("=x").is_err());
        assert!(parse_filter("title:like=x").is_err());
    }

    #[test]
    fn render_banned_songs() {
        let maker = ColumnMaker::new(pages::banned_songs(), Arc::new(Identity)).unwrap();
        let config = maker.config();
        let args = GridArgs {
            sorts: vec!["title".into()],
            ..args()
        };

        let view = render(&config, &songs(), &args).unwrap();
        assert_eq!(view.keys, vec!["thumbnail", "videoId", "title", "actions"]);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[0][2], json!("Darude - Sandstorm"));
        assert_eq!(view.rows[0][3], json!("https://youtu.be/c"));
    }

    #[test]
    fn render_filters_rows() {
        let maker = ColumnMaker::new(pages::banned_songs(), Arc::new(Identity)).unwrap();
        let config = maker.config();
        let args = GridArgs {
            filters: vec!["title=NA".into()],
            sorts: vec!["videoId:desc".into()],
            ..args()
        };

        let view = render(&config, &songs(), &args).unwrap();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0][1], json!("b"));
        assert_eq!(view.total, 3);
    }

    #[test]
    fn render_rejects_bad_sort() {
        let maker = ColumnMaker::new(pages::banned_songs(), Arc::new(Identity)).unwrap();
        let args = GridArgs {
            sorts: vec!["title:sideways".into()],
            ..args()
        };
        assert!(matches!(
            render(&maker.config(), &songs(), &args),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn summarize_bot_commands() {
        let maker = ColumnMaker::new(pages::bot_commands(), Arc::new(Identity)).unwrap();
        let summary = summarize(&maker.config());

        let actions = summary.columns.iter().find(|c| c.key == "actions").unwrap();
        assert!(!actions.sortable);
        assert_eq!(actions.width, Some(95));
        let permission = summary.columns.iter().find(|c| c.key == "permission").unwrap();
        assert_eq!(permission.filter, Some(panel_grid::FilterKind::Enum));
    }
}
