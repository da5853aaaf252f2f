//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use panel_grid::{Align, FilterKind};
use panel_validation::{FieldProps, FormState, Notification};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;
use crate::pages::PageInfo;

/// Widest a table cell gets before it is truncated.
const MAX_CELL_WIDTH: usize = 40;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// One column of a grid configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    /// Field name.
    pub key: String,
    /// Header text.
    pub title: String,
    /// Sorting enabled.
    pub sortable: bool,
    /// Hidden by default.
    pub hidden: bool,
    /// Cell alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    /// Width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Filter control, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterKind>,
}

/// A grid configuration for display.
#[derive(Debug, Clone, Serialize)]
pub struct GridSummary {
    /// Columns in order.
    pub columns: Vec<ColumnSummary>,
}

impl TableDisplay for GridSummary {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "{:<16}  {:<24}  {:<8}  {:<6}  {:<6}  {:>5}  {:<8}",
            "COLUMN", "TITLE", "SORTABLE", "HIDDEN", "ALIGN", "WIDTH", "FILTER"
        )?;
        writeln!(writer, "{}", "─".repeat(87))?;

        for column in &self.columns {
            writeln!(
                writer,
                "{:<16}  {:<24}  {:<8}  {:<6}  {:<6}  {:>5}  {:<8}",
                truncate(&column.key, 16),
                truncate(&column.title, 24),
                yes_no(column.sortable),
                yes_no(column.hidden),
                column.align.map_or("-", align_name),
                column.width.map_or_else(|| "-".to_string(), |w| w.to_string()),
                column.filter.map_or("-", filter_name),
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} column(s)", self.columns.len())?;
        Ok(())
    }
}

/// Rows of a grid after filtering and sorting.
#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    /// Header texts.
    pub titles: Vec<String>,
    /// Field names, parallel to `titles`.
    pub keys: Vec<String>,
    /// Cell values, one entry per key.
    pub rows: Vec<Vec<Value>>,
    /// Rows before filtering.
    pub total: usize,
}

impl TableDisplay for GridView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.rows.is_empty() {
            writeln!(writer, "No matching rows ({} total)", self.total)?;
            return Ok(());
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| truncate(&cell_text(v), MAX_CELL_WIDTH)).collect())
            .collect();

        let widths: Vec<usize> = self
            .titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(title.trim().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .titles
            .iter()
            .zip(&widths)
            .map(|(title, width)| pad(&title.trim().to_uppercase(), *width))
            .collect();
        writeln!(writer, "{}", header.join("  ").trim_end())?;
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(writer, "{}", "─".repeat(rule_width))?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect();
            writeln!(writer, "{}", line.join("  ").trim_end())?;
        }

        writeln!(writer)?;
        writeln!(writer, "Showing: {} of {} row(s)", self.rows.len(), self.total)?;
        Ok(())
    }
}

/// Outcome of validating a candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Form state after validation.
    pub state: FormState,
    /// Whether submission would be allowed.
    pub can_submit: bool,
    /// Props of every schema field.
    pub fields: Vec<FieldProps>,
    /// Fields failing validation, touched or not.
    pub failing: Vec<String>,
    /// Notifications raised while ingesting a server response.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}

impl TableDisplay for ValidationReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Form state: {}", state_name(self.state))?;
        writeln!(writer, "Can submit: {}", yes_no(self.can_submit))?;
        writeln!(writer)?;

        writeln!(writer, "{:<16}  {:<8}  {}", "FIELD", "STATUS", "MESSAGE")?;
        writeln!(writer, "{}", "─".repeat(64))?;
        for field in &self.fields {
            let status = if field.is_invalid {
                "invalid"
            } else if self.failing.contains(&field.field) {
                "pending"
            } else {
                "ok"
            };
            writeln!(
                writer,
                "{:<16}  {:<8}  {}",
                truncate(&field.field, 16),
                status,
                field.helper_message.as_deref().unwrap_or("")
            )?;
        }

        for notification in &self.notifications {
            writeln!(writer)?;
            writeln!(writer, "[{}] {notification}", notification.severity)?;
        }
        Ok(())
    }
}

/// Built-in pages.
#[derive(Debug, Clone, Serialize)]
pub struct PageList {
    /// Pages.
    pub pages: Vec<PageInfo>,
}

impl TableDisplay for PageList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{:<14}  {:<9}  {}", "PAGE", "COMMAND", "DESCRIPTION")?;
        writeln!(writer, "{}", "─".repeat(60))?;
        for page in &self.pages {
            writeln!(writer, "{:<14}  {:<9}  {}", page.name, page.command, page.description)?;
        }
        Ok(())
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn align_name(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    }
}

fn filter_name(kind: FilterKind) -> &'static str {
    match kind {
        FilterKind::String => "string",
        FilterKind::Number => "number",
        FilterKind::Boolean => "boolean",
        FilterKind::Enum => "enum",
        FilterKind::List => "list",
    }
}

fn state_name(state: FormState) -> &'static str {
    match state {
        FormState::Clean => "clean",
        FormState::PartiallyDirty => "partially dirty",
        FormState::Invalid => "invalid",
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
