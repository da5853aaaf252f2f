//! Built-in page definitions.

use panel_grid::{Align, ColumnSpec, FilterKind, FilterOptions, Filtering, Record};
use panel_validation::{Rule, Schema, SchemaResult};
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::{FormPage, GridPage};

/// Label shown for commands without a permission.
pub const UNSET_PERMISSION: &str = "-- unset --";

/// Poll types accepted by the poll form.
pub const POLL_TYPES: [&str; 4] = ["tips", "bits", "normal", "numbers"];

/// A built-in page, as listed by `panel pages`.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// Name accepted by `--page`.
    pub name: &'static str,
    /// Command using it.
    pub command: &'static str,
    /// What the page shows.
    pub description: &'static str,
}

/// Every built-in page.
pub const PAGES: &[PageInfo] = &[
    PageInfo {
        name: "banned-songs",
        command: "grid",
        description: "Songs banned from song requests",
    },
    PageInfo {
        name: "bot-commands",
        command: "grid",
        description: "Core bot commands with their permissions",
    },
    PageInfo {
        name: "poll",
        command: "validate",
        description: "Poll editor form",
    },
];

/// Columns of a built-in grid page.
pub fn columns(page: GridPage) -> Vec<ColumnSpec<Value>> {
    match page {
        GridPage::BannedSongs => banned_songs(),
        GridPage::BotCommands => bot_commands(),
    }
}

/// Schema of a built-in form.
pub fn schema(page: FormPage) -> SchemaResult<Schema> {
    match page {
        FormPage::Poll => poll_schema(),
    }
}

fn text_field(row: &Value, name: &str) -> String {
    row.field(name)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Banned songs: thumbnail, video id, title and actions.
pub fn banned_songs() -> Vec<ColumnSpec<Value>> {
    vec![
        ColumnSpec::new("thumbnail")
            .label(" ")
            .align(Align::Center)
            .width(80)
            .sortable(false)
            .renderer(|row: &Value, _: &str| {
                json!(format!("https://img.youtube.com/vi/{}/1.jpg", text_field(row, "videoId")))
            }),
        ColumnSpec::new("videoId")
            .translation_key("responses.variable.id")
            .width(120)
            .filter(FilterKind::String),
        ColumnSpec::new("title").filter(FilterKind::String),
        ColumnSpec::new("actions")
            .label(" ")
            .width(130)
            .sortable(false)
            .renderer(|row: &Value, _: &str| json!(format!("https://youtu.be/{}", text_field(row, "videoId")))),
    ]
}

/// Bot commands: changed triggers are shown as `default -> command`.
pub fn bot_commands() -> Vec<ColumnSpec<Value>> {
    vec![
        ColumnSpec::new("command")
            .filter(FilterKind::String)
            .renderer(|row: &Value, _: &str| {
                let command = text_field(row, "command");
                let default = text_field(row, "defaultValue");
                if default.is_empty() || default == command {
                    json!(command)
                } else {
                    json!(format!("{default} -> {command}"))
                }
            }),
        ColumnSpec::new("name").filter(FilterKind::String),
        ColumnSpec::new("permission")
            .filtering(Filtering {
                options: FilterOptions {
                    show_disabled: Some(true),
                    disabled_name: Some(UNSET_PERMISSION.to_string()),
                    ..FilterOptions::default()
                },
                ..Filtering::new(FilterKind::Enum)
            })
            .renderer(|row: &Value, name: &str| match row.field(name) {
                None | Some(Value::Null) => json!(UNSET_PERMISSION),
                Some(value) => value,
            }),
        ColumnSpec::new("type").filter(FilterKind::List),
        ColumnSpec::new("actions")
            .label(" ")
            .align(Align::Right)
            .width(95)
            .sortable(false)
            .renderer(|row: &Value, _: &str| json!(format!("/commands/botcommands/edit/{}", text_field(row, "id")))),
    ]
}

/// Poll form: a title, at least two options and a known type.
pub fn poll_schema() -> SchemaResult<Schema> {
    Schema::new()
        .field("title", [Rule::IsNotEmpty])?
        .field("options", [Rule::ArrayMinSize(2)])?
        .field("type", [Rule::IsIn(POLL_TYPES.iter().map(|t| (*t).to_string()).collect())])
}
