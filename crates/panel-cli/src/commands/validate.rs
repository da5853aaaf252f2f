//! Validate command implementation.
//!
//! Runs a candidate through a schema with the requested fields touched, then
//! optionally feeds a server response through the save cycle, the way the
//! editor dialogs do.

use std::io::Write;
use std::sync::Arc;

use panel_validation::{ExternalFailure, FormValidator, RecordingNotifier, Schema};
use serde_json::Value;
use tracing::warn;

use super::{Context, read_json, read_text};
use crate::cli::ValidateArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, ValidationReport};
use crate::pages;

/// Validate command executor.
pub struct ValidateCommand {
    ctx: Context,
}

impl ValidateCommand {
    /// Create a new validate command.
    #[must_use]
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Execute the validate command.
    ///
    /// The report is written even when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Invalid`] if touched fields fail, or another
    /// error if inputs cannot be read or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &ValidateArgs,
    ) -> Result<(), CliError> {
        let schema = load_schema(args)?;
        let candidate: Value = read_json(&args.candidate)?;
        let response: Option<Value> = args.response.as_deref().map(read_json).transpose()?;

        let report = self.run(&schema, &candidate, args, response.as_ref());
        format.write(writer, &report)?;

        if report.can_submit {
            Ok(())
        } else {
            let blocking = report.fields.iter().filter(|f| f.is_invalid).count();
            Err(CliError::Invalid(blocking))
        }
    }

    /// Validate without touching the filesystem.
    pub fn run(
        &self,
        schema: &Schema,
        candidate: &Value,
        args: &ValidateArgs,
        response: Option<&Value>,
    ) -> ValidationReport {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut form = FormValidator::new(Arc::clone(&self.ctx.translator), notifier.clone())
            .with_labels(self.ctx.labels.clone());

        if args.all_dirty {
            for field in schema.fields() {
                form.mark_dirty(&field.field);
            }
        } else {
            for field in &args.dirty {
                form.mark_dirty(field);
            }
        }

        form.revalidate(schema, candidate);

        if let Some(body) = response {
            match form.begin_save() {
                Ok(ticket) => {
                    let outcome = match ExternalFailure::from_response(body) {
                        ExternalFailure::Cleared => Ok(()),
                        failure => Err(failure),
                    };
                    form.finish_save(ticket, outcome);
                }
                Err(e) => warn!(error = %e, "save refused, ignoring server response"),
            }
        }

        let mut names: Vec<String> = schema.fields().iter().map(|f| f.field.clone()).collect();
        for issue in form.errors() {
            if !names.contains(&issue.property) {
                names.push(issue.property.clone());
            }
        }

        ValidationReport {
            state: form.state(),
            can_submit: !form.has_blocking_errors(),
            fields: names.iter().map(|name| form.field_props(name)).collect(),
            failing: form.errors().iter().map(|i| i.property.clone()).collect(),
            notifications: notifier.drain(),
        }
    }
}

fn load_schema(args: &ValidateArgs) -> Result<Schema, CliError> {
    match (&args.schema, args.page) {
        (_, Some(page)) => Ok(pages::schema(page)?),
        (Some(path), None) => Ok(Schema::from_json(&read_text(path)?)?),
        (None, None) => Err(CliError::InvalidArgument(
            "either --schema or --page is required".into(),
        )),
    }
}
