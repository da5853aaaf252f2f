//! Built-in page listing.

use std::io::Write;

use crate::error::CliError;
use crate::output::{OutputFormat, PageList};
use crate::pages::PAGES;

/// Pages command executor.
#[derive(Debug, Default)]
pub struct PagesCommand;

impl PagesCommand {
    /// Execute the pages command.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let list = PageList {
            pages: PAGES.to_vec(),
        };
        format.write(writer, &list)
    }
}
