//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`grid`] - Grid configuration and row rendering
//! - [`validate`] - Form validation
//! - [`pages`] - Built-in page listing

pub mod grid;
pub mod pages;
pub mod validate;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use panel_i18n::{Catalog, Identity, Translate};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::PanelConfig;
use crate::error::CliError;

pub use grid::GridCommand;
pub use pages::PagesCommand;
pub use validate::ValidateCommand;

/// What every command needs: the translator and label overrides.
#[derive(Clone)]
pub struct Context {
    /// Translation lookup.
    pub translator: Arc<dyn Translate>,
    /// Field label overrides.
    pub labels: BTreeMap<String, String>,
}

impl Context {
    /// Build from configuration. `catalog` overrides the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_config(config: &PanelConfig, catalog: Option<&Path>) -> Result<Self, CliError> {
        let translator: Arc<dyn Translate> = match catalog.or(config.catalog.as_deref()) {
            Some(path) => {
                let catalog = Catalog::load(path)?;
                debug!(path = %path.display(), entries = catalog.len(), "loaded catalog");
                Arc::new(catalog)
            }
            None => Arc::new(Identity),
        };
        Ok(Self {
            translator,
            labels: config.labels.clone(),
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self {
            translator: Arc::new(Identity),
            labels: BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

/// Read a whole file.
pub(crate) fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_without_catalog_uses_identity() {
        let ctx = Context::from_config(&PanelConfig::default(), None).unwrap();
        assert_eq!(ctx.translator.translate("properties.title"), "properties.title");
    }

    #[test]
    fn context_loads_catalog_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.json");
        std::fs::write(&path, r#"{"properties": {"title": "title"}}"#).unwrap();

        let config = PanelConfig::default().with_label("options", "Answers");
        let ctx = Context::from_config(&config, Some(&path)).unwrap();
        assert_eq!(ctx.translator.lookup("properties.title"), Some("title"));
        assert_eq!(ctx.labels["options"], "Answers");
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let config = PanelConfig::default().with_catalog("/nonexistent/en.json");
        assert!(matches!(
            Context::from_config(&config, None),
            Err(CliError::Catalog(_))
        ));
    }

    #[test]
    fn read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, "not json").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(err.to_string().contains("rows.json"));
    }
}
