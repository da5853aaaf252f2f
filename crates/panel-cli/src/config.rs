//! CLI configuration file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Format;
use crate::error::CliError;

/// Configuration read from a JSON file.
///
/// ```json
/// {
///   "catalog": "locales/en.json",
///   "labels": { "title": "Poll title" },
///   "logFilter": "panel=debug",
///   "format": "json"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PanelConfig {
    /// Translation catalog. Relative paths resolve against the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Field label overrides for validation messages.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    /// Default output format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
}

impl PanelConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&text)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;

        if let Some(dir) = path.parent() {
            config.catalog = config
                .catalog
                .map(|catalog| if catalog.is_relative() { dir.join(catalog) } else { catalog });
        }
        Ok(config)
    }

    /// Load the file if a path is given, else use defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, CliError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Set the translation catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Into<PathBuf>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Add a label override.
    #[must_use]
    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
        self
    }

    /// Set the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Set the default output format.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert!(config.catalog.is_none());
        assert!(config.labels.is_empty());
        assert!(config.log_filter.is_none());
        assert!(config.format.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = PanelConfig::default()
            .with_catalog("en.json")
            .with_label("title", "Poll title")
            .with_log_filter("debug")
            .with_format(Format::Json);

        assert_eq!(config.catalog, Some(PathBuf::from("en.json")));
        assert_eq!(config.labels["title"], "Poll title");
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert_eq!(config.format, Some(Format::Json));
    }

    #[test]
    fn test_load_resolves_relative_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"catalog": "en.json", "format": "json"}}"#).unwrap();

        let config = PanelConfig::load(&path).unwrap();
        assert_eq!(config.catalog, Some(dir.path().join("en.json")));
        assert_eq!(config.format, Some(Format::Json));
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");
        std::fs::write(&path, r#"{"catalogue": "en.json"}"#).unwrap();

        assert!(matches!(PanelConfig::load(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_optional_without_path() {
        assert_eq!(PanelConfig::load_optional(None).unwrap(), PanelConfig::default());
    }
}
