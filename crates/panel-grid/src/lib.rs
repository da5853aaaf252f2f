//! # panel-grid
//!
//! Column configuration for the admin panel's data grids.
//!
//! A page declares its grid once as a list of [`ColumnSpec`]s. The
//! [`ColumnMaker`] turns that list into a [`GridConfig`]: the display
//! columns, the width/alignment table, the sort toggles, the hidden column
//! names, the filter UI setup and one filter predicate per column.
//!
//! ```
//! use std::sync::Arc;
//! use panel_grid::{ColumnMaker, ColumnSpec, FilterKind};
//! use panel_i18n::Identity;
//! use serde_json::Value;
//!
//! let columns: Vec<ColumnSpec<Value>> = vec![
//!     ColumnSpec::new("title").filter(FilterKind::String),
//!     ColumnSpec::new("type"),
//! ];
//! let maker = ColumnMaker::new(columns, Arc::new(Identity))?;
//! let config = maker.config();
//!
//! assert_eq!(config.filter_setup.len(), 1);
//! assert_eq!(config.sort_config.get("type"), Some(&true));
//! # Ok::<(), panel_grid::GridError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod column;
pub mod error;
pub mod filter;
pub mod maker;
pub mod record;
pub mod sort;

pub use column::{
    Align, CellRenderer, ColumnSpec, FilterKind, FilterOptions, Filtering, Predicate, TableHints,
    ValueRenderer,
};
pub use error::{GridError, GridResult};
pub use filter::{Filter, FilterOperation, default_matches};
pub use maker::{ColumnMaker, DisplayColumn, FilterSetup, GridConfig, columns_from_json};
pub use record::Record;
pub use sort::{SortDirection, Sorting, compare_values};
