//! Serializable grid configuration.
//!
//! [`GridConfig`] holds every grid-level option that is plain data. It can be
//! built in code or loaded from TOML or JSON:
//!
//! ```toml
//! pagination = true
//! paginationPageSize = 20
//! rowSelection = "multiple"
//! theme = "dark"
//!
//! [[defaultSortModel]]
//! colId = "age"
//! sort = "desc"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sogrid_core::logging::targets;
use sogrid_table::{ColumnPinningState, PaginationState};

use crate::error::{GridError, Result};
use crate::model::SortModel;

/// Row selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSelection {
    Single,
    #[default]
    Multiple,
    /// Selection disabled.
    None,
}

/// Visual theme name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Compact,
}

impl Theme {
    /// Root CSS class for this theme.
    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Default => "so-grid--default",
            Theme::Dark => "so-grid--dark",
            Theme::Compact => "so-grid--compact",
        }
    }
}

/// Grid-level options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Enables sorting at grid level. Columns still opt in with `sortable`.
    pub sortable: bool,
    pub multi_sort: bool,
    pub default_sort_model: Vec<SortModel>,

    pub filterable: bool,
    pub quick_filter_text: String,

    pub row_selection: RowSelection,

    pub pagination: bool,
    pub pagination_page_size: usize,
    pub pagination_page_size_options: Vec<usize>,
    /// Return to the first page when sorting or filtering changes.
    pub auto_reset_page_index: bool,

    /// Rows are supplied page by page by the host.
    pub server_side: bool,
    /// Total row count reported by the host in server-side mode.
    pub total_rows: Option<usize>,

    pub column_pinning: ColumnPinningState,

    pub row_height: u32,
    pub header_height: u32,
    pub theme: Theme,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sortable: true,
            multi_sort: true,
            default_sort_model: Vec::new(),
            filterable: true,
            quick_filter_text: String::new(),
            row_selection: RowSelection::default(),
            pagination: false,
            pagination_page_size: 10,
            pagination_page_size_options: vec![10, 20, 50, 100],
            auto_reset_page_index: true,
            server_side: false,
            total_rows: None,
            column_pinning: ColumnPinningState::default(),
            row_height: 40,
            header_height: 44,
            theme: Theme::default(),
        }
    }
}

impl GridConfig {
    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GridError::config_parse("TOML", e.to_string()))
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| GridError::config_parse("JSON", e.to_string()))
    }

    /// Loads a configuration file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded grid configuration");
        Ok(config)
    }

    /// Serializes this configuration to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GridError::config_parse("TOML", e.to_string()))
    }

    /// Effective page size. Zero falls back to the default of 10.
    pub fn page_size(&self) -> usize {
        match self.pagination_page_size {
            0 => PaginationState::DEFAULT_PAGE_SIZE,
            size => size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sogrid_table::SortDirection;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.pagination_page_size, 10);
        assert_eq!(config.pagination_page_size_options, vec![10, 20, 50, 100]);
        assert_eq!(config.row_height, 40);
        assert_eq!(config.header_height, 44);
        assert!(config.auto_reset_page_index);
        assert_eq!(config.row_selection, RowSelection::Multiple);
    }

    #[test]
    fn test_from_toml() {
        let config = GridConfig::from_toml_str(
            r#"
            pagination = true
            paginationPageSize = 20
            rowSelection = "single"
            theme = "dark"
            quickFilterText = "seo"

            [columnPinning]
            left = ["id"]

            [[defaultSortModel]]
            colId = "age"
            sort = "desc"
            "#,
        )
        .unwrap();

        assert!(config.pagination);
        assert_eq!(config.pagination_page_size, 20);
        assert_eq!(config.row_selection, RowSelection::Single);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.column_pinning.left, vec!["id"]);
        assert!(config.column_pinning.right.is_empty());
        assert_eq!(config.default_sort_model[0].sort, SortDirection::Desc);
        // Unset keys keep their defaults.
        assert_eq!(config.row_height, 40);
    }

    #[test]
    fn test_from_json() {
        let config =
            GridConfig::from_json_str(r#"{"serverSide": true, "totalRows": 500, "rowSelection": "none"}"#)
                .unwrap();
        assert!(config.server_side);
        assert_eq!(config.total_rows, Some(500));
        assert_eq!(config.row_selection, RowSelection::None);
    }

    #[test]
    fn test_parse_error() {
        let err = GridConfig::from_toml_str("pagination = \"yes\"").unwrap_err();
        assert!(matches!(err, GridError::ConfigParse { format: "TOML", .. }));
    }

    #[test]
    fn test_load_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.toml");
        let config = GridConfig {
            pagination: true,
            theme: Theme::Compact,
            ..GridConfig::default()
        };
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(GridConfig::load(&path).unwrap(), config);

        let missing = GridConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, GridError::Io { .. }));
    }
}
