//! Table configuration.

use super::error::Result;
use super::generator::FieldOption;
use super::types::{ColumnPinning, FilterType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Describes a toolbar filter, or an initial filter when used as a seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Column id the filter applies to.
    pub name: String,
    /// Initial value; empty values do not seed a filter.
    #[serde(default)]
    pub value: Value,
    /// Filter kind.
    #[serde(rename = "type", default)]
    pub kind: FilterType,
    /// Toolbar label.
    #[serde(default)]
    pub label: Option<String>,
    /// Options of select filters.
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl FilterDescriptor {
    /// A descriptor with no label or options.
    pub fn new(name: impl Into<String>, value: Value, kind: FilterType) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
            label: None,
            options: Vec::new(),
        }
    }
}

/// Serializable table options.
///
/// ```rust
/// use bubbletea_datatable::datatable::TableOptions;
///
/// let options = TableOptions::from_json(r#"{
///     "page_size": 25,
///     "exclude_columns": ["id"],
///     "manual_pagination": true,
///     "row_count": 240,
///     "detailed_filter": [
///         {"name": "status", "value": "active,pending", "type": "select-multiple"}
///     ]
/// }"#).unwrap();
/// assert_eq!(options.page_size, 25);
/// assert!(options.enable_row_selection == false);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Rows per page.
    pub page_size: usize,
    /// Columns hidden when the table mounts.
    pub exclude_columns: Vec<String>,
    /// Pinned columns. Auto mode fills this in when empty.
    pub pinning: ColumnPinning,
    /// Filtering and pagination are done by the caller.
    pub manual_pagination: bool,
    /// Total rows available to the caller in manual mode.
    pub row_count: Option<usize>,
    /// Whether rows can be selected.
    pub enable_row_selection: bool,
    /// Field holding a stable row id; rows are keyed by position otherwise.
    pub row_id_field: Option<String>,
    /// Filters committed at mount.
    pub detailed_filter: Vec<FilterDescriptor>,
    /// Toolbar filter descriptors.
    pub filters: Vec<FilterDescriptor>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            exclude_columns: Vec::new(),
            pinning: ColumnPinning::default(),
            manual_pagination: false,
            row_count: None,
            enable_row_selection: false,
            row_id_field: None,
            detailed_filter: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl TableOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Filter kind declared for `name` by a descriptor.
    pub fn filter_kind(&self, name: &str) -> Option<FilterType> {
        self.filters
            .iter()
            .chain(self.detailed_filter.iter())
            .find(|d| d.name == name)
            .map(|d| d.kind)
    }
}

/// A table-level action such as "add row".
#[derive(Clone)]
pub struct ToolbarAction {
    /// Button label.
    pub label: String,
    /// Called on activation.
    pub on_click: Arc<dyn Fn() + Send + Sync>,
}

impl ToolbarAction {
    /// A toolbar action.
    pub fn new<F>(label: impl Into<String>, on_click: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            on_click: Arc::new(on_click),
        }
    }
}

impl fmt::Debug for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolbarAction")
            .field("label", &self.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatable::error::TableError;
    use serde_json::json;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let options = TableOptions::from_json("{}").unwrap();
        assert_eq!(options, TableOptions::default());
        assert_eq!(options.page_size, 10);
    }

    #[test]
    fn test_detailed_filter_parses_type() {
        let options = TableOptions::from_json(
            r#"{"detailed_filter": [{"name": "status", "value": "a,b", "type": "select-multiple"}]}"#,
        )
        .unwrap();
        let seed = &options.detailed_filter[0];
        assert_eq!(seed.kind, FilterType::SelectMultiple);
        assert_eq!(seed.value, json!("a,b"));
        assert_eq!(options.filter_kind("status"), Some(FilterType::SelectMultiple));
        assert_eq!(options.filter_kind("other"), None);
    }

    #[test]
    fn test_invalid_json() {
        let err = TableOptions::from_json("{\"page_size\": \"ten\"}").unwrap_err();
        assert!(matches!(err, TableError::InvalidOptions(_)));
    }
}
