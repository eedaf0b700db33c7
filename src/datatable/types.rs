//! Core types for the data table: the row trait and the state slots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Key identifying a row within one table instance.
///
/// Either the value of the configured row id field or the row's position.
pub type RowKey = String;

/// A JSON object row.
pub type JsonRow = Map<String, Value>;

/// A row the table can display.
///
/// Rows are opaque to the engine apart from field access. `Default` must
/// produce a structurally empty row; it is used for loading placeholders.
pub trait TableRow: Clone + Default + Send + Sync + 'static {
    /// Returns the value of field `id`, if present.
    fn field(&self, id: &str) -> Option<Value>;

    /// Writes field `id`. Returns `false` if the row cannot hold that field.
    fn set_field(&mut self, id: &str, value: Value) -> bool;

    /// Field names in declaration order. Used to infer a data shape.
    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }
}

impl TableRow for JsonRow {
    fn field(&self, id: &str) -> Option<Value> {
        self.get(id).cloned()
    }

    fn set_field(&mut self, id: &str, value: Value) -> bool {
        self.insert(id.to_string(), value);
        true
    }

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

/// Direction of a column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// One entry of the sorting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    /// Column id.
    pub id: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl ColumnSort {
    /// Ascending sort on `id`.
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `id`.
    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered sort keys; empty means input order.
pub type SortingState = Vec<ColumnSort>;

/// Column visibility. Absent entries are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState(pub BTreeMap<String, bool>);

impl VisibilityState {
    /// State with every id in `hidden` set to `false`.
    pub fn hiding<S: AsRef<str>>(hidden: &[S]) -> Self {
        Self(
            hidden
                .iter()
                .map(|id| (id.as_ref().to_string(), false))
                .collect(),
        )
    }

    /// Whether column `id` is visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(true)
    }

    /// Sets the visibility of column `id`.
    pub fn set(&mut self, id: impl Into<String>, visible: bool) {
        self.0.insert(id.into(), visible);
    }
}

/// Kind of a column filter; decides how its value is matched and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    /// Case-insensitive substring match.
    #[default]
    Text,
    /// Exact match against one option.
    Select,
    /// Match any of a delimited list of options.
    SelectMultiple,
    /// Like `SelectMultiple`, with options loaded by the caller.
    SelectAsync,
    /// Numeric range `[min, max]`, either bound may be null.
    Range,
    /// Date equality on the `YYYY-MM-DD` prefix.
    Date,
    /// Boolean equality.
    Boolean,
}

impl FilterType {
    /// Whether values of this type are a delimited list of options.
    pub fn is_multi_value(self) -> bool {
        matches!(self, FilterType::SelectMultiple | FilterType::SelectAsync)
    }
}

/// One committed column filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column id.
    pub id: String,
    /// Filter value; shape depends on `kind`.
    pub value: Value,
    /// Filter kind.
    pub kind: FilterType,
}

/// Committed column filters. A column id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiltersState(Vec<ColumnFilter>);

impl FiltersState {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter for `id`, replacing any existing one in place.
    /// An empty value removes the filter.
    pub fn set(&mut self, id: impl Into<String>, value: Value, kind: FilterType) {
        let id = id.into();
        if is_empty_value(&value) {
            self.remove(&id);
            return;
        }
        match self.0.iter_mut().find(|f| f.id == id) {
            Some(existing) => {
                existing.value = value;
                existing.kind = kind;
            }
            None => self.0.push(ColumnFilter { id, value, kind }),
        }
    }

    /// Removes the filter for `id`. Returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|f| f.id != id);
        before != self.0.len()
    }

    /// The filter for `id`.
    pub fn get(&self, id: &str) -> Option<&ColumnFilter> {
        self.0.iter().find(|f| f.id == id)
    }

    /// Iterates filters in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.0.iter()
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Positive row selection: only selected keys are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState(pub BTreeMap<RowKey, bool>);

impl SelectionState {
    /// Whether `key` is selected.
    pub fn is_selected(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// Selects or deselects `key`.
    pub fn set(&mut self, key: impl Into<RowKey>, selected: bool) {
        let key = key.into();
        if selected {
            self.0.insert(key, true);
        } else {
            self.0.remove(&key);
        }
    }

    /// Selected keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.0.keys()
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Columns stuck to the left or right edge, by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPinning {
    /// Pinned left, in order.
    #[serde(default)]
    pub left: Vec<String>,
    /// Pinned right, in order.
    #[serde(default)]
    pub right: Vec<String>,
}

/// Whether `value` counts as "no value" for filters.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.iter().all(is_empty_value),
        _ => false,
    }
}

/// Renders a value as plain text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(map) => ["name", "label", "title", "id"]
            .iter()
            .find_map(|k| map.get(*k))
            .map(display_value)
            .unwrap_or_default(),
    }
}

/// Total order over values used for sorting.
///
/// Nulls sort first, numbers compare numerically, strings compare
/// case-insensitively, mixed types fall back to their text form.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        _ => display_value(a)
            .to_lowercase()
            .cmp(&display_value(b).to_lowercase()),
    }
}
