//! Column generation from field metadata.
//!
//! In auto mode the caller describes the fields of its rows instead of
//! writing column definitions. Each field becomes an accessor column whose
//! cell formatter is picked by the field's [`FieldKind`] from a
//! [`RendererRules`] table. The table type selects the rule set. A trailing
//! `actions` column carries the edit/delete hooks as row actions; the
//! generator never calls them.

use super::action::{RowAction, RowCallback};
use super::column::{CellContext, ColumnDef};
use super::error::{Result, TableError};
use super::types::{display_value, FilterType, TableRow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Id of the generated actions column.
pub const ACTIONS_COLUMN_ID: &str = "actions";

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text.
    #[default]
    Text,
    /// Numeric value.
    Number,
    /// One or more values from a fixed option list.
    Enum,
    /// Date or date-time.
    Date,
    /// True/false.
    Boolean,
    /// Reference to another record.
    Relation,
}

impl FieldKind {
    /// Filter type used for columns of this kind.
    pub fn filter_type(self) -> FilterType {
        match self {
            FieldKind::Text => FilterType::Text,
            FieldKind::Number => FilterType::Range,
            FieldKind::Enum => FilterType::SelectMultiple,
            FieldKind::Date => FilterType::Date,
            FieldKind::Boolean => FilterType::Boolean,
            FieldKind::Relation => FilterType::SelectAsync,
        }
    }
}

/// One selectable option of an enum field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Stored value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// Describes one field of the row type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, used as the column id.
    pub name: String,
    /// Header label.
    #[serde(default)]
    pub label: Option<String>,
    /// Semantic type.
    #[serde(default)]
    pub kind: FieldKind,
    /// Options of an enum field.
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl FieldSpec {
    /// A field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            options: Vec::new(),
        }
    }

    /// Sets the header label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds an enum option.
    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(FieldOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }
}

/// The fields of a row type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataShape {
    /// Field descriptions.
    pub fields: Vec<FieldSpec>,
}

impl DataShape {
    /// Infers a shape from the first row.
    ///
    /// Booleans become [`FieldKind::Boolean`], numbers [`FieldKind::Number`],
    /// strings that parse as dates [`FieldKind::Date`], objects
    /// [`FieldKind::Relation`], arrays [`FieldKind::Enum`] and everything
    /// else [`FieldKind::Text`].
    pub fn infer<R: TableRow>(rows: &[R]) -> Self {
        let Some(first) = rows.first() else {
            return Self::default();
        };
        let fields = first
            .field_names()
            .into_iter()
            .map(|name| {
                let kind = match first.field(&name) {
                    Some(Value::Bool(_)) => FieldKind::Boolean,
                    Some(Value::Number(_)) => FieldKind::Number,
                    Some(Value::Object(_)) => FieldKind::Relation,
                    Some(Value::Array(_)) => FieldKind::Enum,
                    Some(Value::String(s)) if parse_date(&s).is_some() => FieldKind::Date,
                    _ => FieldKind::Text,
                };
                FieldSpec::new(name, kind)
            })
            .collect();
        Self { fields }
    }
}

/// Selects the rule set used to format generated cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    /// Full labels: `Yes`/`No`, `2024-03-01`, relation names.
    #[default]
    Standard,
    /// Narrow cells: `✓`/`✗`, `01/03/24`, relation ids.
    Compact,
}

/// Formats a field value for display.
pub type ValueFormatter = Arc<dyn Fn(&FieldSpec, &Value) -> String + Send + Sync>;

/// Maps field kinds to formatters.
#[derive(Clone, Default)]
pub struct RendererRules {
    rules: HashMap<FieldKind, ValueFormatter>,
}

impl fmt::Debug for RendererRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRules")
            .field("kinds", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

static STANDARD_RULES: Lazy<RendererRules> = Lazy::new(|| {
    RendererRules::default()
        .with(FieldKind::Text, |_, v| display_value(v))
        .with(FieldKind::Number, |_, v| display_value(v))
        .with(FieldKind::Enum, format_enum)
        .with(FieldKind::Date, |_, v| format_date(v, "%Y-%m-%d"))
        .with(FieldKind::Boolean, |_, v| {
            format_bool(v, "Yes", "No")
        })
        .with(FieldKind::Relation, |_, v| display_value(v))
});

static COMPACT_RULES: Lazy<RendererRules> = Lazy::new(|| {
    STANDARD_RULES
        .clone()
        .with(FieldKind::Date, |_, v| format_date(v, "%d/%m/%y"))
        .with(FieldKind::Boolean, |_, v| format_bool(v, "✓", "✗"))
        .with(FieldKind::Relation, |_, v| match v {
            Value::Object(map) => map.get("id").map(display_value).unwrap_or_default(),
            other => display_value(other),
        })
});

impl RendererRules {
    /// The built-in rule set for `table_type`.
    pub fn for_table_type(table_type: TableType) -> Self {
        match table_type {
            TableType::Standard => STANDARD_RULES.clone(),
            TableType::Compact => COMPACT_RULES.clone(),
        }
    }

    /// Sets the formatter for `kind`.
    pub fn with<F>(mut self, kind: FieldKind, f: F) -> Self
    where
        F: Fn(&FieldSpec, &Value) -> String + Send + Sync + 'static,
    {
        self.rules.insert(kind, Arc::new(f));
        self
    }

    /// Formats `value` of `field`; unknown kinds fall back to plain text.
    pub fn format(&self, field: &FieldSpec, value: &Value) -> String {
        match self.rules.get(&field.kind) {
            Some(f) => f(field, value),
            None => display_value(value),
        }
    }
}

/// Configuration of auto-generated columns.
pub struct AutoColumns<R> {
    /// Fields to turn into columns.
    pub fields: Vec<FieldSpec>,
    /// Field names never turned into columns.
    pub exclude: Vec<String>,
    /// Selects the formatter rule set.
    pub table_type: TableType,
    /// Overrides the rule set selected by `table_type`.
    pub rules: Option<RendererRules>,
    /// Edit intent; adds an `Edit` link to the actions column.
    pub on_edit: Option<RowCallback<R>>,
    /// Delete intent; adds a confirmed `Delete` action.
    pub on_delete: Option<RowCallback<R>>,
}

impl<R> AutoColumns<R> {
    /// Auto columns for `fields` with the standard rule set and no hooks.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            exclude: Vec::new(),
            table_type: TableType::default(),
            rules: None,
            on_edit: None,
            on_delete: None,
        }
    }

    /// Excludes fields by name.
    pub fn with_exclude<S: Into<String>>(mut self, exclude: Vec<S>) -> Self {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Selects the table type.
    pub fn with_table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Uses a custom rule set.
    pub fn with_rules(mut self, rules: RendererRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Sets the edit hook.
    pub fn on_edit<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        self.on_edit = Some(Arc::new(f));
        self
    }

    /// Sets the delete hook.
    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        self.on_delete = Some(Arc::new(f));
        self
    }

    /// Ids of the generated field columns, in order.
    pub fn field_column_ids(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !self.exclude.contains(&f.name))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Whether an actions column will be generated.
    pub fn has_actions(&self) -> bool {
        self.on_edit.is_some() || self.on_delete.is_some()
    }
}

/// Generates column definitions from `config`.
///
/// Columns follow field declaration order with excludes removed; the
/// actions column, when any hook is set, comes last. Fails if two columns
/// would share an id.
pub fn generate<R: TableRow>(config: &AutoColumns<R>) -> Result<Vec<ColumnDef<R>>> {
    let rules = config
        .rules
        .clone()
        .unwrap_or_else(|| RendererRules::for_table_type(config.table_type));
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for field in config.fields.iter().filter(|f| !config.exclude.contains(&f.name)) {
        if !seen.insert(field.name.clone()) {
            return Err(TableError::DuplicateColumnId(field.name.clone()));
        }
        let spec = field.clone();
        let rules = rules.clone();
        let mut column = ColumnDef::accessor(field.name.clone())
            .filterable(field.kind.filter_type())
            .with_cell(move |ctx: &CellContext<'_, R>| rules.format(&spec, &ctx.value));
        column.header = Some(field.label.clone().unwrap_or_else(|| humanize(&field.name)));
        columns.push(column);
    }

    if config.has_actions() {
        if !seen.insert(ACTIONS_COLUMN_ID.to_string()) {
            return Err(TableError::DuplicateColumnId(ACTIONS_COLUMN_ID.to_string()));
        }
        let mut actions = Vec::new();
        if let Some(on_edit) = &config.on_edit {
            let on_edit = Arc::clone(on_edit);
            actions.push(RowAction::link("Edit", move |row: &R| on_edit(row)));
        }
        if let Some(on_delete) = &config.on_delete {
            let on_delete = Arc::clone(on_delete);
            actions.push(RowAction::confirm(
                "Delete",
                "Delete record",
                "This action cannot be undone.",
                move |row: &R| on_delete(row),
            ));
        }
        columns.push(
            ColumnDef::display(ACTIONS_COLUMN_ID)
                .with_header("Actions")
                .with_actions(actions),
        );
    }

    Ok(columns)
}

/// `created_at` → `Created at`.
fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn format_date(value: &Value, fmt: &str) -> String {
    match value {
        Value::String(s) => parse_date(s)
            .map(|d| d.format(fmt).to_string())
            .unwrap_or_else(|| s.clone()),
        other => display_value(other),
    }
}

fn format_bool(value: &Value, yes: &str, no: &str) -> String {
    match value {
        Value::Bool(true) => yes.to_string(),
        Value::Bool(false) => no.to_string(),
        other => display_value(other),
    }
}

fn format_enum(field: &FieldSpec, value: &Value) -> String {
    let label = |v: &Value| {
        let raw = display_value(v);
        field
            .options
            .iter()
            .find(|o| o.value == raw)
            .map(|o| o.label.clone())
            .unwrap_or(raw)
    };
    match value {
        Value::Array(items) => items.iter().map(label).collect::<Vec<_>>().join(", "),
        other => label(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatable::row_model::RowMutations;
    use crate::datatable::types::JsonRow;
    use serde_json::json;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("id", FieldKind::Number),
            FieldSpec::new("name", FieldKind::Text).with_label("Full name"),
            FieldSpec::new("status", FieldKind::Enum)
                .with_option("active", "Active")
                .with_option("pending", "Pending"),
            FieldSpec::new("created_at", FieldKind::Date),
            FieldSpec::new("verified", FieldKind::Boolean),
            FieldSpec::new("company", FieldKind::Relation),
        ]
    }

    fn row() -> JsonRow {
        json!({
            "id": 7,
            "name": "Ada",
            "status": "pending",
            "created_at": "2024-03-01T10:30:00Z",
            "verified": true,
            "company": {"id": 3, "name": "Acme"}
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn render(col: &ColumnDef<JsonRow>, row: &JsonRow) -> String {
        let mutations = RowMutations::default();
        col.render(&CellContext {
            row,
            row_index: 0,
            row_key: "0",
            column_id: &col.id,
            value: col.value(row),
            mutations: &mutations,
        })
    }

    #[test]
    fn test_generate_order_and_actions_last() {
        let config = AutoColumns::<JsonRow>::new(fields())
            .with_exclude(vec!["created_at"])
            .on_edit(|_| {})
            .on_delete(|_| {});
        let cols = generate(&config).unwrap();
        let ids: Vec<&str> = cols.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "name", "status", "verified", "company", "actions"]);
        assert_eq!(cols.last().unwrap().actions.len(), 2);
        assert!(!cols.last().unwrap().enable_sorting);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = AutoColumns::<JsonRow>::new(fields()).on_edit(|_| {});
        let a: Vec<String> = generate(&config).unwrap().into_iter().map(|c| c.id).collect();
        let b: Vec<String> = generate(&config).unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_actions_column_without_hooks() {
        let cols = generate(&AutoColumns::<JsonRow>::new(fields())).unwrap();
        assert!(cols.iter().all(|c| c.id != ACTIONS_COLUMN_ID));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let mut f = fields();
        f.push(FieldSpec::new("name", FieldKind::Text));
        let err = generate(&AutoColumns::<JsonRow>::new(f)).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumnId("name".to_string()));
    }

    #[test]
    fn test_field_named_actions_collides() {
        let config = AutoColumns::<JsonRow>::new(vec![FieldSpec::new("actions", FieldKind::Text)])
            .on_delete(|_| {});
        assert!(matches!(
            generate(&config),
            Err(TableError::DuplicateColumnId(_))
        ));
    }

    #[test]
    fn test_ids_pairwise_distinct() {
        let config = AutoColumns::<JsonRow>::new(fields()).on_edit(|_| {});
        let cols = generate(&config).unwrap();
        let unique: HashSet<&str> = cols.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(unique.len(), cols.len());
    }

    #[test]
    fn test_standard_renderers() {
        let cols = generate(&AutoColumns::<JsonRow>::new(fields())).unwrap();
        let r = row();
        let cells: Vec<String> = cols.iter().map(|c| render(c, &r)).collect();
        assert_eq!(cells, vec!["7", "Ada", "Pending", "2024-03-01", "Yes", "Acme"]);
        assert_eq!(cols[1].label(), "Full name");
        assert_eq!(cols[3].label(), "Created at");
    }

    #[test]
    fn test_compact_renderers() {
        let config = AutoColumns::<JsonRow>::new(fields()).with_table_type(TableType::Compact);
        let cols = generate(&config).unwrap();
        let r = row();
        assert_eq!(render(&cols[3], &r), "01/03/24");
        assert_eq!(render(&cols[4], &r), "✓");
        assert_eq!(render(&cols[5], &r), "3");
    }

    #[test]
    fn test_custom_rules_override() {
        let rules = RendererRules::for_table_type(TableType::Standard)
            .with(FieldKind::Text, |_, v| display_value(v).to_uppercase());
        let config = AutoColumns::<JsonRow>::new(fields()).with_rules(rules);
        let cols = generate(&config).unwrap();
        assert_eq!(render(&cols[1], &row()), "ADA");
    }

    #[test]
    fn test_filter_types_follow_kind() {
        let cols = generate(&AutoColumns::<JsonRow>::new(fields())).unwrap();
        assert_eq!(cols[2].filter_type, FilterType::SelectMultiple);
        assert_eq!(cols[5].filter_type, FilterType::SelectAsync);
    }

    #[test]
    fn test_infer_shape() {
        let shape = DataShape::infer(&[row()]);
        let kinds: Vec<(String, FieldKind)> =
            shape.fields.into_iter().map(|f| (f.name, f.kind)).collect();
        assert!(kinds.contains(&("created_at".to_string(), FieldKind::Date)));
        assert!(kinds.contains(&("verified".to_string(), FieldKind::Boolean)));
        assert!(kinds.contains(&("company".to_string(), FieldKind::Relation)));
        assert!(kinds.contains(&("name".to_string(), FieldKind::Text)));
        assert!(DataShape::infer::<JsonRow>(&[]).fields.is_empty());
    }
}
