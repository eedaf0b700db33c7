//! Column definitions and the context handed to cell renderers.

use super::action::RowAction;
use super::row_model::RowMutations;
use super::types::{display_value, FilterType, SortDirection, TableRow};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Renders one cell to text.
pub type CellRenderer<R> = Arc<dyn for<'a> Fn(&CellContext<'a, R>) -> String + Send + Sync>;

/// Reads the value a column sorts and filters on.
pub type Accessor<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// Everything a cell renderer may look at.
///
/// Renderers never get the table itself. Row edits go through `mutations`,
/// which only queues them; they are applied on the next update cycle.
pub struct CellContext<'a, R> {
    /// The row being rendered.
    pub row: &'a R,
    /// Index of the row in the table data.
    pub row_index: usize,
    /// Stable key of the row.
    pub row_key: &'a str,
    /// Id of the column being rendered.
    pub column_id: &'a str,
    /// The accessor value, `Null` for display-only columns.
    pub value: Value,
    /// Deferred row mutations.
    pub mutations: &'a RowMutations,
}

/// Declares one column: id, header, cell renderer and capabilities.
pub struct ColumnDef<R> {
    /// Unique id within the table.
    pub id: String,
    /// Header label; the id is shown when absent.
    pub header: Option<String>,
    accessor: Option<Accessor<R>>,
    cell: CellRenderer<R>,
    /// Whether the column can be sorted.
    pub enable_sorting: bool,
    /// Whether the column can be filtered.
    pub enable_filtering: bool,
    /// How filters on this column match.
    pub filter_type: FilterType,
    /// Row actions offered in this column's cells.
    pub actions: Vec<RowAction<R>>,
    /// Fixed width in cells; computed from content when absent.
    pub width: Option<usize>,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            cell: Arc::clone(&self.cell),
            enable_sorting: self.enable_sorting,
            enable_filtering: self.enable_filtering,
            filter_type: self.filter_type,
            actions: self.actions.clone(),
            width: self.width,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("enable_sorting", &self.enable_sorting)
            .field("enable_filtering", &self.enable_filtering)
            .field("filter_type", &self.filter_type)
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl<R: TableRow> ColumnDef<R> {
    /// A column reading field `id` of the row, sortable and filterable.
    pub fn accessor(id: impl Into<String>) -> Self {
        let id = id.into();
        let field = id.clone();
        Self {
            id,
            header: None,
            accessor: Some(Arc::new(move |row: &R| {
                row.field(&field).unwrap_or(Value::Null)
            })),
            cell: Arc::new(|ctx: &CellContext<'_, R>| display_value(&ctx.value)),
            enable_sorting: true,
            enable_filtering: true,
            filter_type: FilterType::Text,
            actions: Vec::new(),
            width: None,
        }
    }

    /// A column with no underlying value, e.g. an actions column.
    pub fn display(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: None,
            accessor: None,
            cell: Arc::new(|_: &CellContext<'_, R>| String::new()),
            enable_sorting: false,
            enable_filtering: false,
            filter_type: FilterType::Text,
            actions: Vec::new(),
            width: None,
        }
    }
}

impl<R> ColumnDef<R> {
    /// Sets the header label.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Replaces the value accessor.
    pub fn with_accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(f));
        self
    }

    /// Replaces the cell renderer.
    pub fn with_cell<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&CellContext<'a, R>) -> String + Send + Sync + 'static,
    {
        self.cell = Arc::new(f);
        self
    }

    /// Replaces the cell renderer with a shared one.
    pub fn with_renderer(mut self, renderer: CellRenderer<R>) -> Self {
        self.cell = renderer;
        self
    }

    /// Enables or disables sorting.
    pub fn sortable(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    /// Enables filtering with the given filter type.
    pub fn filterable(mut self, filter_type: FilterType) -> Self {
        self.enable_filtering = true;
        self.filter_type = filter_type;
        self
    }

    /// Attaches row actions.
    pub fn with_actions(mut self, actions: Vec<RowAction<R>>) -> Self {
        self.actions = actions;
        self
    }

    /// Fixes the column width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Header label.
    pub fn label(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    /// Whether the column reads a value from the row.
    pub fn has_accessor(&self) -> bool {
        self.accessor.is_some()
    }

    /// The column value for `row`, `Null` for display-only columns.
    pub fn value(&self, row: &R) -> Value {
        self.accessor
            .as_ref()
            .map(|f| f(row))
            .unwrap_or(Value::Null)
    }

    /// Renders a cell.
    pub fn render(&self, ctx: &CellContext<'_, R>) -> String {
        (self.cell)(ctx)
    }

    /// The cell renderer.
    pub fn renderer(&self) -> &CellRenderer<R> {
        &self.cell
    }
}

/// Which edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

/// One header cell of the visible header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    /// Column id.
    pub id: String,
    /// Label to show.
    pub label: String,
    /// Active sort on the column.
    pub sort: Option<SortDirection>,
    /// Whether the column can be sorted.
    pub sortable: bool,
    /// Pinned edge, if any.
    pub pinned: Option<Pin>,
}
