//! Data table component: sortable, filterable, paginated rows with row
//! actions, dialogs, selection, expansion and server-driven mode.
//!
//! This module exposes a generic `Model<R: TableRow>` plus the pieces it is
//! built from:
//! - `TableRow`: implement for your row type, or use [`JsonRow`]
//! - [`ColumnDef`]: caller-authored columns, or [`AutoColumns`] to generate
//!   them from field metadata
//! - [`RowAction`]: links, confirmation dialogs and custom dialogs
//!
//! ## Architecture Overview
//!
//! ### State
//! One [`TableState`] holds sorting, column visibility, filters, selection,
//! expansion, the global filter and the single pending row action. The
//! table mutates it only through its setters.
//!
//! ### Row model
//! Every render derives a [`RowModel`] from data, columns and state. In
//! client mode it filters, sorts and paginates; in manual mode the data is
//! taken as the current page and `row_count` gives the page count. While
//! loading, the data is replaced by placeholder rows with skeleton cells.
//!
//! ### Reconciliation
//! After every `update` the table applies row edits queued by cell
//! renderers, fires a pending link action, refreshes pagination and, in
//! manual mode, sends a fetch request when the page or filters changed.
//!
//! ### Dialogs
//! Confirmation and custom dialog actions stay pending until
//! [`Model::confirm_dialog`] or [`Model::cancel_dialog`]; exactly one of the
//! action's callbacks runs and the pending slot is cleared.
//!
//! ## Example
//!
//! ```
//! use bubbletea_datatable::datatable::{ColumnDef, JsonRow, Model, RowAction};
//! use serde_json::json;
//!
//! let rows: Vec<JsonRow> = vec![json!({"id": 1, "name": "Ada"}).as_object().cloned().unwrap()];
//! let columns = vec![
//!     ColumnDef::accessor("id"),
//!     ColumnDef::accessor("name"),
//!     ColumnDef::display("actions").with_actions(vec![
//!         RowAction::confirm("Delete", "Delete row", "Are you sure?", |_| {}),
//!     ]),
//! ];
//! let mut table = Model::new(columns, rows).unwrap();
//! assert!(table.activate_action(0, "actions", 0));
//! assert!(table.is_dialog_open());
//! assert!(table.cancel_dialog());
//! ```

pub mod action;
pub mod column;
pub mod dialog;
pub mod error;
pub mod generator;
pub mod keys;
pub mod loading;
pub mod options;
pub mod row_model;
pub mod state;
pub mod style;
pub mod sync;
pub mod types;

mod api;
mod model;
mod rendering;

#[cfg(test)]
mod tests;

pub use action::{ActionDispatcher, ActionType, PendingAction, RowAction};
pub use column::{CellContext, CellRenderer, ColumnDef, HeaderCell, Pin};
pub use dialog::{DialogState, DialogView};
pub use error::{Result, TableError};
pub use generator::{
    generate, AutoColumns, DataShape, FieldKind, FieldOption, FieldSpec, RendererRules,
    TableType, ACTIONS_COLUMN_ID,
};
pub use keys::DataTableKeyMap;
pub use options::{FilterDescriptor, TableOptions, ToolbarAction};
pub use row_model::{ModelRow, RowModel, RowMutation, RowMutations};
pub use state::{StateSnapshot, TableState};
pub use style::DataTableStyles;
pub use sync::{FetchRequest, FilterPayload};
pub use types::{
    ColumnFilter, ColumnPinning, ColumnSort, FilterType, FiltersState, JsonRow, RowKey,
    SelectionState, SortDirection, SortingState, TableRow, VisibilityState,
};

pub use model::{
    ColumnSource, ColumnsSource, DataCallback, Model, SubComponentRenderer, NO_DATA_TEXT,
    NO_RESULTS_TEXT,
};
pub use rendering::{display_width, BodyRow};
