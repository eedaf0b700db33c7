#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-datatable/")]

//! # bubbletea-datatable
//!
//! An interactive data table component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: sortable, filterable, paginated rows with per-row actions,
//! confirmation and custom dialogs, row selection, expandable rows and a
//! server-driven mode.
//!
//! ## Overview
//!
//! The table follows the Elm Architecture: `update()` handles a message and
//! returns an optional command, `view()` renders a string. All interactive
//! state (sorting, visibility, filters, selection, expansion and the pending
//! row action) is owned by the table and changed only through its methods.
//!
//! ## Features
//!
//! - **Two column sources**: caller-authored [`datatable::ColumnDef`]s, or
//!   columns generated from field metadata with [`datatable::AutoColumns`]
//! - **Row actions**: links fire on the next update, dialog actions wait for confirm
//!   or cancel
//! - **Manual mode**: filtering and pagination done by the caller, driven by
//!   a fetch callback receiving the page index and a filter payload
//! - **Loading state** with skeleton rows
//! - **Deferred row edits** queued from cell renderers
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_datatable::prelude::*;
//! use serde_json::json;
//!
//! let rows: Vec<JsonRow> = vec![
//!     json!({"id": 1, "name": "Ada", "status": "active"}).as_object().cloned().unwrap(),
//!     json!({"id": 2, "name": "Grace", "status": "pending"}).as_object().cloned().unwrap(),
//! ];
//! let columns = vec![
//!     ColumnDef::accessor("id"),
//!     ColumnDef::accessor("name").with_header("Name"),
//!     ColumnDef::accessor("status").filterable(FilterType::SelectMultiple),
//! ];
//! let mut table = DataTable::new(columns, rows)
//!     .unwrap()
//!     .with_exclude_columns(vec!["id"]);
//! table.focus();
//! let _ = table.set_column_filter("status", json!("active"));
//! assert_eq!(table.row_model().rows.len(), 1);
//! ```
//!
//! ## Server-driven tables
//!
//! ```rust
//! use bubbletea_datatable::prelude::*;
//! use serde_json::json;
//!
//! let mut table = DataTable::new(vec![ColumnDef::<JsonRow>::accessor("status")], Vec::new())
//!     .unwrap()
//!     .with_manual_pagination(Some(120))
//!     .with_detailed_filter(vec![FilterDescriptor::new(
//!         "status",
//!         json!("active,pending"),
//!         FilterType::SelectMultiple,
//!     )])
//!     .with_fetch_request(|page, payload| {
//!         assert_eq!(page, 0);
//!         assert_eq!(payload.get("status"), Some(&json!(["active", "pending"])));
//!         None
//!     });
//! let _cmd = table.mount();
//! ```
//!
//! ## Key Bindings
//!
//! Components use the key binding system from the `key` module:
//!
//! ```rust
//! use bubbletea_datatable::key::{Binding, KeyMap};
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let confirm = Binding::new(vec![KeyCode::Enter]).with_help("enter", "confirm");
//! let save = Binding::new(vec![(KeyCode::Char('s'), KeyModifiers::CONTROL)])
//!     .with_help("ctrl+s", "save");
//!
//! struct MyKeyMap {
//!     confirm: Binding,
//!     save: Binding,
//! }
//!
//! impl KeyMap for MyKeyMap {
//!     fn short_help(&self) -> Vec<&Binding> {
//!         vec![&self.confirm, &self.save]
//!     }
//!
//!     fn full_help(&self) -> Vec<Vec<&Binding>> {
//!         vec![vec![&self.confirm], vec![&self.save]]
//!     }
//! }
//! ```

pub mod datatable;
pub mod key;
pub mod paginator;

use bubbletea_rs::Cmd;

/// Focus management shared by components.
///
/// A focused component handles key messages; a blurred one ignores them.
///
/// ```rust
/// use bubbletea_datatable::prelude::*;
///
/// let mut table = DataTable::<JsonRow>::new(Vec::<ColumnDef<JsonRow>>::new(), Vec::new()).unwrap();
/// assert!(!table.focused());
/// table.focus();
/// assert!(table.focused());
/// table.blur();
/// assert!(!table.focused());
/// ```
pub trait Component {
    /// Focuses the component. May return a command to run.
    fn focus(&mut self) -> Option<Cmd>;

    /// Blurs the component.
    fn blur(&mut self);

    /// Whether the component is focused.
    fn focused(&self) -> bool;
}

pub use datatable::Model as DataTable;
pub use key::{Binding, KeyMap, KeyPress};
pub use paginator::Model as Paginator;

/// Common imports.
pub mod prelude {
    pub use crate::datatable::{
        AutoColumns, ColumnDef, ColumnSort, DataTableKeyMap, DataTableStyles, FieldKind,
        FieldSpec, FilterDescriptor, FilterPayload, FilterType, JsonRow, RowAction, TableError,
        TableOptions, TableRow, TableType, ToolbarAction,
    };
    pub use crate::key::{Binding, KeyMap};
    pub use crate::paginator::Model as Paginator;
    pub use crate::{Component, DataTable};
}
