//! The data table model: owns the data, the column list and the table
//! state, and reconciles them after every change.
//!
//! Columns come from a [`ColumnsSource`]: either generated from field
//! metadata ([`AutoColumns`]) or supplied by the caller. Once built, the
//! rest of the table does not care which.

use super::action::ActionDispatcher;
use super::column::{CellRenderer, ColumnDef};
use super::dialog::{self, DialogState, DialogView};
use super::error::{Result, TableError};
use super::generator::{generate, AutoColumns, ACTIONS_COLUMN_ID};
use super::keys::DataTableKeyMap;
use super::loading;
use super::options::{FilterDescriptor, TableOptions, ToolbarAction};
use super::row_model::{self, RowModel, RowModelInput, RowMutation, RowMutations};
use super::state::{StateSnapshot, TableState};
use super::style::DataTableStyles;
use super::sync::{FetchRequest, FilterPayload, FilterSync};
use super::types::{
    display_value, is_empty_value, ColumnPinning, FilterType, RowKey, SelectionState,
    SortingState, TableRow, VisibilityState,
};
use crate::paginator;
use bubbletea_rs::Cmd;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Body text when a declarative table has no rows.
pub const NO_DATA_TEXT: &str = "No data results";
/// Body text when an auto-generated table has no rows.
pub const NO_RESULTS_TEXT: &str = "No results.";

/// Renders the expanded content of a row.
pub type SubComponentRenderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Receives the data after the table changed it.
pub type DataCallback<R> = Arc<dyn Fn(&[R]) + Send + Sync>;

/// Anything that produces a table's column list.
pub trait ColumnSource<R> {
    /// Builds the columns. Ids must be unique.
    fn columns(&self) -> Result<Vec<ColumnDef<R>>>;

    /// Pinning used when the options do not name any.
    fn default_pinning(&self) -> ColumnPinning {
        ColumnPinning::default()
    }

    /// Text of the empty body.
    fn no_results_text(&self) -> &'static str {
        NO_DATA_TEXT
    }
}

impl<R: TableRow> ColumnSource<R> for AutoColumns<R> {
    fn columns(&self) -> Result<Vec<ColumnDef<R>>> {
        generate(self)
    }

    fn default_pinning(&self) -> ColumnPinning {
        ColumnPinning {
            left: self
                .field_column_ids()
                .first()
                .map(|id| vec![id.to_string()])
                .unwrap_or_default(),
            right: if self.has_actions() {
                vec![ACTIONS_COLUMN_ID.to_string()]
            } else {
                Vec::new()
            },
        }
    }

    fn no_results_text(&self) -> &'static str {
        NO_RESULTS_TEXT
    }
}

impl<R> ColumnSource<R> for Vec<ColumnDef<R>> {
    fn columns(&self) -> Result<Vec<ColumnDef<R>>> {
        let mut seen = HashSet::new();
        for column in self {
            if !seen.insert(column.id.as_str()) {
                return Err(TableError::DuplicateColumnId(column.id.clone()));
            }
        }
        Ok(self.clone())
    }
}

/// Where a table's columns come from.
pub enum ColumnsSource<R> {
    /// Generated from field metadata.
    Auto(AutoColumns<R>),
    /// Supplied by the caller.
    Manual(Vec<ColumnDef<R>>),
}

impl<R: TableRow> ColumnSource<R> for ColumnsSource<R> {
    fn columns(&self) -> Result<Vec<ColumnDef<R>>> {
        match self {
            ColumnsSource::Auto(auto) => auto.columns(),
            ColumnsSource::Manual(columns) => columns.columns(),
        }
    }

    fn default_pinning(&self) -> ColumnPinning {
        match self {
            ColumnsSource::Auto(auto) => auto.default_pinning(),
            ColumnsSource::Manual(columns) => columns.default_pinning(),
        }
    }

    fn no_results_text(&self) -> &'static str {
        match self {
            ColumnsSource::Auto(auto) => auto.no_results_text(),
            ColumnsSource::Manual(columns) => columns.no_results_text(),
        }
    }
}

impl<R> From<AutoColumns<R>> for ColumnsSource<R> {
    fn from(auto: AutoColumns<R>) -> Self {
        ColumnsSource::Auto(auto)
    }
}

impl<R> From<Vec<ColumnDef<R>>> for ColumnsSource<R> {
    fn from(columns: Vec<ColumnDef<R>>) -> Self {
        ColumnsSource::Manual(columns)
    }
}

/// An interactive data table.
///
/// # Examples
///
/// ```
/// use bubbletea_datatable::datatable::{ColumnDef, JsonRow, Model};
/// use serde_json::json;
///
/// let rows: Vec<JsonRow> = vec![
///     json!({"id": 1, "name": "A"}).as_object().cloned().unwrap(),
///     json!({"id": 2, "name": "B"}).as_object().cloned().unwrap(),
/// ];
/// let columns = vec![ColumnDef::accessor("id"), ColumnDef::accessor("name")];
/// let mut table = Model::new(columns, rows).unwrap();
/// table.toggle_sorting("name", false);
/// table.toggle_sorting("name", false);
/// let names: Vec<_> = table.row_model().rows.iter().map(|r| r.cells[1].clone()).collect();
/// assert_eq!(names, vec!["B", "A"]);
/// ```
pub struct Model<R: TableRow> {
    pub(super) columns: Vec<ColumnDef<R>>,
    pub(super) data: Vec<R>,
    pub(super) state: TableState<R>,
    pub(super) paginator: paginator::Model,
    pub(super) options: TableOptions,
    pub(super) default_pinning: ColumnPinning,
    pub(super) no_results_text: &'static str,
    pub(super) sync: FilterSync,
    pub(super) toolbar_actions: Vec<ToolbarAction>,
    pub(super) render_sub_component: Option<SubComponentRenderer<R>>,
    pub(super) on_data_update: Option<DataCallback<R>>,
    pub(super) mutations: RowMutations,
    pub(super) skeleton: CellRenderer<R>,
    pub(super) cursor: usize,
    pub(super) focused_column: usize,
    pub(super) mounted: bool,
    pub(super) focus: bool,
    pub(super) keymap: DataTableKeyMap,
    pub(super) styles: DataTableStyles,
}

impl<R: TableRow> Model<R> {
    /// Creates a table over `data` with columns from `source`.
    ///
    /// Fails when two columns share an id.
    pub fn new(source: impl Into<ColumnsSource<R>>, data: Vec<R>) -> Result<Self> {
        let source = source.into();
        let columns = source.columns()?;
        debug!("table created with {} columns", columns.len());
        let mut model = Self {
            columns,
            data,
            state: TableState::default(),
            paginator: paginator::Model::new(),
            options: TableOptions::default(),
            default_pinning: source.default_pinning(),
            no_results_text: source.no_results_text(),
            sync: FilterSync::default(),
            toolbar_actions: Vec::new(),
            render_sub_component: None,
            on_data_update: None,
            mutations: RowMutations::default(),
            skeleton: loading::skeleton_renderer(),
            cursor: 0,
            focused_column: 0,
            mounted: false,
            focus: false,
            keymap: DataTableKeyMap::default(),
            styles: DataTableStyles::default(),
        };
        model.apply_options();
        Ok(model)
    }

    // Builders

    /// Replaces all options.
    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self.apply_options();
        self
    }

    /// Hides columns when the table mounts.
    pub fn with_exclude_columns<S: Into<String>>(mut self, ids: Vec<S>) -> Self {
        self.options.exclude_columns = ids.into_iter().map(Into::into).collect();
        self.apply_options();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.options.page_size = page_size;
        self.apply_options();
        self
    }

    /// Enables row selection.
    pub fn with_row_selection(mut self, enabled: bool) -> Self {
        self.options.enable_row_selection = enabled;
        self
    }

    /// Keys rows by `field` instead of by position.
    pub fn with_row_id_field(mut self, field: impl Into<String>) -> Self {
        self.options.row_id_field = Some(field.into());
        self
    }

    /// Hands filtering and pagination to the caller.
    pub fn with_manual_pagination(mut self, row_count: Option<usize>) -> Self {
        self.options.manual_pagination = true;
        self.options.row_count = row_count;
        self.apply_options();
        self
    }

    /// Pins columns to the edges.
    pub fn with_pinning(mut self, pinning: ColumnPinning) -> Self {
        self.options.pinning = pinning;
        self
    }

    /// Filters committed at mount. Descriptors with an empty value are kept
    /// for their filter type only.
    pub fn with_detailed_filter(mut self, descriptors: Vec<FilterDescriptor>) -> Self {
        self.options.detailed_filter = descriptors;
        self.apply_options();
        self
    }

    /// Toolbar filter descriptors.
    pub fn with_filters(mut self, descriptors: Vec<FilterDescriptor>) -> Self {
        self.options.filters = descriptors;
        self
    }

    /// Sets the fetch callback of manual mode.
    pub fn with_fetch_request<F>(mut self, fetch: F) -> Self
    where
        F: Fn(usize, &FilterPayload) -> Option<Cmd> + Send + Sync + 'static,
    {
        let fetch: FetchRequest = Arc::new(fetch);
        self.sync.set_fetch(Some(fetch));
        self
    }

    /// Enables row expansion with `render` producing the expanded content.
    pub fn with_sub_component<F>(mut self, render: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        self.render_sub_component = Some(Arc::new(render));
        self
    }

    /// Called with the data whenever the table changes it.
    pub fn with_on_data_update<F>(mut self, f: F) -> Self
    where
        F: Fn(&[R]) + Send + Sync + 'static,
    {
        self.on_data_update = Some(Arc::new(f));
        self
    }

    /// Adds a toolbar action. The first one added is the default.
    pub fn with_toolbar_action(mut self, action: ToolbarAction) -> Self {
        self.toolbar_actions.push(action);
        self
    }

    /// Replaces the toolbar actions.
    pub fn with_toolbar_actions(mut self, actions: Vec<ToolbarAction>) -> Self {
        self.toolbar_actions = actions;
        self
    }

    /// Starts in the loading state.
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.state.set_loading(loading);
        self
    }

    /// Replaces the skeleton renderer used while loading.
    pub fn with_skeleton(mut self, renderer: CellRenderer<R>) -> Self {
        self.skeleton = renderer;
        self
    }

    /// Replaces the styles.
    pub fn with_styles(mut self, styles: DataTableStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Replaces the key bindings.
    pub fn with_keymap(mut self, keymap: DataTableKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Derives the mount-time state from the options.
    fn apply_options(&mut self) {
        self.paginator.set_page_size(self.options.page_size);
        self.state
            .set_column_visibility(VisibilityState::hiding(&self.options.exclude_columns));
        let mut filters = super::types::FiltersState::new();
        for seed in &self.options.detailed_filter {
            if !is_empty_value(&seed.value) {
                filters.set(seed.name.clone(), seed.value.clone(), seed.kind);
            }
        }
        self.state.set_filters(filters);
        self.refresh_pagination();
    }

    // Lifecycle

    /// Mounts the table. In manual mode this sends the first fetch request.
    pub fn mount(&mut self) -> Option<Cmd> {
        self.mounted = true;
        self.reconcile()
    }

    /// Applies queued row edits, fires a pending link, refreshes pagination
    /// and, in manual mode, requests data when filters or page changed.
    pub(super) fn reconcile(&mut self) -> Option<Cmd> {
        self.apply_pending_mutations();
        dialog::react(self.state.pending_slot());
        self.refresh_pagination();
        if !(self.mounted && self.options.manual_pagination) {
            return None;
        }
        let payload = FilterPayload::build(self.state.filters(), self.state.global_filter());
        self.sync.sync(self.paginator.page_index, payload)
    }

    fn refresh_pagination(&mut self) {
        let rows = if self.options.manual_pagination {
            self.options.row_count.unwrap_or(self.data.len())
        } else if self.state.is_loading() {
            return;
        } else {
            self.row_model().filtered_row_count
        };
        self.paginator.set_row_count(rows);
    }

    fn apply_pending_mutations(&mut self) {
        for mutation in self.mutations.drain() {
            let result = match &mutation {
                RowMutation::RemoveRow(index) => self.remove_row(*index).map(|_| ()),
                RowMutation::UpdateData {
                    index,
                    field,
                    value,
                } => self.update_data(*index, field, value.clone()),
            };
            if let Err(err) = result {
                warn!("dropping row mutation {mutation:?}: {err}");
            }
        }
    }

    // Data

    /// The table data.
    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Replaces the data.
    ///
    /// Selected keys that no longer name a row are dropped, so selection
    /// survives a refresh when rows are keyed by a stable id field.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
        let keys: HashSet<RowKey> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, row)| self.row_key(i, row))
            .collect();
        self.state.retain_selection(|k| keys.contains(k));
        self.refresh_pagination();
    }

    /// Sets the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.state.set_loading(loading);
        self.refresh_pagination();
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Sets the external row count of manual mode.
    pub fn set_row_count(&mut self, row_count: Option<usize>) -> Option<Cmd> {
        self.options.row_count = row_count;
        self.reconcile()
    }

    /// Removes the row at `index` and clears the selection.
    pub fn remove_row(&mut self, index: usize) -> Result<R> {
        let len = self.data.len();
        if index >= len {
            return Err(TableError::RowOutOfBounds { index, len });
        }
        let removed = self.data.remove(index);
        self.state.clear_selection();
        self.state.collapse_all();
        debug!("removed row {index}, {} left", self.data.len());
        self.notify_data_update();
        self.refresh_pagination();
        Ok(removed)
    }

    /// Writes `value` to `field` of the row at `index`.
    pub fn update_data(&mut self, index: usize, field: &str, value: Value) -> Result<()> {
        let len = self.data.len();
        let row = self
            .data
            .get_mut(index)
            .ok_or(TableError::RowOutOfBounds { index, len })?;
        if !row.set_field(field, value) {
            return Err(TableError::UnknownColumn(field.to_string()));
        }
        debug!("updated `{field}` of row {index}");
        self.notify_data_update();
        Ok(())
    }

    /// Handle for queueing row edits from outside a render.
    ///
    /// Queued edits are applied on the next `update`.
    pub fn mutations(&self) -> RowMutations {
        self.mutations.clone()
    }

    fn notify_data_update(&self) {
        if let Some(f) = &self.on_data_update {
            f(&self.data);
        }
    }

    // Columns and state

    /// The column list.
    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    /// The table state.
    pub fn state(&self) -> &TableState<R> {
        &self.state
    }

    /// A serializable copy of the table state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// The options in effect.
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Pinning in effect: the configured one, else the source's default.
    pub fn pinning(&self) -> &ColumnPinning {
        if self.options.pinning.left.is_empty() && self.options.pinning.right.is_empty() {
            &self.default_pinning
        } else {
            &self.options.pinning
        }
    }

    /// Replaces the sort keys.
    pub fn set_sorting(&mut self, sorting: SortingState) {
        self.state.set_sorting(sorting);
    }

    /// Cycles the sort of column `id`.
    pub fn toggle_sorting(&mut self, id: &str, multi: bool) {
        match self.columns.iter().find(|c| c.id == id) {
            Some(column) if column.enable_sorting && column.has_accessor() => {
                self.state.toggle_sorting(id, multi);
            }
            _ => debug!("column `{id}` cannot be sorted"),
        }
    }

    /// Shows or hides column `id`.
    pub fn set_column_visible(&mut self, id: &str, visible: bool) {
        self.state.set_column_visible(id, visible);
        self.clamp_focused_column();
    }

    /// Flips the visibility of column `id`.
    pub fn toggle_column_visible(&mut self, id: &str) {
        self.state.toggle_column_visible(id);
        self.clamp_focused_column();
    }

    /// Commits a filter on column `id`. An empty value removes it.
    ///
    /// Resets to the first page.
    pub fn set_column_filter(&mut self, id: &str, value: Value) -> Option<Cmd> {
        let kind = self
            .options
            .filter_kind(id)
            .or_else(|| {
                self.columns
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.filter_type)
            })
            .unwrap_or(FilterType::Text);
        self.state.set_column_filter(id, value, kind);
        self.first_page();
        self.reconcile()
    }

    /// Sets the global search query. An empty query clears it.
    pub fn set_global_filter(&mut self, query: &str) -> Option<Cmd> {
        self.state.set_global_filter(query);
        self.first_page();
        self.reconcile()
    }

    /// Removes every filter.
    pub fn reset_filters(&mut self) -> Option<Cmd> {
        self.state.reset_filters();
        self.first_page();
        self.reconcile()
    }

    fn first_page(&mut self) {
        self.paginator.page_index = 0;
        self.cursor = 0;
    }

    // Pages

    /// Zero-based index of the current page.
    pub fn page_index(&self) -> usize {
        self.paginator.page_index
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.paginator.total_pages
    }

    /// Moves to page `index`, clamped to the last page.
    pub fn set_page_index(&mut self, index: usize) -> Option<Cmd> {
        if self.paginator.set_page_index(index) {
            self.cursor = 0;
        }
        self.reconcile()
    }

    /// Moves to the next page.
    pub fn next_page(&mut self) -> Option<Cmd> {
        if self.paginator.next_page() {
            self.cursor = 0;
        }
        self.reconcile()
    }

    /// Moves to the previous page.
    pub fn prev_page(&mut self) -> Option<Cmd> {
        if self.paginator.prev_page() {
            self.cursor = 0;
        }
        self.reconcile()
    }

    // Rows

    /// Computes the current view of the data.
    pub fn row_model(&self) -> RowModel {
        let projection = loading::project(
            self.state.is_loading(),
            &self.data,
            &self.columns,
            &self.skeleton,
        );
        let row_key = |index: usize, row: &R| self.row_key(index, row);
        row_model::compute(&RowModelInput {
            data: &projection.rows,
            columns: &projection.columns,
            state: &self.state,
            pinning: self.pinning(),
            page_index: self.paginator.page_index,
            page_size: self.paginator.page_size,
            manual: self.options.manual_pagination,
            placeholder: projection.is_placeholder(),
            row_count: self.options.row_count,
            row_key: &row_key,
            mutations: &self.mutations,
        })
    }

    /// Key of the row at data index `index`.
    pub fn row_key(&self, index: usize, row: &R) -> RowKey {
        self.options
            .row_id_field
            .as_deref()
            .and_then(|field| row.field(field))
            .map(|v| display_value(&v))
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| index.to_string())
    }

    /// Cursor position on the current page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor, clamped to the rows of the current page.
    pub fn set_cursor(&mut self, cursor: usize) {
        let rows = self.row_model().rows.len();
        self.cursor = cursor.min(rows.saturating_sub(1));
    }

    /// Text shown in place of an empty body.
    pub fn no_results_text(&self) -> &str {
        self.no_results_text
    }

    // Selection

    /// Flips the selection of row `key`. Ignored while loading or when
    /// selection is disabled.
    pub fn toggle_row_selected(&mut self, key: &str) -> bool {
        if !self.options.enable_row_selection {
            return false;
        }
        self.state.toggle_row_selected(key)
    }

    /// Selects every row of the current page, or clears them if all were
    /// already selected.
    pub fn toggle_all_page_rows_selected(&mut self) -> bool {
        if !self.options.enable_row_selection {
            return false;
        }
        let keys: Vec<RowKey> = self.row_model().rows.into_iter().map(|r| r.key).collect();
        let all = keys.iter().all(|k| self.state.selection().is_selected(k));
        let mut next: SelectionState = self.state.selection().clone();
        for key in keys {
            next.set(key, !all);
        }
        self.state.set_row_selection(next)
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    /// Selected rows in data order.
    pub fn selected_rows(&self) -> Vec<&R> {
        self.data
            .iter()
            .enumerate()
            .filter(|(i, row)| self.state.selection().is_selected(&self.row_key(*i, row)))
            .map(|(_, row)| row)
            .collect()
    }

    // Expansion

    /// Whether rows can be expanded.
    pub fn is_expandable(&self) -> bool {
        self.render_sub_component.is_some()
    }

    /// Flips the expansion of row `key`. Returns `false` when rows cannot
    /// be expanded.
    pub fn toggle_expanded(&mut self, key: &str) -> bool {
        if !self.is_expandable() {
            return false;
        }
        self.state.toggle_expanded(key);
        true
    }

    // Row actions and dialogs

    /// Triggers action `action_index` of column `column_id` on the row at
    /// data index `row_index`.
    ///
    /// The action becomes the pending action. A link fires on the next
    /// `update`; dialog actions stay pending until confirmed or cancelled.
    /// Returns whether an action was triggered.
    pub fn activate_action(&mut self, row_index: usize, column_id: &str, action_index: usize) -> bool {
        if self.state.is_loading() {
            debug!("row action ignored while loading");
            return false;
        }
        let (Some(row), Some(column)) = (
            self.data.get(row_index),
            self.columns.iter().find(|c| c.id == column_id),
        ) else {
            return false;
        };
        let mut pending = None;
        let selected = ActionDispatcher::new(row, row_index, &column.actions)
            .select(action_index, |p| pending = Some(p));
        if let Some(pending) = pending {
            self.state.set_pending_action(pending);
        }
        selected
    }

    /// Where the dialog workflow is.
    pub fn dialog_state(&self) -> DialogState {
        self.state.dialog_state()
    }

    /// Whether a dialog is open.
    pub fn is_dialog_open(&self) -> bool {
        matches!(
            self.dialog_state(),
            DialogState::ConfirmationOpen | DialogState::CustomOpen
        )
    }

    /// Text of the open dialog.
    pub fn dialog_view(&self) -> Option<DialogView> {
        self.state.dialog_view()
    }

    /// Confirms the open dialog.
    pub fn confirm_dialog(&mut self) -> bool {
        dialog::confirm(self.state.pending_slot())
    }

    /// Cancels the open dialog.
    pub fn cancel_dialog(&mut self) -> bool {
        dialog::cancel(self.state.pending_slot())
    }

    // Toolbar

    /// Toolbar actions in order.
    pub fn toolbar_actions(&self) -> &[ToolbarAction] {
        &self.toolbar_actions
    }

    /// The first toolbar action.
    pub fn default_toolbar_action(&self) -> Option<&ToolbarAction> {
        self.toolbar_actions.first()
    }

    /// Runs toolbar action `index`. Returns whether it exists.
    pub fn trigger_toolbar_action(&self, index: usize) -> bool {
        match self.toolbar_actions.get(index) {
            Some(action) => {
                debug!("toolbar action `{}`", action.label);
                (action.on_click)();
                true
            }
            None => false,
        }
    }

    /// Toolbar filter descriptors.
    pub fn filter_descriptors(&self) -> &[FilterDescriptor] {
        &self.options.filters
    }

    pub(super) fn clamp_focused_column(&mut self) {
        let visible = row_model::visible_column_order(&self.columns, &self.state, self.pinning());
        self.focused_column = self.focused_column.min(visible.len().saturating_sub(1));
    }

    /// Replaces the visibility state.
    pub fn set_column_visibility(&mut self, visibility: VisibilityState) {
        self.state.set_column_visibility(visibility);
        self.clamp_focused_column();
    }
}
