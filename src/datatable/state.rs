//! The table state store.
//!
//! One owned struct holds every piece of interactive state: sorting, column
//! visibility, column filters, row selection, expansion, the global filter
//! and the pending row action. All mutation goes through the setters here;
//! consumers read a [`StateSnapshot`] or the individual getters.

use super::action::PendingAction;
use super::dialog::{self, DialogState, DialogView};
use super::types::{
    ColumnSort, FilterType, FiltersState, RowKey, SelectionState, SortDirection, SortingState,
    VisibilityState,
};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Interactive table state.
#[derive(Debug)]
pub struct TableState<R> {
    sorting: SortingState,
    visibility: VisibilityState,
    filters: FiltersState,
    selection: SelectionState,
    expanded: BTreeSet<RowKey>,
    global_filter: Option<String>,
    pending: Option<PendingAction<R>>,
    loading: bool,
}

impl<R> Default for TableState<R> {
    fn default() -> Self {
        Self {
            sorting: SortingState::new(),
            visibility: VisibilityState::default(),
            filters: FiltersState::new(),
            selection: SelectionState::default(),
            expanded: BTreeSet::new(),
            global_filter: None,
            pending: None,
            loading: false,
        }
    }
}

/// Read-only copy of the serializable state slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    /// Sort keys.
    pub sorting: SortingState,
    /// Column visibility.
    pub visibility: VisibilityState,
    /// Committed column filters.
    pub filters: FiltersState,
    /// Selected rows.
    pub selection: SelectionState,
    /// Expanded rows.
    pub expanded: BTreeSet<RowKey>,
    /// Global filter query.
    pub global_filter: Option<String>,
    /// Whether a load is in flight.
    pub loading: bool,
}

impl<R> TableState<R> {
    /// State with the given columns hidden. Everything else starts empty.
    pub fn with_hidden_columns<S: AsRef<str>>(hidden: &[S]) -> Self {
        Self {
            visibility: VisibilityState::hiding(hidden),
            ..Self::default()
        }
    }

    /// Copies the serializable slots.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            sorting: self.sorting.clone(),
            visibility: self.visibility.clone(),
            filters: self.filters.clone(),
            selection: self.selection.clone(),
            expanded: self.expanded.clone(),
            global_filter: self.global_filter.clone(),
            loading: self.loading,
        }
    }

    // Sorting

    /// Current sort keys.
    pub fn sorting(&self) -> &SortingState {
        &self.sorting
    }

    /// Replaces the sort keys.
    pub fn set_sorting(&mut self, sorting: SortingState) {
        self.sorting = sorting;
    }

    /// Cycles the sort of `id`: ascending, descending, unsorted.
    ///
    /// With `multi` the column is added to the existing keys, otherwise it
    /// replaces them.
    pub fn toggle_sorting(&mut self, id: &str, multi: bool) {
        let current = self
            .sorting
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.direction);
        let next = match current {
            None => Some(ColumnSort::asc(id)),
            Some(SortDirection::Asc) => Some(ColumnSort::desc(id)),
            Some(SortDirection::Desc) => None,
        };
        if multi {
            match (next, self.sorting.iter_mut().find(|s| s.id == id)) {
                (Some(next), Some(existing)) => *existing = next,
                (Some(next), None) => self.sorting.push(next),
                (None, _) => self.sorting.retain(|s| s.id != id),
            }
        } else {
            self.sorting = next.into_iter().collect();
        }
    }

    // Visibility

    /// Column visibility.
    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    /// Replaces column visibility.
    pub fn set_column_visibility(&mut self, visibility: VisibilityState) {
        self.visibility = visibility;
    }

    /// Shows or hides column `id`.
    pub fn set_column_visible(&mut self, id: &str, visible: bool) {
        self.visibility.set(id, visible);
    }

    /// Flips the visibility of column `id`.
    pub fn toggle_column_visible(&mut self, id: &str) {
        let visible = self.visibility.is_visible(id);
        self.visibility.set(id, !visible);
    }

    // Filters

    /// Committed column filters.
    pub fn filters(&self) -> &FiltersState {
        &self.filters
    }

    /// Replaces every column filter.
    pub fn set_filters(&mut self, filters: FiltersState) {
        self.filters = filters;
    }

    /// Sets or, for an empty value, removes the filter of column `id`.
    pub fn set_column_filter(&mut self, id: &str, value: Value, kind: FilterType) {
        self.filters.set(id, value, kind);
    }

    /// Removes every column filter and the global filter.
    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.global_filter = None;
    }

    /// The global filter query, if any.
    pub fn global_filter(&self) -> Option<&str> {
        self.global_filter.as_deref()
    }

    /// Sets the global filter; an empty query clears it.
    pub fn set_global_filter(&mut self, query: &str) {
        self.global_filter = (!query.is_empty()).then(|| query.to_string());
    }

    // Selection

    /// Selected rows.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Replaces the selection. Ignored while loading.
    ///
    /// Returns whether the selection was applied.
    pub fn set_row_selection(&mut self, selection: SelectionState) -> bool {
        if self.loading {
            debug!("selection change ignored while loading");
            return false;
        }
        self.selection = selection;
        true
    }

    /// Flips the selection of one row. Ignored while loading.
    pub fn toggle_row_selected(&mut self, key: &str) -> bool {
        let mut next = self.selection.clone();
        next.set(key, !self.selection.is_selected(key));
        self.set_row_selection(next)
    }

    /// Clears the selection, also while loading.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drops selected keys for which `keep` is false.
    pub fn retain_selection<F: Fn(&str) -> bool>(&mut self, keep: F) {
        self.selection.0.retain(|k, _| keep(k));
    }

    // Expansion

    /// Whether the row is expanded.
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// Flips the expansion of one row.
    pub fn toggle_expanded(&mut self, key: &str) {
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    /// Collapses every row.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    // Pending action

    /// The pending row action.
    pub fn pending_action(&self) -> Option<&PendingAction<R>> {
        self.pending.as_ref()
    }

    /// Sets the pending action, replacing any unconsumed one.
    pub fn set_pending_action(&mut self, action: PendingAction<R>) {
        if let Some(previous) = &self.pending {
            debug!(
                "replacing pending {:?} with {:?}",
                previous.action_type(),
                action.action_type()
            );
        }
        self.pending = Some(action);
    }

    /// Slot access for the dialog workflow.
    pub(crate) fn pending_slot(&mut self) -> &mut Option<PendingAction<R>> {
        &mut self.pending
    }

    /// Where the dialog workflow is.
    pub fn dialog_state(&self) -> DialogState {
        dialog::state_of(&self.pending)
    }

    /// Text of the open dialog.
    pub fn dialog_view(&self) -> Option<DialogView> {
        dialog::dialog_view(&self.pending)
    }

    // Loading

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sets the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}
