//! Row model: the derived view of data, columns and table state.
//!
//! The row model is recomputed from scratch on every render. It applies
//! column filters and the global filter, sorts, paginates and renders the
//! visible cells. In manual mode the rows are taken as the current page and
//! only sorted; the page count comes from an external row count.

use super::action::render_actions;
use super::column::{CellContext, ColumnDef, HeaderCell, Pin};
use super::sync::split_multi_value;
use super::types::{
    compare_values, display_value, ColumnFilter, ColumnPinning, FilterType, RowKey,
    SortDirection, TableRow,
};
use super::state::TableState;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::trace;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// A row edit requested by a cell renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RowMutation {
    /// Remove the row at this data index.
    RemoveRow(usize),
    /// Write `value` to `field` of the row at `index`.
    UpdateData {
        /// Data index.
        index: usize,
        /// Field id.
        field: String,
        /// New value.
        value: Value,
    },
}

/// Capability handed to cell renderers for editing rows.
///
/// Requests are queued and applied by the table on its next update cycle,
/// never while a render is in progress.
#[derive(Debug, Clone, Default)]
pub struct RowMutations {
    queue: Arc<Mutex<Vec<RowMutation>>>,
}

impl RowMutations {
    /// Requests removal of the row at `index`.
    pub fn remove_row(&self, index: usize) {
        self.push(RowMutation::RemoveRow(index));
    }

    /// Requests `field` of the row at `index` be set to `value`.
    pub fn update_data(&self, index: usize, field: impl Into<String>, value: Value) {
        self.push(RowMutation::UpdateData {
            index,
            field: field.into(),
            value,
        });
    }

    /// Takes every queued request, oldest first.
    pub fn drain(&self) -> Vec<RowMutation> {
        self.queue
            .lock()
            .map(|mut q| std::mem::take(&mut *q))
            .unwrap_or_default()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().map(|q| q.is_empty()).unwrap_or(true)
    }

    fn push(&self, mutation: RowMutation) {
        if let Ok(mut q) = self.queue.lock() {
            q.push(mutation);
        }
    }
}

/// One rendered row of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRow {
    /// Index into the table data.
    pub index: usize,
    /// Row key.
    pub key: RowKey,
    /// Rendered cells, one per visible column.
    pub cells: Vec<String>,
    /// Whether the row is selected.
    pub selected: bool,
    /// Whether the row is expanded.
    pub expanded: bool,
}

/// The computed view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowModel {
    /// Header row of the visible columns.
    pub headers: Vec<HeaderCell>,
    /// Indices of the visible columns in display order.
    pub visible_columns: Vec<usize>,
    /// Rows of the current page.
    pub rows: Vec<ModelRow>,
    /// Rows left after filtering, across all pages.
    pub filtered_row_count: usize,
    /// Number of pages.
    pub page_count: usize,
}

/// Inputs of one row model computation.
pub struct RowModelInput<'a, R> {
    /// Rows to show.
    pub data: &'a [R],
    /// Column definitions.
    pub columns: &'a [ColumnDef<R>],
    /// Table state.
    pub state: &'a TableState<R>,
    /// Pinned columns.
    pub pinning: &'a ColumnPinning,
    /// Current page index.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Filtering and pagination happen outside the table.
    pub manual: bool,
    /// Rows are loading placeholders, shown whole and in order.
    pub placeholder: bool,
    /// Total row count in manual mode.
    pub row_count: Option<usize>,
    /// Key of a row given its data index.
    pub row_key: &'a dyn Fn(usize, &R) -> RowKey,
    /// Capability passed to cell renderers.
    pub mutations: &'a RowMutations,
}

/// Computes the row model.
pub fn compute<R: TableRow>(input: &RowModelInput<'_, R>) -> RowModel {
    let visible_columns = visible_column_order(input.columns, input.state, input.pinning);
    let headers = header_row(input, &visible_columns);

    let mut indices: Vec<usize> = (0..input.data.len()).collect();
    if !input.placeholder {
        if !input.manual {
            indices.retain(|&i| row_passes_filters(input, &visible_columns, &input.data[i]));
        }
        sort_indices(input, &mut indices);
    }

    let filtered_row_count = indices.len();
    let page_size = input.page_size.max(1);
    let total = if input.manual {
        input.row_count.unwrap_or(input.data.len())
    } else if input.placeholder {
        0
    } else {
        filtered_row_count
    };
    let page_count = total.div_ceil(page_size).max(1);

    let page: Vec<usize> = if input.manual || input.placeholder {
        indices
    } else {
        let page_index = input.page_index.min(page_count - 1);
        indices
            .into_iter()
            .skip(page_index * page_size)
            .take(page_size)
            .collect()
    };

    let rows = page
        .into_iter()
        .map(|index| {
            let row = &input.data[index];
            let key = (input.row_key)(index, row);
            let cells = visible_columns
                .iter()
                .map(|&c| {
                    let column = &input.columns[c];
                    let text = column.render(&CellContext {
                        row,
                        row_index: index,
                        row_key: &key,
                        column_id: &column.id,
                        value: column.value(row),
                        mutations: input.mutations,
                    });
                    match (text.is_empty(), column.actions.is_empty()) {
                        (_, true) => text,
                        (true, false) => render_actions(&column.actions),
                        (false, false) => format!("{text} {}", render_actions(&column.actions)),
                    }
                })
                .collect();
            ModelRow {
                index,
                selected: !input.placeholder && input.state.selection().is_selected(&key),
                expanded: !input.placeholder && input.state.is_expanded(&key),
                key,
                cells,
            }
        })
        .collect::<Vec<_>>();

    trace!(
        "row model: {} of {} rows on page, {} pages",
        rows.len(),
        filtered_row_count,
        page_count
    );

    RowModel {
        headers,
        visible_columns,
        rows,
        filtered_row_count,
        page_count,
    }
}

/// Visible columns: left pins, unpinned in declaration order, right pins.
///
/// Pins naming unknown columns are ignored.
pub fn visible_column_order<R>(
    columns: &[ColumnDef<R>],
    state: &TableState<R>,
    pinning: &ColumnPinning,
) -> Vec<usize> {
    let position = |id: &String| columns.iter().position(|c| &c.id == id);
    let left: Vec<usize> = pinning.left.iter().filter_map(position).collect();
    let right: Vec<usize> = pinning
        .right
        .iter()
        .filter_map(position)
        .filter(|i| !left.contains(i))
        .collect();
    let pinned: HashSet<usize> = left.iter().chain(right.iter()).copied().collect();
    let center = (0..columns.len()).filter(|i| !pinned.contains(i));

    left.iter()
        .copied()
        .chain(center)
        .chain(right.iter().copied())
        .filter(|&i| state.visibility().is_visible(&columns[i].id))
        .collect()
}

fn header_row<R>(input: &RowModelInput<'_, R>, visible: &[usize]) -> Vec<HeaderCell> {
    visible
        .iter()
        .map(|&i| {
            let column = &input.columns[i];
            let pinned = if input.pinning.left.contains(&column.id) {
                Some(Pin::Left)
            } else if input.pinning.right.contains(&column.id) {
                Some(Pin::Right)
            } else {
                None
            };
            HeaderCell {
                id: column.id.clone(),
                label: column.label().to_string(),
                sort: input
                    .state
                    .sorting()
                    .iter()
                    .find(|s| s.id == column.id)
                    .map(|s| s.direction),
                sortable: column.enable_sorting && column.has_accessor(),
                pinned,
            }
        })
        .collect()
}

fn row_passes_filters<R: TableRow>(
    input: &RowModelInput<'_, R>,
    visible: &[usize],
    row: &R,
) -> bool {
    let column_filters_pass = input.state.filters().iter().all(|filter| {
        match input.columns.iter().find(|c| c.id == filter.id) {
            Some(column) if column.enable_filtering => matches_filter(&column.value(row), filter),
            // Unknown or non-filterable columns do not constrain rows.
            _ => true,
        }
    });
    if !column_filters_pass {
        return false;
    }
    match input.state.global_filter() {
        Some(query) => {
            let matcher = SkimMatcherV2::default();
            visible.iter().any(|&i| {
                let column = &input.columns[i];
                column.has_accessor()
                    && matcher
                        .fuzzy_match(&display_value(&column.value(row)), query)
                        .is_some()
            })
        }
        None => true,
    }
}

/// Whether `value` satisfies `filter`.
pub fn matches_filter(value: &Value, filter: &ColumnFilter) -> bool {
    match filter.kind {
        FilterType::Text => display_value(value)
            .to_lowercase()
            .contains(&display_value(&filter.value).to_lowercase()),
        FilterType::Select => value_tokens(value).contains(&display_value(&filter.value)),
        FilterType::SelectMultiple | FilterType::SelectAsync => {
            let wanted = split_multi_value(&filter.value);
            value_tokens(value).iter().any(|t| wanted.contains(t))
        }
        FilterType::Range => {
            let Some(n) = as_number(value) else {
                return false;
            };
            let (min, max) = match &filter.value {
                Value::Array(bounds) => (
                    bounds.first().and_then(as_number),
                    bounds.get(1).and_then(as_number),
                ),
                other => (as_number(other), None),
            };
            min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m)
        }
        FilterType::Date => {
            let wanted = display_value(&filter.value);
            let prefix = wanted.get(..10).unwrap_or(&wanted);
            display_value(value).starts_with(prefix)
        }
        FilterType::Boolean => {
            let wanted = match &filter.value {
                Value::Bool(b) => Some(*b),
                Value::String(s) => s.parse::<bool>().ok(),
                _ => None,
            };
            wanted.is_some() && value.as_bool() == wanted
        }
    }
}

/// Text forms a value can match on: array items, relation id and name.
fn value_tokens(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(display_value).collect(),
        Value::Object(map) => {
            let mut tokens = vec![display_value(value)];
            if let Some(id) = map.get("id") {
                tokens.push(display_value(id));
            }
            tokens
        }
        other => vec![display_value(other)],
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn sort_indices<R: TableRow>(input: &RowModelInput<'_, R>, indices: &mut [usize]) {
    let keys: Vec<(&ColumnDef<R>, SortDirection)> = input
        .state
        .sorting()
        .iter()
        .filter_map(|s| {
            input
                .columns
                .iter()
                .find(|c| c.id == s.id && c.enable_sorting && c.has_accessor())
                .map(|c| (c, s.direction))
        })
        .collect();
    if keys.is_empty() {
        return;
    }
    indices.sort_by(|&a, &b| {
        for (column, direction) in &keys {
            let ord = compare_values(
                &column.value(&input.data[a]),
                &column.value(&input.data[b]),
            );
            let ord = match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}
