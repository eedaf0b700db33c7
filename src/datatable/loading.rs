//! Loading projection: placeholder rows and skeleton cells while loading.

use super::column::{CellContext, CellRenderer, ColumnDef};
use super::types::TableRow;
use std::borrow::Cow;
use std::sync::Arc;

/// Number of placeholder rows shown while loading.
pub const PLACEHOLDER_ROWS: usize = 6;

/// Text drawn by the default skeleton renderer.
pub const SKELETON: &str = "░░░░░░";

/// Data and columns the row model should use.
#[derive(Debug)]
pub struct Projection<'a, R: Clone> {
    /// Rows to show.
    pub rows: Cow<'a, [R]>,
    /// Columns to show.
    pub columns: Cow<'a, [ColumnDef<R>]>,
}

impl<R: Clone> Projection<'_, R> {
    /// Whether this projection shows placeholders.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.rows, Cow::Owned(_))
    }
}

/// The default skeleton renderer.
pub fn skeleton_renderer<R>() -> CellRenderer<R> {
    Arc::new(|_: &CellContext<'_, R>| SKELETON.to_string())
}

/// Projects data and columns for the loading flag.
///
/// While loading, the rows are [`PLACEHOLDER_ROWS`] empty rows and every
/// column renders `skeleton` and offers no actions. Otherwise both inputs
/// pass through borrowed. The caller's data is never touched.
pub fn project<'a, R: TableRow>(
    is_loading: bool,
    data: &'a [R],
    columns: &'a [ColumnDef<R>],
    skeleton: &CellRenderer<R>,
) -> Projection<'a, R> {
    if !is_loading {
        return Projection {
            rows: Cow::Borrowed(data),
            columns: Cow::Borrowed(columns),
        };
    }
    let rows = vec![R::default(); PLACEHOLDER_ROWS];
    let columns = columns
        .iter()
        .cloned()
        .map(|mut column| {
            column.actions.clear();
            column.with_renderer(Arc::clone(skeleton))
        })
        .collect::<Vec<_>>();
    Projection {
        rows: Cow::Owned(rows),
        columns: Cow::Owned(columns),
    }
}
