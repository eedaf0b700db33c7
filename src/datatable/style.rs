//! Styles for the data table view.
//!
//! Defaults use `AdaptiveColor` so the table reads on light and dark
//! terminals alike.

use lipgloss_extras::prelude::*;

/// Header marker of an ascending sort.
pub const SORT_ASC: &str = "↑";
/// Header marker of a descending sort.
pub const SORT_DESC: &str = "↓";
/// Separator between cells.
pub const CELL_SEPARATOR: &str = " │ ";

/// Styles of every part of the table.
#[derive(Debug, Clone)]
pub struct DataTableStyles {
    /// Unpinned header cells.
    pub header: Style,
    /// Pinned header cells.
    pub pinned_header: Style,
    /// Body cells.
    pub cell: Style,
    /// The row under the cursor.
    pub cursor_row: Style,
    /// Selected rows.
    pub selected_row: Style,
    /// Cells while loading.
    pub skeleton: Style,
    /// The empty-body text.
    pub no_results: Style,
    /// Expanded row content.
    pub sub_component: Style,
    /// Dialog title.
    pub dialog_title: Style,
    /// Dialog body lines.
    pub dialog_body: Style,
    /// The confirm button.
    pub dialog_button: Style,
    /// The page indicator.
    pub pagination: Style,
}

impl Default for DataTableStyles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        Self {
            header: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            pinned_header: Style::new().bold(true).underline(true),
            cell: Style::new(),
            cursor_row: Style::new().foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            selected_row: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            skeleton: Style::new().faint(true),
            no_results: Style::new().foreground(subdued.clone()),
            sub_component: Style::new().foreground(subdued.clone()).italic(true),
            dialog_title: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230"))
                .padding(0, 1, 0, 1),
            dialog_body: Style::new(),
            dialog_button: Style::new().reverse(true),
            pagination: Style::new().foreground(subdued),
        }
    }
}
