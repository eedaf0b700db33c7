//! Key bindings for data table navigation and interaction.
//!
//! - **Cursor**: `↑/k`, `↓/j` move between rows; `←`, `→` move the focused column
//! - **Pages**: `pgup/h`, `pgdn/l`
//! - **Sorting**: `s` cycles the focused column, `S` adds it to the sort
//! - **Rows**: `space` selects, `ctrl+a` selects the page, `x` expands,
//!   `enter` runs the row's first action
//! - **Dialogs**: `enter/y` confirms, `esc/n` cancels
//! - **Toolbar**: `ctrl+n` runs the default toolbar action

use crate::key::{self, KeyMap};

/// Every binding the data table reacts to.
#[derive(Debug, Clone)]
pub struct DataTableKeyMap {
    /// Cursor to the previous row.
    pub cursor_up: key::Binding,
    /// Cursor to the next row.
    pub cursor_down: key::Binding,
    /// Focus the previous column.
    pub column_left: key::Binding,
    /// Focus the next column.
    pub column_right: key::Binding,
    /// Next page.
    pub next_page: key::Binding,
    /// Previous page.
    pub prev_page: key::Binding,
    /// Cycle the sort of the focused column.
    pub sort: key::Binding,
    /// Add the focused column to the sort.
    pub sort_multi: key::Binding,
    /// Select the cursor row.
    pub toggle_select: key::Binding,
    /// Select every row of the page.
    pub select_page: key::Binding,
    /// Expand the cursor row.
    pub toggle_expand: key::Binding,
    /// Run the first action of the cursor row.
    pub activate: key::Binding,
    /// Confirm the open dialog.
    pub confirm: key::Binding,
    /// Cancel the open dialog.
    pub cancel: key::Binding,
    /// Run the default toolbar action.
    pub toolbar_action: key::Binding,
}

impl Default for DataTableKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: key::Binding::from_strs(&["up", "k"]).with_help("↑/k", "up"),
            cursor_down: key::Binding::from_strs(&["down", "j"]).with_help("↓/j", "down"),
            column_left: key::Binding::from_strs(&["left"]).with_help("←", "prev column"),
            column_right: key::Binding::from_strs(&["right"]).with_help("→", "next column"),
            next_page: key::Binding::from_strs(&["pgdown", "l"]).with_help("pgdn/l", "next page"),
            prev_page: key::Binding::from_strs(&["pgup", "h"]).with_help("pgup/h", "prev page"),
            sort: key::Binding::from_strs(&["s"]).with_help("s", "sort"),
            sort_multi: key::Binding::from_strs(&["S"]).with_help("S", "add sort"),
            toggle_select: key::Binding::from_strs(&["space"]).with_help("space", "select"),
            select_page: key::Binding::from_strs(&["ctrl+a"]).with_help("ctrl+a", "select page"),
            toggle_expand: key::Binding::from_strs(&["x"]).with_help("x", "expand"),
            activate: key::Binding::from_strs(&["enter"]).with_help("enter", "open"),
            confirm: key::Binding::from_strs(&["enter", "y"]).with_help("enter/y", "confirm"),
            cancel: key::Binding::from_strs(&["esc", "n"]).with_help("esc/n", "cancel"),
            toolbar_action: key::Binding::from_strs(&["ctrl+n"]).with_help("ctrl+n", "new"),
        }
    }
}

impl KeyMap for DataTableKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.cursor_up,
            &self.cursor_down,
            &self.sort,
            &self.toggle_select,
            &self.activate,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![
                &self.cursor_up,
                &self.cursor_down,
                &self.column_left,
                &self.column_right,
                &self.next_page,
                &self.prev_page,
            ],
            vec![
                &self.sort,
                &self.sort_multi,
                &self.toggle_select,
                &self.select_page,
                &self.toggle_expand,
            ],
            vec![
                &self.activate,
                &self.confirm,
                &self.cancel,
                &self.toolbar_action,
            ],
        ]
    }
}
