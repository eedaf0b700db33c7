//! Message handling and focus for the data table.

use super::types::TableRow;
use super::Model;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use log::trace;

impl<R: TableRow> Model<R> {
    /// Handles a message and reconciles the table.
    ///
    /// Keys are only handled while focused. Queued row edits are applied and
    /// fetch requests emitted either way.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if self.focus {
            if let Some(key) = msg.downcast_ref::<KeyMsg>() {
                self.handle_key(key);
            }
        }
        self.reconcile()
    }

    fn handle_key(&mut self, key: &KeyMsg) {
        trace!("data table key {:?}", key.key);
        if self.is_dialog_open() {
            if self.keymap.confirm.matches(key) {
                self.confirm_dialog();
            } else if self.keymap.cancel.matches(key) {
                self.cancel_dialog();
            }
            return;
        }

        if self.keymap.cursor_up.matches(key) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if self.keymap.cursor_down.matches(key) {
            self.set_cursor(self.cursor + 1);
        } else if self.keymap.column_left.matches(key) {
            self.focused_column = self.focused_column.saturating_sub(1);
        } else if self.keymap.column_right.matches(key) {
            self.focused_column += 1;
            self.clamp_focused_column();
        } else if self.keymap.next_page.matches(key) {
            if self.paginator.next_page() {
                self.cursor = 0;
            }
        } else if self.keymap.prev_page.matches(key) {
            if self.paginator.prev_page() {
                self.cursor = 0;
            }
        } else if self.keymap.sort.matches(key) {
            self.sort_focused_column(false);
        } else if self.keymap.sort_multi.matches(key) {
            self.sort_focused_column(true);
        } else if self.keymap.toggle_select.matches(key) {
            if let Some(row_key) = self.cursor_row_key() {
                self.toggle_row_selected(&row_key);
            }
        } else if self.keymap.select_page.matches(key) {
            self.toggle_all_page_rows_selected();
        } else if self.keymap.toggle_expand.matches(key) {
            if let Some(row_key) = self.cursor_row_key() {
                self.toggle_expanded(&row_key);
            }
        } else if self.keymap.activate.matches(key) {
            self.activate_cursor_row();
        } else if self.keymap.toolbar_action.matches(key) {
            self.trigger_toolbar_action(0);
        }
    }

    fn sort_focused_column(&mut self, multi: bool) {
        let model = self.row_model();
        if let Some(header) = model.headers.get(self.focused_column) {
            self.toggle_sorting(&header.id, multi);
        }
    }

    fn cursor_row_key(&self) -> Option<String> {
        self.row_model()
            .rows
            .into_iter()
            .nth(self.cursor)
            .map(|row| row.key)
    }

    /// Runs the first action of the first visible column offering any.
    fn activate_cursor_row(&mut self) {
        let model = self.row_model();
        let Some(row) = model.rows.get(self.cursor) else {
            return;
        };
        let column = model
            .visible_columns
            .iter()
            .map(|&i| &self.columns[i])
            .find(|c| !c.actions.is_empty())
            .map(|c| c.id.clone());
        if let Some(column_id) = column {
            self.activate_action(row.index, &column_id, 0);
        }
    }
}

impl<R: TableRow> Component for Model<R> {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
