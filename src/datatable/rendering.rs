//! View rendering for the data table.
//!
//! The view is composed of:
//! - the header row, with sort markers
//! - the body: one line per row of the current page, sub-component lines
//!   under expanded rows, or a single no-results line
//! - the page indicator
//! - the open dialog, if any

use super::column::Pin;
use super::row_model::{ModelRow, RowModel};
use super::style::{CELL_SEPARATOR, SORT_ASC, SORT_DESC};
use super::types::{SortDirection, TableRow};
use super::Model;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CURSOR_MARKER: &str = "> ";
const EXPANDED_MARKER: &str = "▾ ";
const COLLAPSED_MARKER: &str = "▸ ";
const SUB_COMPONENT_INDENT: &str = "    ";

/// One entry of the rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyRow {
    /// A data row.
    Data(ModelRow),
    /// Placeholder shown when there are no rows.
    NoResults {
        /// Fixed text.
        text: String,
        /// Columns spanned: the visible columns, plus one when rows expand.
        col_span: usize,
    },
}

/// Display width of `s`, ignoring ANSI escapes.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi_escapes::strip_str(s).as_str())
}

fn pad(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - w))
    }
}

/// Cuts `s` to `width` cells, ending in `…` when shortened. Styling is lost
/// on cut values.
fn truncate(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    let plain = strip_ansi_escapes::strip_str(s);
    let mut out = String::new();
    let mut used = 0;
    for ch in plain.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn header_text(label: &str, sort: Option<SortDirection>) -> String {
    match sort {
        Some(SortDirection::Asc) => format!("{label} {SORT_ASC}"),
        Some(SortDirection::Desc) => format!("{label} {SORT_DESC}"),
        None => label.to_string(),
    }
}

impl<R: TableRow> Model<R> {
    /// The body entries of the current page.
    pub fn body_rows(&self) -> Vec<BodyRow> {
        self.body_rows_of(self.row_model())
    }

    fn body_rows_of(&self, model: RowModel) -> Vec<BodyRow> {
        if model.rows.is_empty() {
            return vec![BodyRow::NoResults {
                text: self.no_results_text.to_string(),
                col_span: model.visible_columns.len() + usize::from(self.is_expandable()),
            }];
        }
        model.rows.into_iter().map(BodyRow::Data).collect()
    }

    fn column_widths(&self, model: &RowModel) -> Vec<usize> {
        model
            .visible_columns
            .iter()
            .enumerate()
            .map(|(j, &c)| {
                if let Some(width) = self.columns[c].width {
                    return width;
                }
                let header = &model.headers[j];
                let header_width = display_width(&header_text(&header.label, header.sort));
                model
                    .rows
                    .iter()
                    .map(|row| display_width(&row.cells[j]))
                    .fold(header_width, usize::max)
            })
            .collect()
    }

    fn prefix_width(&self) -> usize {
        CURSOR_MARKER.len()
            + if self.options.enable_row_selection { 4 } else { 0 }
            + if self.is_expandable() { 2 } else { 0 }
    }

    fn row_prefix(&self, position: usize, row: &ModelRow) -> String {
        let mut prefix = String::new();
        prefix.push_str(if position == self.cursor {
            CURSOR_MARKER
        } else {
            "  "
        });
        if self.options.enable_row_selection {
            prefix.push_str(if row.selected { "[x] " } else { "[ ] " });
        }
        if self.is_expandable() {
            prefix.push_str(if row.expanded {
                EXPANDED_MARKER
            } else {
                COLLAPSED_MARKER
            });
        }
        prefix
    }

    pub(super) fn view_header(&self, model: &RowModel, widths: &[usize]) -> String {
        let cells: Vec<String> = model
            .headers
            .iter()
            .zip(widths)
            .map(|(header, &width)| {
                let text = pad(&truncate(&header_text(&header.label, header.sort), width), width);
                match header.pinned {
                    Some(Pin::Left) | Some(Pin::Right) => {
                        self.styles.pinned_header.clone().render(&text)
                    }
                    None => self.styles.header.clone().render(&text),
                }
            })
            .collect();
        format!(
            "{}{}",
            " ".repeat(self.prefix_width()),
            cells.join(CELL_SEPARATOR)
        )
    }

    pub(super) fn view_body(&self, model: &RowModel, widths: &[usize]) -> String {
        let loading = self.state.is_loading();
        let mut lines = Vec::new();
        for (position, entry) in self.body_rows_of(model.clone()).into_iter().enumerate() {
            match entry {
                BodyRow::NoResults { text, .. } => {
                    lines.push(format!(
                        "{}{}",
                        " ".repeat(self.prefix_width()),
                        self.styles.no_results.clone().render(&text)
                    ));
                }
                BodyRow::Data(row) => {
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .zip(widths)
                        .map(|(cell, &width)| {
                            let text = pad(&truncate(cell, width), width);
                            if loading {
                                self.styles.skeleton.clone().render(&text)
                            } else {
                                self.styles.cell.clone().render(&text)
                            }
                        })
                        .collect();
                    let line = format!(
                        "{}{}",
                        self.row_prefix(position, &row),
                        cells.join(CELL_SEPARATOR)
                    );
                    let line = if position == self.cursor && self.focus {
                        self.styles.cursor_row.clone().render(&line)
                    } else if row.selected {
                        self.styles.selected_row.clone().render(&line)
                    } else {
                        line
                    };
                    lines.push(line);
                    if row.expanded && !loading {
                        lines.extend(self.sub_component_lines(row.index));
                    }
                }
            }
        }
        lines.join("\n")
    }

    fn sub_component_lines(&self, index: usize) -> Vec<String> {
        let (Some(render), Some(row)) = (&self.render_sub_component, self.data.get(index)) else {
            return Vec::new();
        };
        render(row)
            .lines()
            .map(|line| {
                format!(
                    "{SUB_COMPONENT_INDENT}{}",
                    self.styles.sub_component.clone().render(line)
                )
            })
            .collect()
    }

    /// The page indicator, e.g. `2/5`.
    pub fn pagination_view(&self) -> String {
        self.styles.pagination.clone().render(&self.paginator.view())
    }

    /// The open dialog, if any.
    pub fn view_dialog(&self) -> Option<String> {
        let dialog = self.dialog_view()?;
        let mut lines = vec![self.styles.dialog_title.clone().render(&dialog.title)];
        if !dialog.body.is_empty() {
            lines.extend(
                dialog
                    .body
                    .lines()
                    .map(|line| self.styles.dialog_body.clone().render(line)),
            );
        }
        lines.push(format!(
            "{} [{}]",
            self.styles
                .dialog_button
                .clone()
                .render(&format!("[{}]", dialog.confirmation_text)),
            dialog.cancel_text
        ));
        Some(lines.join("\n"))
    }

    /// Renders the table.
    pub fn view(&self) -> String {
        let model = self.row_model();
        let widths = self.column_widths(&model);
        let header = self.view_header(&model, &widths);
        let rule_width = display_width(&header);
        let mut sections = vec![
            header,
            "─".repeat(rule_width),
            self.view_body(&model, &widths),
        ];
        if model.page_count > 1 {
            sections.push(String::new());
            sections.push(format!("  {}", self.pagination_view()));
        }
        if let Some(dialog) = self.view_dialog() {
            sections.push(String::new());
            sections.push(dialog);
        }
        sections.join("\n")
    }
}
