//! Pagination state for the data table.
//!
//! The paginator tracks the current page index, the page size and the total
//! number of pages derived from a row count. It does not own any rows; the
//! row model pages filtered rows itself in client mode and trusts an external
//! row count in manual mode.

use serde::{Deserialize, Serialize};

/// How the page indicator is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Type {
    /// Page numbers, e.g. `"1/5"`.
    #[default]
    Arabic,
    /// One dot per page, e.g. `"● ○ ○"`.
    Dots,
}

/// Pagination state.
///
/// ```rust
/// use bubbletea_datatable::paginator::Model;
///
/// let mut pages = Model::new().with_page_size(10).with_row_count(95);
/// assert_eq!(pages.total_pages, 10);
/// pages.next_page();
/// assert_eq!(pages.page_index, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    /// Indicator style.
    pub paginator_type: Type,
    /// Zero-based index of the current page.
    pub page_index: usize,
    /// Rows per page, at least 1.
    pub page_size: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// Symbol for the current page in dots mode.
    pub active_dot: String,
    /// Symbol for other pages in dots mode.
    pub inactive_dot: String,
    /// Format for arabic mode; the two `%d` are page and page count.
    pub arabic_format: String,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            paginator_type: Type::default(),
            page_index: 0,
            page_size: 10,
            total_pages: 1,
            active_dot: "•".to_string(),
            inactive_dot: "○".to_string(),
            arabic_format: "%d/%d".to_string(),
        }
    }
}

impl Model {
    /// Creates a paginator with a page size of 10 and a single page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size (builder pattern). Values below 1 are clamped to 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    /// Sets the row count (builder pattern).
    pub fn with_row_count(mut self, rows: usize) -> Self {
        self.set_row_count(rows);
        self
    }

    /// Sets the page size. Values below 1 are clamped to 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Recomputes the page count from a row count and clamps the page index.
    pub fn set_row_count(&mut self, rows: usize) {
        self.total_pages = if rows == 0 {
            1
        } else {
            rows.div_ceil(self.page_size)
        };
        if self.page_index >= self.total_pages {
            self.page_index = self.total_pages - 1;
        }
    }

    /// Moves to `index`, clamped to the last page. Returns whether it moved.
    pub fn set_page_index(&mut self, index: usize) -> bool {
        let clamped = index.min(self.total_pages.saturating_sub(1));
        let changed = clamped != self.page_index;
        self.page_index = clamped;
        changed
    }

    /// Goes back one page. Returns whether it moved.
    pub fn prev_page(&mut self) -> bool {
        if self.on_first_page() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Goes forward one page. Returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        if self.on_last_page() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Whether the current page is the first.
    pub fn on_first_page(&self) -> bool {
        self.page_index == 0
    }

    /// Whether the current page is the last.
    pub fn on_last_page(&self) -> bool {
        self.page_index + 1 >= self.total_pages
    }

    /// Renders the page indicator.
    pub fn view(&self) -> String {
        match self.paginator_type {
            Type::Arabic => self
                .arabic_format
                .replacen("%d", &(self.page_index + 1).to_string(), 1)
                .replacen("%d", &self.total_pages.to_string(), 1),
            Type::Dots => (0..self.total_pages)
                .map(|i| {
                    if i == self.page_index {
                        self.active_dot.as_str()
                    } else {
                        self.inactive_dot.as_str()
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}
