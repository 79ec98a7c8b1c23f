//! Data viewer feature - paged grids and images of datasets.
//!
//! The viewers themselves live in the navigation session; this module holds
//! the overlay state (which viewer is in front, scroll offsets, the page
//! number being typed) and the projection and image logic.

pub mod image;
pub mod slicer;
pub mod ui;

use crate::navigation::ViewerId;

/// Scroll position for table view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Current row offset.
    pub row: usize,
    /// Current column offset.
    pub col: usize,
}

/// State for the data viewer overlay.
#[derive(Debug, Clone, Default)]
pub struct DataViewerState {
    /// Viewer shown in front.
    active: Option<ViewerId>,
    /// Scroll offset for table view.
    pub scroll: ScrollPosition,
    /// Page number being typed, if the page field is focused.
    page_input: Option<String>,
    /// Is the data viewer visible.
    pub visible: bool,
    /// Status message to display inside viewer.
    pub status_message: Option<String>,
}

impl DataViewerState {
    /// Create a new data viewer state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring viewer `id` to the front.
    pub fn show(&mut self, id: ViewerId) {
        if self.active != Some(id) {
            self.scroll = ScrollPosition::default();
        }
        self.active = Some(id);
        self.page_input = None;
        self.status_message = None;
        self.visible = true;
    }

    /// Viewer in front, if any.
    pub fn active(&self) -> Option<ViewerId> {
        self.active
    }

    /// Hide the overlay, returning the viewer that was in front.
    pub fn close(&mut self) -> Option<ViewerId> {
        self.visible = false;
        self.page_input = None;
        self.status_message = None;
        self.scroll = ScrollPosition::default();
        self.active.take()
    }

    /// Set status message (displayed inside overlay).
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Scroll up.
    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll.row = self.scroll.row.saturating_sub(amount);
    }

    /// Scroll down, stopping at the last of `rows`.
    pub fn scroll_down(&mut self, amount: usize, rows: usize) {
        let max_row = rows.saturating_sub(1);
        self.scroll.row = (self.scroll.row + amount).min(max_row);
    }

    /// Scroll left.
    pub fn scroll_left(&mut self, amount: usize) {
        self.scroll.col = self.scroll.col.saturating_sub(amount);
    }

    /// Scroll right, stopping at the last of `cols`.
    pub fn scroll_right(&mut self, amount: usize, cols: usize) {
        let max_col = cols.saturating_sub(1);
        self.scroll.col = (self.scroll.col + amount).min(max_col);
    }

    /// Keep the scroll offsets inside a `rows x cols` grid.
    pub fn clamp_scroll(&mut self, rows: usize, cols: usize) {
        self.scroll.row = self.scroll.row.min(rows.saturating_sub(1));
        self.scroll.col = self.scroll.col.min(cols.saturating_sub(1));
    }

    /// Focus the page field.
    pub fn start_page_input(&mut self) {
        self.page_input = Some(String::new());
    }

    /// Page field contents while focused.
    pub fn page_input(&self) -> Option<&str> {
        self.page_input.as_deref()
    }

    /// Whether the page field is focused.
    pub fn is_editing_page(&self) -> bool {
        self.page_input.is_some()
    }

    /// Type into the page field. Only digits and a leading `-` are kept.
    pub fn page_input_push(&mut self, c: char) {
        if let Some(buffer) = self.page_input.as_mut() {
            if c.is_ascii_digit() || (c == '-' && buffer.is_empty()) {
                buffer.push(c);
            }
        }
    }

    /// Delete the last typed character.
    pub fn page_input_backspace(&mut self) {
        if let Some(buffer) = self.page_input.as_mut() {
            buffer.pop();
        }
    }

    /// Leave the page field without jumping.
    pub fn cancel_page_input(&mut self) {
        self.page_input = None;
    }

    /// Leave the page field, returning the typed page if it parses.
    pub fn submit_page_input(&mut self) -> Option<i64> {
        self.page_input.take()?.parse().ok()
    }
}
