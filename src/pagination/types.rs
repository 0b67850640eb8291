//! Pagination types
//!
//! Defines the page and state abstractions used by the page stream.

/// One page of results with an optional continuation cursor
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Cursor for the following page, `None` on the last page
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next: Option<String>) -> Self {
        Self { items, next }
    }

    /// Create a final page
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    /// Check if another page follows
    ///
    /// An empty cursor ends the sequence, as in [`PaginationState::advance`].
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|cursor| !cursor.is_empty())
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor to send with the next request
    pub cursor: Option<String>,
    /// Pages fetched so far
    pub pages: u32,
    /// Total items fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Record a fetched page and decide whether to continue
    ///
    /// An empty cursor is treated the same as a missing one.
    pub fn advance(&mut self, items: usize, next: Option<String>) {
        self.pages += 1;
        self.total_fetched += items as u64;
        match next.filter(|cursor| !cursor.is_empty()) {
            Some(cursor) => self.cursor = Some(cursor),
            None => {
                self.cursor = None;
                self.mark_done();
            }
        }
    }
}
