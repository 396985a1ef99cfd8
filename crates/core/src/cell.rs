//! Logical cells and view handles.
//!
//! A `LogicalCell` is owned by the model layer. Everything on the rendering
//! side (visual cells, row containers) is addressed through copyable handles
//! so the editing engine never extends the lifetime of a view object.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Shared handle to a logical cell.
///
/// The model keeps its own clone; an edit session holds another clone only
/// while the session is open.
pub type CellRef<T> = Rc<RefCell<LogicalCell<T>>>;

/// A data-level cell: value, anchor position and vertical span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalCell<T> {
    value: T,
    /// Anchor row (0-based)
    pub row: usize,
    /// Column (0-based)
    pub column: usize,
    /// Number of rows the cell occupies, always >= 1
    row_span: usize,
}

impl<T> LogicalCell<T> {
    pub fn new(row: usize, column: usize, value: T) -> Self {
        Self { value, row, column, row_span: 1 }
    }

    /// Builder-style span setter. Spans below one are clamped to one.
    pub fn with_row_span(mut self, row_span: usize) -> Self {
        self.set_row_span(row_span);
        self
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn set_row_span(&mut self, row_span: usize) {
        self.row_span = row_span.max(1);
    }

    /// True if the cell covers more than its anchor row.
    pub fn spans_rows(&self) -> bool {
        self.row_span > 1
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> CellRef<T> {
        Rc::new(RefCell::new(self))
    }
}

/// Handle to a visual cell owned by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellViewId(u64);

impl CellViewId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for CellViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Handle to a rendered row container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(u64);

impl RowId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_span_clamped_to_one() {
        let cell = LogicalCell::new(3, 1, "x").with_row_span(0);
        assert_eq!(cell.row_span(), 1);
        assert!(!cell.spans_rows());
    }

    #[test]
    fn test_spanning_cell() {
        let cell = LogicalCell::new(2, 0, 7).with_row_span(3);
        assert!(cell.spans_rows());
        assert_eq!(cell.row_span(), 3);
    }

    #[test]
    fn test_shared_handle_sees_writes() {
        let model = LogicalCell::new(0, 0, String::from("old")).into_ref();
        let session = Rc::clone(&model);
        session.borrow_mut().set_value("new".to_string());
        drop(session);
        assert_eq!(model.borrow().value(), "new");
        assert_eq!(Rc::strong_count(&model), 1);
    }

    #[test]
    fn test_logical_cell_serde() {
        let cell = LogicalCell::new(1, 2, 42.5).with_row_span(2);
        let json = serde_json::to_string(&cell).unwrap();
        let back: LogicalCell<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(CellViewId::from_raw(7).to_string(), "view#7");
        assert_eq!(RowId::from_raw(3).to_string(), "row#3");
    }
}
