//! Collaborator contracts consumed by the edit session controller.
//!
//! The engine never owns views. Visual cells and row containers belong to the
//! host's rendering layer and are addressed through `CellViewId` / `RowId`.
//! Any handle the host no longer knows about is treated as absent.

use celledit_core::{CellViewId, LogicalCell, Observable, RowId};

/// Rows currently materialized by the renderer, and placement of visual
/// cells inside them.
pub trait RenderLayer {
    /// Number of row containers currently rendered (fixed rows included).
    fn rendered_row_count(&self) -> usize;

    /// Number of frozen rows pinned at the top.
    fn fixed_row_count(&self) -> usize;

    /// Row container at a rendered position.
    fn row_container_at(&self, index: usize) -> Option<RowId>;

    /// Container currently holding `cell`.
    fn container_of(&self, cell: CellViewId) -> Option<RowId>;

    /// Move `cell` to the end of `row`, detaching it from its previous
    /// container. Returns false if either handle is unknown.
    fn append_cell(&mut self, row: RowId, cell: CellViewId) -> bool;

    /// Restore stacking order so frozen columns render behind the rest.
    fn push_fixed_columns_to_back(&mut self, row: RowId);

    /// Absolute vertical position of `cell`, translation included.
    fn scene_y(&self, cell: CellViewId) -> Option<f64>;

    fn translate_y(&self, cell: CellViewId) -> Option<f64>;

    fn set_translate_y(&mut self, cell: CellViewId, dy: f64);
}

/// The grid component hosting the edit session.
pub trait HostView<T>: RenderLayer {
    /// Widget type produced by value editors and shown inside visual cells.
    type Widget;

    fn vertical_scroll(&mut self) -> &mut Observable<f64>;

    fn disabled(&mut self) -> &mut Observable<bool>;

    /// Selection state of a visual cell. `None` if the cell is gone.
    fn selected(&mut self, cell: CellViewId) -> Option<&mut Observable<bool>>;

    /// Replace the content displayed by a visual cell. `None` restores the
    /// cell's normal rendering.
    fn set_graphic(&mut self, cell: CellViewId, widget: Option<Self::Widget>);

    /// Push a committed value to the visual cell and through it to the model.
    fn commit_cell(&mut self, cell: CellViewId, committed: &LogicalCell<T>);

    fn cancel_cell(&mut self, cell: CellViewId);
}

/// A pluggable editor for one data type (text box, combo box, date picker...).
pub trait ValueEditor<T> {
    type Widget;

    /// Widget to install in the edited cell.
    fn widget(&self) -> Self::Widget;

    /// Prepare for a new session.
    fn start(&mut self);

    /// Validate the current input. `None` keeps the session open.
    fn validate(&mut self) -> Option<T>;

    /// The session is over.
    fn end(&mut self);
}
