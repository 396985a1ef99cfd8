//! Row-span relocation.
//!
//! A cell spanning several rows is drawn by its anchor row, so rows rendered
//! after the anchor paint over the lower part of its editor. While editing,
//! the visual cell is moved into the last rendered (non-fixed) row container
//! and counter-translated so it does not move on screen. `restore` undoes
//! both at the end of the session.

use celledit_core::{CellViewId, LogicalCell, RowId};

use crate::view::RenderLayer;

/// Record of a completed move. Its presence in a session means `cell` was
/// relocated and must be put back into `original`, whatever visual cell the
/// session is bound to by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub cell: CellViewId,
    pub original: RowId,
    pub target: RowId,
}

#[derive(Debug, Clone, Copy)]
pub struct RowSpanRelocator {
    enabled: bool,
}

impl Default for RowSpanRelocator {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl RowSpanRelocator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Index of the container a spanning cell moves into, if any.
    pub fn target_index<L: RenderLayer + ?Sized>(layer: &L) -> Option<usize> {
        layer
            .rendered_row_count()
            .checked_sub(1 + layer.fixed_row_count())
    }

    /// Move `cell` to the last available row container.
    ///
    /// Returns `None` without touching the layer when the cell does not span,
    /// is anchored on the last rendered row, or no destination exists.
    pub fn relocate<T, L: RenderLayer + ?Sized>(
        &self,
        layer: &mut L,
        logical: &LogicalCell<T>,
        cell: CellViewId,
    ) -> Option<Relocation> {
        if !self.enabled || !logical.spans_rows() {
            return None;
        }
        let rendered = layer.rendered_row_count();
        if rendered == 0 || logical.row == rendered - 1 {
            return None;
        }

        let original = layer.container_of(cell)?;
        let ty0 = layer.scene_y(cell)?;
        let Some(target) = Self::target_index(layer).and_then(|i| layer.row_container_at(i)) else {
            log::trace!("no relocation target for {} ({} rendered rows)", cell, rendered);
            return None;
        };

        if !layer.append_cell(target, cell) {
            return None;
        }

        let ty1 = layer.scene_y(cell).unwrap_or(ty0);
        layer.set_translate_y(cell, ty0 - ty1);
        layer.push_fixed_columns_to_back(original);

        log::trace!("relocated {} from {} to {} (dy={})", cell, original, target, ty0 - ty1);
        Some(Relocation { cell, original, target })
    }

    /// Undo a relocation. Safe to call for cells that were never moved.
    ///
    /// The moved cell is taken from `relocation`. `cell` is the currently bound
    /// visual cell and only has its translation reset when nothing was moved.
    pub fn restore<L: RenderLayer + ?Sized>(
        &self,
        layer: &mut L,
        row_span: usize,
        cell: Option<CellViewId>,
        relocation: Option<Relocation>,
    ) {
        let Some(moved) = relocation else {
            if let Some(cell) = cell.filter(|_| row_span > 1) {
                layer.set_translate_y(cell, 0.0);
            }
            return;
        };

        layer.set_translate_y(moved.cell, 0.0);
        if !layer.append_cell(moved.original, moved.cell) {
            log::warn!("{} gone before restore to {}", moved.cell, moved.original);
            return;
        }
        layer.push_fixed_columns_to_back(moved.original);
        log::trace!("restored {} to {}", moved.cell, moved.original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::MemoryGrid;

    fn spanning(row: usize, span: usize) -> LogicalCell<&'static str> {
        LogicalCell::new(row, 0, "v").with_row_span(span)
    }

    fn grid(rendered: usize, fixed: usize, row_height: f64) -> MemoryGrid<&'static str> {
        MemoryGrid::new(rendered, fixed, row_height)
    }

    #[test]
    fn test_target_index_accounts_for_fixed_rows() {
        let grid = grid(5, 1, 20.0);
        assert_eq!(RowSpanRelocator::target_index(&grid), Some(3));

        let tiny = self::grid(1, 1, 20.0);
        assert_eq!(RowSpanRelocator::target_index(&tiny), None);
    }

    #[test]
    fn test_relocate_moves_and_compensates() {
        let mut grid = grid(5, 1, 20.0);
        let cell = grid.add_cell(2).unwrap();
        let before = grid.scene_y(cell).unwrap();

        let moved = RowSpanRelocator::default()
            .relocate(&mut grid, &spanning(2, 3), cell)
            .unwrap();

        assert_eq!(moved.original, grid.row_container_at(2).unwrap());
        assert_eq!(moved.target, grid.row_container_at(3).unwrap());
        assert_eq!(grid.container_of(cell), Some(moved.target));
        assert_eq!(grid.scene_y(cell), Some(before));
        assert_eq!(grid.translate_y(cell), Some(-20.0));
        assert_eq!(grid.fixed_column_pushes(moved.original), 1);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut grid = grid(6, 0, 18.0);
        let cell = grid.add_cell(1).unwrap();
        let home = grid.container_of(cell).unwrap();
        let relocator = RowSpanRelocator::default();

        let moved = relocator.relocate(&mut grid, &spanning(1, 2), cell);
        assert!(moved.is_some());
        relocator.restore(&mut grid, 2, Some(cell), moved);

        assert_eq!(grid.container_of(cell), Some(home));
        assert_eq!(grid.translate_y(cell), Some(0.0));
        assert_eq!(grid.fixed_column_pushes(home), 2);
    }

    #[test]
    fn test_single_row_never_moves() {
        let mut grid = grid(5, 0, 20.0);
        let cell = grid.add_cell(0).unwrap();
        let home = grid.container_of(cell);

        let moved = RowSpanRelocator::default().relocate(&mut grid, &spanning(0, 1), cell);

        assert!(moved.is_none());
        assert_eq!(grid.container_of(cell), home);
    }

    #[test]
    fn test_anchor_on_last_rendered_row_never_moves() {
        let mut grid = grid(4, 1, 20.0);
        let cell = grid.add_cell(3).unwrap();

        let moved = RowSpanRelocator::default().relocate(&mut grid, &spanning(3, 4), cell);

        assert!(moved.is_none());
        assert_eq!(grid.container_of(cell), grid.row_container_at(3));
    }

    #[test]
    fn test_missing_target_is_silent_noop() {
        // Every rendered row is fixed: no index left to move into
        let mut grid = grid(2, 2, 20.0);
        let cell = grid.add_cell(0).unwrap();

        let moved = RowSpanRelocator::default().relocate(&mut grid, &spanning(0, 3), cell);

        assert!(moved.is_none());
        assert_eq!(grid.container_of(cell), grid.row_container_at(0));
        assert_eq!(grid.translate_y(cell), Some(0.0));
    }

    #[test]
    fn test_disabled_relocator_does_nothing() {
        let mut grid = grid(5, 0, 20.0);
        let cell = grid.add_cell(0).unwrap();

        let moved = RowSpanRelocator::new(false).relocate(&mut grid, &spanning(0, 3), cell);

        assert!(moved.is_none());
        assert_eq!(grid.container_of(cell), grid.row_container_at(0));
    }

    #[test]
    fn test_restore_without_cell_is_tolerated() {
        let mut grid = grid(5, 0, 20.0);
        let relocation = Relocation {
            cell: CellViewId::from_raw(99),
            original: grid.row_container_at(0).unwrap(),
            target: grid.row_container_at(4).unwrap(),
        };
        RowSpanRelocator::default().restore(&mut grid, 3, None, Some(relocation));
        assert_eq!(grid.fixed_column_pushes(relocation.original), 0);
    }

    #[test]
    fn test_restore_after_span_shrank() {
        let mut grid = grid(5, 1, 20.0);
        let cell = grid.add_cell(1).unwrap();
        let home = grid.container_of(cell).unwrap();
        let relocator = RowSpanRelocator::default();

        let moved = relocator.relocate(&mut grid, &spanning(1, 3), cell);
        assert!(moved.is_some());
        relocator.restore(&mut grid, 1, Some(cell), moved);

        assert_eq!(grid.container_of(cell), Some(home));
        assert_eq!(grid.translate_y(cell), Some(0.0));
    }

    #[test]
    fn test_restore_puts_back_recorded_cell() {
        let mut grid = grid(5, 1, 20.0);
        let moved_cell = grid.add_cell(2).unwrap();
        let other = grid.add_cell(4).unwrap();
        let relocator = RowSpanRelocator::default();

        let moved = relocator.relocate(&mut grid, &spanning(2, 3), moved_cell);
        assert_eq!(moved.map(|m| m.cell), Some(moved_cell));
        relocator.restore(&mut grid, 3, Some(other), moved);

        assert_eq!(grid.container_of(moved_cell), grid.row_container_at(2));
        assert_eq!(grid.translate_y(moved_cell), Some(0.0));
        assert_eq!(grid.container_of(other), grid.row_container_at(4));
    }
}
