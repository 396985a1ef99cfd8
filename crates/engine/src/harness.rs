//! Headless grid and editor for driving edit sessions without a GUI.
//!
//! This module provides:
//! - `MemoryGrid`: rendered rows, visual cells, scroll and disabled state
//! - `ScriptedEditor`: a value editor whose next validation result is set
//!   by the caller
//!
//! Vertical geometry is deliberately simple: a cell's scene position is
//! `container_index * row_height - scroll + translate_y`.

use std::collections::HashMap;

use celledit_core::{CellViewId, LogicalCell, Observable, RowId};

use crate::view::{HostView, RenderLayer, ValueEditor};

#[derive(Debug)]
struct MemoryRow {
    id: RowId,
    cells: Vec<CellViewId>,
    fixed_column_pushes: usize,
}

#[derive(Debug)]
struct MemoryCell<T> {
    selected: Observable<bool>,
    graphic: Option<String>,
    translate_y: f64,
    commits: Vec<T>,
    cancels: usize,
}

/// In-memory rendering layer and host component.
#[derive(Debug)]
pub struct MemoryGrid<T> {
    row_height: f64,
    fixed_rows: usize,
    rows: Vec<MemoryRow>,
    cells: HashMap<CellViewId, MemoryCell<T>>,
    vertical_scroll: Observable<f64>,
    disabled: Observable<bool>,
    next_cell: u64,
}

impl<T> MemoryGrid<T> {
    /// A grid with `rendered_rows` row containers, the first `fixed_rows`
    /// of them frozen.
    pub fn new(rendered_rows: usize, fixed_rows: usize, row_height: f64) -> Self {
        let rows = (0..rendered_rows)
            .map(|i| MemoryRow {
                id: RowId::from_raw(i as u64),
                cells: Vec::new(),
                fixed_column_pushes: 0,
            })
            .collect();
        Self {
            row_height,
            fixed_rows,
            rows,
            cells: HashMap::new(),
            vertical_scroll: Observable::new(0.0),
            disabled: Observable::new(false),
            next_cell: 1,
        }
    }

    /// Create a visual cell in the row container at `row_index`.
    pub fn add_cell(&mut self, row_index: usize) -> Option<CellViewId> {
        let row = self.rows.get_mut(row_index)?;
        let id = CellViewId::from_raw(self.next_cell);
        self.next_cell += 1;
        row.cells.push(id);
        self.cells.insert(
            id,
            MemoryCell {
                selected: Observable::new(false),
                graphic: None,
                translate_y: 0.0,
                commits: Vec::new(),
                cancels: 0,
            },
        );
        Some(id)
    }

    /// Drop a visual cell, as a renderer does when recycling views.
    pub fn remove_cell(&mut self, cell: CellViewId) -> bool {
        for row in &mut self.rows {
            row.cells.retain(|c| *c != cell);
        }
        self.cells.remove(&cell).is_some()
    }

    /// Rendered position of a row container.
    pub fn row_index(&self, row: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == row)
    }

    pub fn row_cells(&self, row_index: usize) -> &[CellViewId] {
        self.rows
            .get(row_index)
            .map(|r| r.cells.as_slice())
            .unwrap_or(&[])
    }

    pub fn fixed_column_pushes(&self, row: RowId) -> usize {
        self.rows
            .iter()
            .find(|r| r.id == row)
            .map_or(0, |r| r.fixed_column_pushes)
    }

    pub fn graphic(&self, cell: CellViewId) -> Option<&String> {
        self.cells.get(&cell)?.graphic.as_ref()
    }

    /// Values committed through this visual cell, oldest first.
    pub fn commits(&self, cell: CellViewId) -> &[T] {
        self.cells
            .get(&cell)
            .map(|c| c.commits.as_slice())
            .unwrap_or(&[])
    }

    pub fn cancel_count(&self, cell: CellViewId) -> usize {
        self.cells.get(&cell).map_or(0, |c| c.cancels)
    }

    // Input simulation. Each setter fires the matching observable.

    pub fn set_selected(&mut self, cell: CellViewId, selected: bool) -> bool {
        match self.cells.get_mut(&cell) {
            Some(c) => c.selected.set(selected),
            None => false,
        }
    }

    pub fn scroll_to(&mut self, offset: f64) -> bool {
        self.vertical_scroll.set(offset)
    }

    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        self.disabled.set(disabled)
    }

    pub fn scroll_offset(&self) -> f64 {
        *self.vertical_scroll.get()
    }
}

impl<T> RenderLayer for MemoryGrid<T> {
    fn rendered_row_count(&self) -> usize {
        self.rows.len()
    }

    fn fixed_row_count(&self) -> usize {
        self.fixed_rows
    }

    fn row_container_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|r| r.id)
    }

    fn container_of(&self, cell: CellViewId) -> Option<RowId> {
        self.rows.iter().find(|r| r.cells.contains(&cell)).map(|r| r.id)
    }

    fn append_cell(&mut self, row: RowId, cell: CellViewId) -> bool {
        if !self.cells.contains_key(&cell) || self.row_index(row).is_none() {
            return false;
        }
        for r in &mut self.rows {
            r.cells.retain(|c| *c != cell);
        }
        if let Some(target) = self.rows.iter_mut().find(|r| r.id == row) {
            target.cells.push(cell);
        }
        true
    }

    fn push_fixed_columns_to_back(&mut self, row: RowId) {
        if let Some(r) = self.rows.iter_mut().find(|r| r.id == row) {
            r.fixed_column_pushes += 1;
        }
    }

    fn scene_y(&self, cell: CellViewId) -> Option<f64> {
        let translate = self.cells.get(&cell)?.translate_y;
        let index = self.rows.iter().position(|r| r.cells.contains(&cell))?;
        Some(index as f64 * self.row_height - self.scroll_offset() + translate)
    }

    fn translate_y(&self, cell: CellViewId) -> Option<f64> {
        self.cells.get(&cell).map(|c| c.translate_y)
    }

    fn set_translate_y(&mut self, cell: CellViewId, dy: f64) {
        if let Some(c) = self.cells.get_mut(&cell) {
            c.translate_y = dy;
        }
    }
}

impl<T: Clone> HostView<T> for MemoryGrid<T> {
    type Widget = String;

    fn vertical_scroll(&mut self) -> &mut Observable<f64> {
        &mut self.vertical_scroll
    }

    fn disabled(&mut self) -> &mut Observable<bool> {
        &mut self.disabled
    }

    fn selected(&mut self, cell: CellViewId) -> Option<&mut Observable<bool>> {
        self.cells.get_mut(&cell).map(|c| &mut c.selected)
    }

    fn set_graphic(&mut self, cell: CellViewId, widget: Option<String>) {
        if let Some(c) = self.cells.get_mut(&cell) {
            c.graphic = widget;
        }
    }

    fn commit_cell(&mut self, cell: CellViewId, committed: &LogicalCell<T>) {
        if let Some(c) = self.cells.get_mut(&cell) {
            c.commits.push(committed.value().clone());
            c.graphic = None;
        }
    }

    fn cancel_cell(&mut self, cell: CellViewId) {
        if let Some(c) = self.cells.get_mut(&cell) {
            c.cancels += 1;
            c.graphic = None;
        }
    }
}

/// Value editor with a caller-controlled validation result.
#[derive(Debug, Clone)]
pub struct ScriptedEditor<T> {
    name: String,
    input: Option<T>,
    starts: usize,
    validations: usize,
    ends: usize,
}

impl<T> ScriptedEditor<T> {
    /// `name` doubles as the widget shown in the edited cell.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: None,
            starts: 0,
            validations: 0,
            ends: 0,
        }
    }

    /// Value the next `validate` returns. `None` fails validation.
    pub fn set_input(&mut self, input: Option<T>) {
        self.input = input;
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn validations(&self) -> usize {
        self.validations
    }

    pub fn ends(&self) -> usize {
        self.ends
    }
}

impl<T: Clone> ValueEditor<T> for ScriptedEditor<T> {
    type Widget = String;

    fn widget(&self) -> String {
        self.name.clone()
    }

    fn start(&mut self) {
        self.starts += 1;
        self.input = None;
    }

    fn validate(&mut self) -> Option<T> {
        self.validations += 1;
        self.input.clone()
    }

    fn end(&mut self) {
        self.ends += 1;
    }
}
