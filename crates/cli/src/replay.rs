//! Scenario replay: drive an `EditController` over a `MemoryGrid`.
//!
//! Each step is applied, queued interrupts are drained, and a snapshot of the
//! grid and session is recorded.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use celledit_config::EditSettings;
use celledit_core::{CellRef, CellViewId, LogicalCell};
use celledit_engine::harness::{MemoryGrid, ScriptedEditor};
use celledit_engine::{EditController, EditOutcome, RenderLayer};
use serde::Serialize;

use crate::scenario::{Expect, Scenario, Step};

/// State after one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub action: &'static str,
    pub outcome: String,
    pub editing: bool,
    /// Rendered index of the container holding the visual cell
    pub container: Option<usize>,
    pub translate_y: Option<f64>,
    pub scene_y: Option<f64>,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub steps: Vec<StepRecord>,
    /// Differences from the scenario's `[expect]` table
    pub mismatches: Vec<String>,
}

impl Trace {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Aligned, human-readable table.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>3}  {:<9} {:<20} {:<7} {:>9} {:>11} {:>9}  value",
            "#", "action", "outcome", "editing", "container", "translate_y", "scene_y"
        );
        for step in &self.steps {
            let _ = writeln!(
                out,
                "{:>3}  {:<9} {:<20} {:<7} {:>9} {:>11} {:>9}  {}",
                step.index,
                step.action,
                step.outcome,
                step.editing,
                opt(step.container),
                opt(step.translate_y),
                opt(step.scene_y),
                step.value
            );
        }
        for mismatch in &self.mismatches {
            let _ = writeln!(out, "expect: {}", mismatch);
        }
        out
    }
}

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn outcome_label(outcome: EditOutcome) -> &'static str {
    match outcome {
        EditOutcome::Committed => "committed",
        EditOutcome::Cancelled => "cancelled",
        EditOutcome::Rejected => "rejected",
        EditOutcome::VisualCellMissing => "visual-cell-missing",
        EditOutcome::NotEditing => "not-editing",
    }
}

struct Replayer {
    grid: Rc<RefCell<MemoryGrid<String>>>,
    editor: Rc<RefCell<ScriptedEditor<String>>>,
    model: CellRef<String>,
    cell: CellViewId,
    attached: bool,
    controller: EditController<String, MemoryGrid<String>>,
}

impl Replayer {
    fn new(scenario: &Scenario, settings: EditSettings) -> Option<Self> {
        let layout = &scenario.grid;
        let grid = Rc::new(RefCell::new(MemoryGrid::new(
            layout.rendered_rows,
            layout.fixed_rows,
            layout.row_height,
        )));
        let cell = grid.borrow_mut().add_cell(scenario.cell.row)?;
        // The cell being edited is the selected one
        grid.borrow_mut().set_selected(cell, true);

        let editor = Rc::new(RefCell::new(ScriptedEditor::new(scenario.cell.editor.clone())));
        let model = LogicalCell::new(scenario.cell.row, scenario.cell.column, scenario.cell.value.clone())
            .with_row_span(scenario.cell.row_span)
            .into_ref();

        let mut controller = EditController::with_settings(settings);
        controller.update_host_view(Rc::clone(&grid));
        controller.update_value_editor(editor.clone());

        Some(Self { grid, editor, model, cell, attached: true, controller })
    }

    /// Apply one step and return its outcome label.
    fn apply(&mut self, step: &Step) -> String {
        match step {
            Step::Start => {
                if !self.controller.is_editing() {
                    self.controller.update_logical_cell(Rc::clone(&self.model));
                    self.controller
                        .update_visual_cell(self.attached.then_some(self.cell));
                }
                match self.controller.start_edit() {
                    Ok(()) => "started".to_string(),
                    Err(e) => e.to_string(),
                }
            }
            Step::Commit { input } => {
                self.editor.borrow_mut().set_input(input.clone());
                outcome_label(self.controller.end_edit(true)).to_string()
            }
            Step::Cancel => outcome_label(self.controller.end_edit(false)).to_string(),
            Step::Scroll { to } => {
                let changed = self.grid.borrow_mut().scroll_to(*to);
                self.settle(changed)
            }
            Step::Select | Step::Deselect => {
                let changed = self
                    .grid
                    .borrow_mut()
                    .set_selected(self.cell, matches!(step, Step::Select));
                self.settle(changed)
            }
            Step::Disable | Step::Enable => {
                let changed = self
                    .grid
                    .borrow_mut()
                    .set_disabled(matches!(step, Step::Disable));
                self.settle(changed)
            }
            Step::Hover => {
                self.controller.set_last_hover(Some(self.cell));
                "hovered".to_string()
            }
            Step::Detach => {
                self.attached = false;
                self.grid.borrow_mut().remove_cell(self.cell);
                if self.controller.is_editing() {
                    self.controller.update_visual_cell(None);
                }
                "detached".to_string()
            }
        }
    }

    /// Run interrupts fired by the last UI change.
    fn settle(&mut self, changed: bool) -> String {
        if !changed {
            return "unchanged".to_string();
        }
        match self.controller.drain_interrupts() {
            0 => "ignored".to_string(),
            _ => "interrupted".to_string(),
        }
    }

    fn snapshot(&self, index: usize, action: &'static str, outcome: String) -> StepRecord {
        let grid = self.grid.borrow();
        StepRecord {
            index,
            action,
            outcome,
            editing: self.controller.is_editing(),
            container: grid.container_of(self.cell).and_then(|row| grid.row_index(row)),
            translate_y: grid.translate_y(self.cell),
            scene_y: grid.scene_y(self.cell),
            value: self.model.borrow().value().clone(),
        }
    }
}

fn check(expect: &Expect, last: &StepRecord) -> Vec<String> {
    let mut mismatches = Vec::new();
    if let Some(editing) = expect.editing {
        if editing != last.editing {
            mismatches.push(format!("editing: expected {}, got {}", editing, last.editing));
        }
    }
    if let Some(value) = &expect.value {
        if *value != last.value {
            mismatches.push(format!("value: expected {:?}, got {:?}", value, last.value));
        }
    }
    if let Some(container) = expect.container {
        if Some(container) != last.container {
            mismatches.push(format!("container: expected {}, got {}", container, opt(last.container)));
        }
    }
    if let Some(translate_y) = expect.translate_y {
        if Some(translate_y) != last.translate_y {
            mismatches.push(format!(
                "translate_y: expected {}, got {}",
                translate_y,
                opt(last.translate_y)
            ));
        }
    }
    mismatches
}

/// Replay every step of `scenario`. Record 0 is the initial state.
pub fn replay(scenario: &Scenario, settings: EditSettings) -> Trace {
    let Some(mut replayer) = Replayer::new(scenario, settings) else {
        // Unreachable for validated scenarios
        return Trace {
            steps: Vec::new(),
            mismatches: vec![format!("cell.row {} is not rendered", scenario.cell.row)],
        };
    };

    let mut steps = vec![replayer.snapshot(0, "init", "-".to_string())];
    for (i, step) in scenario.steps.iter().enumerate() {
        let outcome = replayer.apply(step);
        log::debug!("step {} {}: {}", i + 1, step.name(), outcome);
        steps.push(replayer.snapshot(i + 1, step.name(), outcome));
    }

    let mismatches = match (&scenario.expect, steps.last()) {
        (Some(expect), Some(last)) => check(expect, last),
        _ => Vec::new(),
    };
    Trace { steps, mismatches }
}
