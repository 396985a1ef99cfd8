//! Edit session controller.
//!
//! Owns the lifecycle of one in-place edit: bind collaborators, `start_edit`,
//! then exactly one successful `end_edit` back to idle. Three passive sources
//! (selection loss, vertical scroll, disablement) cancel the session. Their
//! listeners only enqueue an `Interrupt`; the host drains the queue with
//! `drain_interrupts` once it has finished dispatching its own notifications.
//!
//! # State
//!
//! | State   | `start_edit`       | `end_edit(true)`                 | `end_edit(false)` |
//! |---------|--------------------|----------------------------------|-------------------|
//! | Idle    | -> Editing         | no-op                            | no-op             |
//! | Editing | `AlreadyEditing`   | -> Idle, or stays on rejection   | -> Idle           |

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use celledit_config::EditSettings;
use celledit_core::{CellRef, CellViewId, SubscriptionId};

use crate::error::{Binding, EditError};
use crate::relocator::{Relocation, RowSpanRelocator};
use crate::view::{HostView, ValueEditor};

/// Shared handle to a pluggable value editor.
pub type SharedEditor<T, W> = Rc<RefCell<dyn ValueEditor<T, Widget = W>>>;

/// What cancelled a session from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptCause {
    Deselected,
    Scrolled,
    Disabled,
}

/// A queued cancellation request, tagged with the session that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupt {
    pub cause: InterruptCause,
    generation: u64,
}

/// Result of `end_edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Value written to the logical cell, session closed.
    Committed,
    /// Session closed without writing.
    Cancelled,
    /// Editor produced no value. Session still open.
    Rejected,
    /// Commit requested with no visual cell bound. Session still open.
    VisualCellMissing,
    /// Nothing to end.
    NotEditing,
}

impl EditOutcome {
    /// True if the call closed the session.
    pub fn closed(self) -> bool {
        matches!(self, EditOutcome::Committed | EditOutcome::Cancelled)
    }
}

#[derive(Debug, Default)]
struct Subscriptions {
    /// Selection listener, with the cell it was registered on
    selection: Option<(CellViewId, SubscriptionId)>,
    scroll: Option<SubscriptionId>,
    disabled: Option<SubscriptionId>,
}

struct EditSession<T, H: HostView<T>> {
    generation: u64,
    logical: CellRef<T>,
    visual: Option<CellViewId>,
    host: Rc<RefCell<H>>,
    editor: SharedEditor<T, H::Widget>,
    subscriptions: Subscriptions,
    relocation: Option<Relocation>,
}

enum EditState<T, H: HostView<T>> {
    Idle,
    Editing(EditSession<T, H>),
}

pub struct EditController<T, H: HostView<T>> {
    settings: EditSettings,
    relocator: RowSpanRelocator,

    // Bindings for the next session
    logical: Option<CellRef<T>>,
    visual: Option<CellViewId>,
    host: Option<Rc<RefCell<H>>>,
    editor: Option<SharedEditor<T, H::Widget>>,

    state: EditState<T, H>,
    inbox: Rc<RefCell<VecDeque<Interrupt>>>,
    generation: u64,
    last_hover: Option<CellViewId>,
}

impl<T, H: HostView<T>> Default for EditController<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: HostView<T>> EditController<T, H> {
    pub fn new() -> Self {
        Self::with_settings(EditSettings::default())
    }

    pub fn with_settings(settings: EditSettings) -> Self {
        Self {
            settings,
            relocator: RowSpanRelocator::new(settings.relocate_spanning_cells),
            logical: None,
            visual: None,
            host: None,
            editor: None,
            state: EditState::Idle,
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            generation: 0,
            last_hover: None,
        }
    }

    pub fn settings(&self) -> EditSettings {
        self.settings
    }

    /// Takes effect from the next session.
    pub fn set_settings(&mut self, settings: EditSettings) {
        self.settings = settings;
        self.relocator = RowSpanRelocator::new(settings.relocate_spanning_cells);
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Bind the data-level cell. While editing, rebinds the open session.
    pub fn update_logical_cell(&mut self, cell: CellRef<T>) {
        match &mut self.state {
            EditState::Editing(session) => {
                log::warn!("logical cell rebound during an open session");
                session.logical = cell;
            }
            EditState::Idle => self.logical = Some(cell),
        }
    }

    /// Bind the visual cell. `None` while editing means the view was torn
    /// down underneath the session.
    pub fn update_visual_cell(&mut self, cell: Option<CellViewId>) {
        match &mut self.state {
            EditState::Editing(session) => {
                log::debug!("visual cell rebound during session: {:?}", cell);
                session.visual = cell;
            }
            EditState::Idle => self.visual = cell,
        }
    }

    /// Takes effect from the next session.
    pub fn update_host_view(&mut self, host: Rc<RefCell<H>>) {
        self.host = Some(host);
    }

    /// Takes effect from the next session.
    pub fn update_value_editor(&mut self, editor: SharedEditor<T, H::Widget>) {
        self.editor = Some(editor);
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// The logical cell being edited, or bound for the next session.
    pub fn logical_cell(&self) -> Option<CellRef<T>> {
        match &self.state {
            EditState::Editing(session) => Some(Rc::clone(&session.logical)),
            EditState::Idle => self.logical.clone(),
        }
    }

    pub fn visual_cell(&self) -> Option<CellViewId> {
        match &self.state {
            EditState::Editing(session) => session.visual,
            EditState::Idle => self.visual,
        }
    }

    /// Relocation performed by the open session, if any.
    pub fn relocation(&self) -> Option<Relocation> {
        match &self.state {
            EditState::Editing(session) => session.relocation,
            EditState::Idle => None,
        }
    }

    pub fn last_hover(&self) -> Option<CellViewId> {
        self.last_hover
    }

    pub fn set_last_hover(&mut self, cell: Option<CellViewId>) {
        self.last_hover = cell;
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Open a session on the bound cells.
    pub fn start_edit(&mut self) -> Result<(), EditError> {
        if self.is_editing() {
            return Err(EditError::AlreadyEditing);
        }
        let logical = self.logical.clone().ok_or(EditError::Missing(Binding::LogicalCell))?;
        let visual = self.visual.ok_or(EditError::Missing(Binding::VisualCell))?;
        let host = self.host.clone().ok_or(EditError::Missing(Binding::HostView))?;
        let editor = self.editor.clone().ok_or(EditError::Missing(Binding::ValueEditor))?;

        // The session owns the cell bindings from here on
        self.logical = None;
        self.visual = None;
        self.generation += 1;
        let generation = self.generation;

        let mut view = host.borrow_mut();

        let relocation = {
            let cell = logical.borrow();
            self.relocator.relocate(&mut *view, &*cell, visual)
        };

        let mut subscriptions = Subscriptions::default();
        if self.settings.cancel_on_deselect {
            match view.selected(visual) {
                Some(selected) => {
                    let id = selected.subscribe(self.listener::<bool>(InterruptCause::Deselected, generation));
                    subscriptions.selection = Some((visual, id));
                }
                None => log::warn!("{} has no selection state; deselection will not cancel", visual),
            }
        }
        if self.settings.cancel_on_scroll {
            let id = view
                .vertical_scroll()
                .subscribe(self.listener::<f64>(InterruptCause::Scrolled, generation));
            subscriptions.scroll = Some(id);
        }
        if self.settings.cancel_on_disable {
            let id = view
                .disabled()
                .subscribe(self.listener::<bool>(InterruptCause::Disabled, generation));
            subscriptions.disabled = Some(id);
        }

        let widget = {
            let mut editor = editor.borrow_mut();
            editor.start();
            editor.widget()
        };
        view.set_graphic(visual, Some(widget));
        drop(view);

        log::debug!(
            "edit session {} started on {} (relocated: {})",
            generation,
            visual,
            relocation.is_some()
        );

        self.state = EditState::Editing(EditSession {
            generation,
            logical,
            visual: Some(visual),
            host,
            editor,
            subscriptions,
            relocation,
        });
        Ok(())
    }

    /// Single exit point for a session. `commit` asks the editor for a value;
    /// without one the session stays open so the user can fix the input.
    /// Calling this on an idle controller is a no-op.
    pub fn end_edit(&mut self, commit: bool) -> EditOutcome {
        let EditState::Editing(session) = &self.state else {
            log::trace!("end_edit({}) ignored: no open session", commit);
            return EditOutcome::NotEditing;
        };

        let outcome = if commit {
            let Some(value) = session.editor.borrow_mut().validate() else {
                log::debug!("edit session {}: input rejected, still editing", session.generation);
                return EditOutcome::Rejected;
            };
            let Some(visual) = session.visual else {
                log::debug!("edit session {}: no visual cell to commit into", session.generation);
                return EditOutcome::VisualCellMissing;
            };

            session.logical.borrow_mut().set_value(value);
            session
                .host
                .borrow_mut()
                .commit_cell(visual, &session.logical.borrow());
            EditOutcome::Committed
        } else {
            if let Some(visual) = session.visual {
                session.host.borrow_mut().cancel_cell(visual);
            }
            EditOutcome::Cancelled
        };

        if let Some(session) = self.end() {
            session.editor.borrow_mut().end();
            log::debug!("edit session {} ended: {:?}", session.generation, outcome);
        }
        outcome
    }

    /// Run queued interrupts. Interrupts armed by an earlier session are
    /// dropped. Returns the number that ended a session.
    pub fn drain_interrupts(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(interrupt) = next else {
                break;
            };
            let live = matches!(
                &self.state,
                EditState::Editing(session) if session.generation == interrupt.generation
            );
            if !live {
                log::trace!("stale {:?} from session {} dropped", interrupt.cause, interrupt.generation);
                continue;
            }
            log::trace!("{:?} cancels edit session {}", interrupt.cause, interrupt.generation);
            if self.end_edit(false).closed() {
                handled += 1;
            }
        }
        handled
    }

    pub fn pending_interrupts(&self) -> usize {
        self.inbox.borrow().len()
    }

    /// Teardown: undo relocation, unsubscribe everything, release bindings.
    /// Hands the finished session back so the caller can close the editor.
    fn end(&mut self) -> Option<EditSession<T, H>> {
        let EditState::Editing(mut session) = std::mem::replace(&mut self.state, EditState::Idle) else {
            return None;
        };

        let mut view = session.host.borrow_mut();
        let row_span = session.logical.borrow().row_span();
        self.relocator
            .restore(&mut *view, row_span, session.visual, session.relocation.take());

        if let Some((cell, id)) = session.subscriptions.selection.take() {
            if let Some(selected) = view.selected(cell) {
                selected.unsubscribe(id);
            }
        }
        if let Some(id) = session.subscriptions.scroll.take() {
            view.vertical_scroll().unsubscribe(id);
        }
        if let Some(id) = session.subscriptions.disabled.take() {
            view.disabled().unsubscribe(id);
        }
        drop(view);

        Some(session)
    }

    fn listener<V>(&self, cause: InterruptCause, generation: u64) -> impl FnMut(&V) + 'static {
        let inbox: Weak<RefCell<VecDeque<Interrupt>>> = Rc::downgrade(&self.inbox);
        move |_: &V| {
            if let Some(inbox) = inbox.upgrade() {
                inbox.borrow_mut().push_back(Interrupt { cause, generation });
            }
        }
    }
}
