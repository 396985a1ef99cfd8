use thiserror::Error;

/// A collaborator the controller must have before a session can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    LogicalCell,
    VisualCell,
    HostView,
    ValueEditor,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Binding::LogicalCell => "logical cell",
            Binding::VisualCell => "visual cell",
            Binding::HostView => "host view",
            Binding::ValueEditor => "value editor",
        };
        f.write_str(name)
    }
}

/// Reasons `start_edit` refuses to open a session. Nothing is mutated when
/// one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("an edit session is already open")]
    AlreadyEditing,

    #[error("cannot start editing: no {0} bound")]
    Missing(Binding),
}
