//! In-place cell editing for grid views.
//!
//! `EditController` runs one edit session at a time against a host grid;
//! `RowSpanRelocator` keeps the editor of a row-spanning cell on top of the
//! rows rendered after it.

pub mod controller;
pub mod error;
pub mod harness;
pub mod relocator;
pub mod view;

pub use controller::{EditController, EditOutcome, Interrupt, InterruptCause, SharedEditor};
pub use error::{Binding, EditError};
pub use relocator::{Relocation, RowSpanRelocator};
pub use view::{HostView, RenderLayer, ValueEditor};
