//! Core types shared by the editing engine and its hosts.
//!
//! - `cell`: the data-level cell being edited and the handles that address
//!   its on-screen representation
//! - `observable`: values with explicit, handle-based subscriptions

pub mod cell;
pub mod observable;

pub use cell::{CellRef, CellViewId, LogicalCell, RowId};
pub use observable::{Observable, SubscriptionId};
