//! Headless replay of edit-session scenarios.

pub mod exit_codes;
pub mod replay;
pub mod scenario;
