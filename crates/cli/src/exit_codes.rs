//! CLI Exit Code Registry
//!
//! Single source of truth for `celledit` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | General error                             |
//! | 2    | Usage error (bad args)                    |
//! | 3    | Scenario or settings file unreadable      |
//! | 4    | Scenario or settings file malformed       |
//! | 5    | Scenario describes an impossible grid     |
//! | 6    | Replay finished but `[expect]` mismatched |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// File could not be read.
pub const EXIT_IO: u8 = 3;

/// File could not be parsed.
pub const EXIT_PARSE: u8 = 4;

/// Scenario parsed but is inconsistent (e.g. anchor row not rendered).
pub const EXIT_INVALID_SCENARIO: u8 = 5;

/// Final state differs from the scenario's expectations.
pub const EXIT_EXPECT_FAILED: u8 = 6;
