//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (unclassified failures)
/// - 2: Misuse of shell command (reserved by shells, used by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    pub const GENERAL: i32 = 1;

    /// Member, item, transaction, store, or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// The lending policy refused the operation (no copies, limit reached,
    /// already returned, item on the shelf, not the borrower).
    pub const REFUSED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// The store could not be read or written; retrying is safe.
    pub const STORE_UNAVAILABLE: i32 = 7;
}

/// Rows shown by `report top` when `--limit` is not given.
pub const DEFAULT_TOP_LIMIT: usize = 10;
