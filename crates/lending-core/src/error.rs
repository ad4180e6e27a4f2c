//! Error types for Lending core operations.
//!
//! Every refusal the engine can produce is a typed, caller-recoverable
//! variant. Backend failures collapse into `StoreUnavailable`; the CLI layer
//! maps these to user-friendly messages and exit codes.

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::types::TxnId;

/// Result type alias for Lending operations.
pub type Result<T> = std::result::Result<T, LendingError>;

/// Core error type for Lending operations.
#[derive(Debug, Clone, Error)]
pub enum LendingError {
    /// Member does not exist or has no lending category
    #[error("Unknown member: {0}")]
    UnknownMember(String),

    /// Item does not exist in the catalog
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Transaction does not exist in the ledger
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(TxnId),

    /// Every copy of the item is out on loan
    #[error("No copies of {0} are available")]
    NoCopiesAvailable(String),

    /// Member already holds as many open loans as their category allows
    #[error("Borrow limit reached for {member_id} (limit {limit})")]
    BorrowLimitExceeded { member_id: String, limit: usize },

    /// Transaction was closed by an earlier return
    #[error("Transaction {0} has already been returned")]
    AlreadyReturned(TxnId),

    /// Reservations are only accepted for exhausted stock
    #[error("Item {0} has copies available; issue it instead")]
    ItemCurrentlyAvailable(String),

    /// Store file does not exist
    #[error("Store not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    /// Backend failure (I/O, SQLite, poisoned lock, malformed row)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored state violates a circulation invariant
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Invalid registration or command input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LendingError {
    /// Whether the error came from the backend rather than a policy refusal.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            LendingError::StoreUnavailable(_)
                | LendingError::StoreNotFound(_)
                | LendingError::Integrity(_)
        )
    }
}

impl From<rusqlite::Error> for LendingError {
    fn from(err: rusqlite::Error) -> Self {
        LendingError::StoreUnavailable(format!("SQLite error: {}", err))
    }
}

impl From<std::io::Error> for LendingError {
    fn from(err: std::io::Error) -> Self {
        LendingError::StoreUnavailable(err.to_string())
    }
}
