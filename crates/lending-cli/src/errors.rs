//! CLI error types for structured error handling.
//!
//! Domain errors from the engine are mapped onto a small set of CLI errors,
//! each with a stable exit code and an optional hint line.

use std::fmt;

use lending_core::storage::types::TxnId;
use lending_core::LendingError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug, Clone)]
pub enum CliError {
    /// Member, item, transaction, store, or config not found
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput {
        message: String,
        hint: Option<String>,
    },

    /// Lending policy refused the request
    Refused {
        message: String,
        hint: Option<String>,
    },

    /// Stored state violates a circulation invariant
    Integrity(String),

    /// The store could not be read or written
    StoreUnavailable(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, .. }
            | CliError::InvalidInput { message, .. }
            | CliError::Refused { message, .. } => write!(f, "{}", message),
            CliError::Integrity(message) => write!(f, "Integrity check failed: {}", message),
            CliError::StoreUnavailable(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: None,
        }
    }

    fn refused(message: impl Into<String>, hint: Option<&str>) -> Self {
        CliError::Refused {
            message: message.into(),
            hint: hint.map(str::to_string),
        }
    }

    /// A member tried to return a loan held by someone else.
    pub fn not_owner(txn_id: TxnId, member_id: &str) -> Self {
        CliError::refused(
            format!("Transaction {} is not held by {}", txn_id, member_id),
            Some("Run `lending loans --member <ID>` to see your open loans."),
        )
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } => Some(hint.as_str()),
            CliError::InvalidInput { hint, .. } | CliError::Refused { hint, .. } => {
                hint.as_deref()
            }
            CliError::Integrity(_) => {
                Some("Restore from a backup made with `lending backup <DEST>`.")
            }
            CliError::StoreUnavailable(_) => {
                Some("Nothing was changed; retrying the command is safe.")
            }
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput { .. } => exit_codes::INVALID_INPUT,
            CliError::Refused { .. } => exit_codes::REFUSED,
            CliError::Integrity(_) => exit_codes::INTEGRITY_FAILED,
            CliError::StoreUnavailable(_) => exit_codes::STORE_UNAVAILABLE,
        }
    }
}

impl From<LendingError> for CliError {
    fn from(err: LendingError) -> Self {
        let message = err.to_string();
        match err {
            LendingError::UnknownMember(_) => CliError::not_found(
                message,
                "Run `lending member list` to see registered members.",
            ),
            LendingError::UnknownItem(_) => CliError::not_found(
                message,
                "Run `lending item list` to see the catalog.",
            ),
            LendingError::UnknownTransaction(_) => CliError::not_found(
                message,
                "Run `lending loans` to see open transactions.",
            ),
            LendingError::StoreNotFound(_) => CliError::not_found(
                message,
                "Run `lending init` or pass --store <PATH>.",
            ),
            LendingError::NoCopiesAvailable(_) => CliError::refused(
                message,
                Some("Run `lending reserve <MEMBER> <ITEM>` to join the wait-list."),
            ),
            LendingError::BorrowLimitExceeded { .. } => CliError::refused(
                message,
                Some("Return an open loan before borrowing another item."),
            ),
            LendingError::AlreadyReturned(_) => CliError::refused(message, None),
            LendingError::ItemCurrentlyAvailable(_) => CliError::refused(
                message,
                Some("Run `lending issue <MEMBER> <ITEM>` to borrow it now."),
            ),
            LendingError::InvalidInput(detail) => CliError::invalid_input(detail),
            LendingError::Integrity(detail) => CliError::Integrity(detail),
            LendingError::StoreUnavailable(_) => CliError::StoreUnavailable(message),
        }
    }
}

/// Find the most specific CLI error in an anyhow chain.
///
/// Engine errors that were propagated with `?` are mapped on the way out.
pub fn classify(err: &anyhow::Error) -> Option<CliError> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<CliError>()
            .cloned()
            .or_else(|| cause.downcast_ref::<LendingError>().cloned().map(CliError::from))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_kind() {
        let not_found: CliError = LendingError::UnknownItem("b9".to_string()).into();
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);

        let refused: CliError = LendingError::NoCopiesAvailable("b3".to_string()).into();
        assert_eq!(refused.exit_code(), exit_codes::REFUSED);

        let store: CliError = LendingError::StoreUnavailable("locked".to_string()).into();
        assert_eq!(store.exit_code(), exit_codes::STORE_UNAVAILABLE);

        let integrity: CliError = LendingError::Integrity("b1".to_string()).into();
        assert_eq!(integrity.exit_code(), exit_codes::INTEGRITY_FAILED);
    }

    #[test]
    fn test_not_owner_is_refusal() {
        let err = CliError::not_owner(TxnId(3), "m002");
        assert_eq!(err.exit_code(), exit_codes::REFUSED);
        assert_eq!(err.to_string(), "Transaction TX3 is not held by m002");
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_classify_finds_wrapped_error() {
        let err = anyhow::Error::new(CliError::invalid_input("bad limit"))
            .context("while building report");
        let found = classify(&err).expect("cli error in chain");
        assert_eq!(found.exit_code(), exit_codes::INVALID_INPUT);
        assert_eq!(found.to_string(), "bad limit");
    }

    #[test]
    fn test_classify_maps_engine_error() {
        let err = anyhow::Error::new(LendingError::AlreadyReturned(TxnId(8)));
        let found = classify(&err).expect("engine error in chain");
        assert_eq!(found.exit_code(), exit_codes::REFUSED);
        assert!(classify(&anyhow::anyhow!("plain failure")).is_none());
    }
}
