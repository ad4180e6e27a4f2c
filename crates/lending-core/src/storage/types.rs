//! Core data types for the storage layer.
//!
//! Records are plain typed values; the backends decide how they are laid out.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LendingError;
use crate::policy::Category;

/// Identifier of a loan transaction, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnId(pub i64);

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TX{}", self.0)
    }
}

impl FromStr for TxnId {
    type Err = LendingError;

    /// Accepts `TX42`, `tx42`, or `42`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("TX")
            .or_else(|| trimmed.strip_prefix("tx"))
            .unwrap_or(trimmed);
        digits
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(TxnId)
            .ok_or_else(|| LendingError::InvalidInput(format!("Invalid transaction ID: {}", value)))
    }
}

/// Identifier of a reservation, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Metadata for a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Format version (e.g., "1")
    pub format_version: String,

    /// Random identifier assigned when the store was created
    pub store_id: Uuid,

    /// When this store was created
    pub created_at: DateTime<Utc>,
}

/// A catalog entry with a pool of identical copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub total_copies: u32,
    pub available_copies: u32,
    /// Number of loans ever issued against this item
    pub borrowed_count: u64,
}

/// Builder for registering a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub id: String,
    pub title: String,
    pub copies: u32,
}

impl NewItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            copies: 1,
        }
    }

    pub fn with_copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }
}

/// A borrower known to the membership store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    /// `None` for accounts that may not borrow
    pub category: Option<Category>,
}

/// Builder for registering a new member.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub id: String,
    pub name: String,
    pub category: Option<Category>,
}

impl NewMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Some(category),
        }
    }

    /// Account without lending rights.
    pub fn without_category(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Borrowed,
    Returned,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Borrowed => "borrowed",
            TransactionStatus::Returned => "returned",
        }
    }
}

/// One loan, from issue to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub txn_id: TxnId,
    pub member_id: String,
    pub item_id: String,
    pub issue_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub return_time: Option<DateTime<Utc>>,
    pub fine_amount: i64,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.status == TransactionStatus::Borrowed
    }
}

/// A loan about to be written to the ledger.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub member_id: String,
    pub item_id: String,
    pub issue_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
}

/// Filter for querying the ledger. Results come back in creation order.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub member_id: Option<String>,
    pub item_id: Option<String>,
    pub open_only: bool,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }

    pub fn item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn open_only(mut self) -> Self {
        self.open_only = true;
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.member_id
            .as_deref()
            .map_or(true, |member_id| member_id == txn.member_id)
            && self
                .item_id
                .as_deref()
                .map_or(true, |item_id| item_id == txn.item_id)
            && (!self.open_only || txn.is_open())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Waiting,
    Fulfilled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Waiting => "waiting",
            ReservationStatus::Fulfilled => "fulfilled",
        }
    }
}

/// A member's place in an item's wait-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub res_id: ReservationId,
    pub item_id: String,
    pub member_id: String,
    pub created_time: DateTime<Utc>,
    pub status: ReservationStatus,
}

/// A reservation about to be appended to the queue.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub item_id: String,
    pub member_id: String,
    pub created_time: DateTime<Utc>,
}

/// Result of a successful return.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnOutcome {
    /// The transaction as closed by this return
    pub returned: Transaction,
    pub fine_amount: i64,
    /// Member whose reservation was fulfilled by this return, if any
    pub reservation_fulfilled_member_id: Option<String>,
    /// Loan issued to that member
    pub handoff: Option<Transaction>,
}

/// One line of the overdue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueEntry {
    pub txn_id: TxnId,
    pub member_id: String,
    pub item_id: String,
    pub due_time: DateTime<Utc>,
    pub overdue_days: i64,
    pub fine: i64,
}

/// One line of the most-borrowed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowedCount {
    pub item_id: String,
    pub title: String,
    pub borrowed_count: u64,
}

/// Totals gathered by a passing integrity check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub items: usize,
    pub open_transactions: usize,
    pub waiting_reservations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txn_id_parse_forms() {
        assert_eq!("TX42".parse::<TxnId>().unwrap(), TxnId(42));
        assert_eq!("tx7".parse::<TxnId>().unwrap(), TxnId(7));
        assert_eq!(" 9 ".parse::<TxnId>().unwrap(), TxnId(9));
        assert!("TX".parse::<TxnId>().is_err());
        assert!("0".parse::<TxnId>().is_err());
        assert_eq!(TxnId(42).to_string(), "TX42");
    }

    #[test]
    fn test_new_item_builder() {
        let item = NewItem::new("b001", "Clean Code").with_copies(3);
        assert_eq!(item.id, "b001");
        assert_eq!(item.copies, 3);
    }

    #[test]
    fn test_transaction_filter_matches() {
        let now = Utc::now();
        let txn = Transaction {
            txn_id: TxnId(1),
            member_id: "m001".to_string(),
            item_id: "b001".to_string(),
            issue_time: now,
            due_time: now,
            return_time: None,
            fine_amount: 0,
            status: TransactionStatus::Borrowed,
        };

        assert!(TransactionFilter::new().member("m001").open_only().matches(&txn));
        assert!(!TransactionFilter::new().member("m002").matches(&txn));
        assert!(!TransactionFilter::new().item("b002").matches(&txn));

        let closed = Transaction {
            status: TransactionStatus::Returned,
            ..txn
        };
        assert!(!TransactionFilter::new().open_only().matches(&closed));
    }
}
