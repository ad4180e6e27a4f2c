//! Row types for database queries.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{LendingError, Result};
use crate::policy::Category;
use crate::storage::types::{
    Item, Member, Reservation, ReservationId, ReservationStatus, Transaction, TransactionStatus,
    TxnId,
};

/// Timestamps are stored as second-precision RFC 3339 in UTC, which sorts
/// lexicographically in time order.
pub fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_time(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| LendingError::StoreUnavailable(format!("Invalid {} timestamp: {}", column, e)))
}

fn to_count<T: TryFrom<i64>>(value: i64, column: &str) -> Result<T> {
    T::try_from(value)
        .map_err(|_| LendingError::StoreUnavailable(format!("Invalid {} value: {}", column, value)))
}

/// Raw row data from the items table.
#[derive(Debug)]
pub struct ItemRow {
    pub id: String,
    pub title: String,
    pub total_copies: i64,
    pub available_copies: i64,
    pub borrowed_count: i64,
}

impl ItemRow {
    pub const COLUMNS: &'static str = "id, title, total_copies, available_copies, borrowed_count";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            total_copies: row.get(2)?,
            available_copies: row.get(3)?,
            borrowed_count: row.get(4)?,
        })
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = LendingError;

    fn try_from(row: ItemRow) -> Result<Self> {
        Ok(Item {
            total_copies: to_count(row.total_copies, "total_copies")?,
            available_copies: to_count(row.available_copies, "available_copies")?,
            borrowed_count: to_count(row.borrowed_count, "borrowed_count")?,
            id: row.id,
            title: row.title,
        })
    }
}

/// Raw row data from the members table.
#[derive(Debug)]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
}

impl MemberRow {
    pub const COLUMNS: &'static str = "id, name, category";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
        })
    }
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: row.id,
            name: row.name,
            category: row
                .category
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .map(Category::from_stored),
        }
    }
}

/// Raw row data from the transactions table.
#[derive(Debug)]
pub struct TransactionRow {
    pub txn_id: i64,
    pub member_id: String,
    pub item_id: String,
    pub issue_time: String,
    pub due_time: String,
    pub return_time: Option<String>,
    pub fine_amount: i64,
    pub status: String,
}

impl TransactionRow {
    pub const COLUMNS: &'static str =
        "txn_id, member_id, item_id, issue_time, due_time, return_time, fine_amount, status";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            txn_id: row.get(0)?,
            member_id: row.get(1)?,
            item_id: row.get(2)?,
            issue_time: row.get(3)?,
            due_time: row.get(4)?,
            return_time: row.get(5)?,
            fine_amount: row.get(6)?,
            status: row.get(7)?,
        })
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = LendingError;

    fn try_from(row: TransactionRow) -> Result<Self> {
        let status = match row.status.as_str() {
            "borrowed" => TransactionStatus::Borrowed,
            "returned" => TransactionStatus::Returned,
            other => {
                return Err(LendingError::StoreUnavailable(format!(
                    "Invalid transaction status: {}",
                    other
                )))
            }
        };
        let return_time = row
            .return_time
            .as_deref()
            .map(|value| decode_time(value, "return_time"))
            .transpose()?;

        Ok(Transaction {
            txn_id: TxnId(row.txn_id),
            issue_time: decode_time(&row.issue_time, "issue_time")?,
            due_time: decode_time(&row.due_time, "due_time")?,
            return_time,
            fine_amount: row.fine_amount,
            status,
            member_id: row.member_id,
            item_id: row.item_id,
        })
    }
}

/// Raw row data from the reservations table.
#[derive(Debug)]
pub struct ReservationRow {
    pub res_id: i64,
    pub item_id: String,
    pub member_id: String,
    pub created_time: String,
    pub status: String,
}

impl ReservationRow {
    pub const COLUMNS: &'static str = "res_id, item_id, member_id, created_time, status";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            res_id: row.get(0)?,
            item_id: row.get(1)?,
            member_id: row.get(2)?,
            created_time: row.get(3)?,
            status: row.get(4)?,
        })
    }
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = LendingError;

    fn try_from(row: ReservationRow) -> Result<Self> {
        let status = match row.status.as_str() {
            "waiting" => ReservationStatus::Waiting,
            "fulfilled" => ReservationStatus::Fulfilled,
            other => {
                return Err(LendingError::StoreUnavailable(format!(
                    "Invalid reservation status: {}",
                    other
                )))
            }
        };

        Ok(Reservation {
            res_id: ReservationId(row.res_id),
            created_time: decode_time(&row.created_time, "created_time")?,
            status,
            item_id: row.item_id,
            member_id: row.member_id,
        })
    }
}
