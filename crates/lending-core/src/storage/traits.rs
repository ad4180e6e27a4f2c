//! Storage trait definitions.
//!
//! The engine never talks to a database directly. It opens a unit of work
//! through [`LendingStore::begin`] and sees the catalog, membership, ledger,
//! and reservation queue through the narrow traits below. A unit that is
//! dropped without [`UnitOfWork::commit`] leaves no trace.

use super::types::{
    Item, Member, NewItem, NewMember, NewReservation, NewTransaction, Reservation, ReservationId,
    StoreMetadata, Transaction, TransactionFilter, TxnId,
};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Item records and copy counters.
pub trait CatalogStore {
    /// Get an item by ID.
    ///
    /// Returns `Ok(None)` if the catalog has no such item.
    fn get_item(&self, id: &str) -> Result<Option<Item>>;

    /// Add `delta` to the item's available copies.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::UnknownItem` if the item does not exist, and
    /// `LendingError::Integrity` if the result would leave `0..=total_copies`.
    fn adjust_availability(&mut self, id: &str, delta: i32) -> Result<()>;

    /// Bump the item's lifetime loan counter by one.
    fn increment_borrowed_count(&mut self, id: &str) -> Result<()>;

    /// All items in insertion order.
    fn list_items(&self) -> Result<Vec<Item>>;
}

/// Member lookups. Read-only from the engine's point of view.
pub trait MembershipStore {
    fn get_member(&self, id: &str) -> Result<Option<Member>>;
}

/// Append-mostly log of loans.
pub trait TransactionLedger {
    /// Append a borrowed transaction and return it with its new ID.
    fn insert_transaction(&mut self, txn: &NewTransaction) -> Result<Transaction>;

    fn get_transaction(&self, id: TxnId) -> Result<Option<Transaction>>;

    /// Close an open transaction. This is the only mutation a transaction
    /// ever sees.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::UnknownTransaction` if the ID does not exist and
    /// `LendingError::AlreadyReturned` if it is already closed.
    fn close_transaction(
        &mut self,
        id: TxnId,
        return_time: DateTime<Utc>,
        fine_amount: i64,
    ) -> Result<Transaction>;

    /// Number of open transactions held by a member.
    fn count_open_for_member(&self, member_id: &str) -> Result<usize>;

    /// Transactions matching the filter, in creation order.
    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
}

/// Per-item FIFO wait-lists.
pub trait ReservationQueue {
    /// Append a waiting reservation and return it with its new ID.
    fn insert_reservation(&mut self, reservation: &NewReservation) -> Result<Reservation>;

    /// Oldest waiting reservation for an item (earliest `created_time`, then
    /// lowest ID).
    fn next_waiting(&self, item_id: &str) -> Result<Option<Reservation>>;

    /// Move a waiting reservation to fulfilled.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Integrity` if the reservation is not waiting.
    fn mark_fulfilled(&mut self, id: ReservationId) -> Result<()>;

    /// Reservations in queue order, optionally for one item.
    fn list_reservations(&self, item_id: Option<&str>) -> Result<Vec<Reservation>>;
}

/// One atomic view over all four stores.
pub trait UnitOfWork: CatalogStore + MembershipStore + TransactionLedger + ReservationQueue {
    /// Publish every change made through this unit.
    fn commit(self) -> Result<()>;
}

/// A backend able to hand out units of work.
///
/// All implementations must ensure:
/// - Units are mutually exclusive for writers (no lost update on the last copy)
/// - A unit dropped without commit rolls back completely
/// - IDs are assigned in creation order
pub trait LendingStore: Send + Sync {
    type Unit<'a>: UnitOfWork
    where
        Self: 'a;

    /// Begin a unit of work, waiting for any other writer to finish.
    fn begin(&self) -> Result<Self::Unit<'_>>;

    /// Begin a unit for queries only. Backends that can read a snapshot
    /// without taking the write lock override this.
    fn begin_read(&self) -> Result<Self::Unit<'_>> {
        self.begin()
    }

    /// Get store metadata.
    fn metadata(&self) -> Result<StoreMetadata>;

    // --- Registration (catalog and membership administration) ---

    /// Register an item with all copies available.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::InvalidInput` if the ID is empty or taken.
    fn register_item(&self, item: &NewItem) -> Result<Item>;

    /// Register a member.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::InvalidInput` if the ID is empty or taken.
    fn register_member(&self, member: &NewMember) -> Result<Member>;

    /// All members in insertion order.
    fn list_members(&self) -> Result<Vec<Member>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_definition_compiles() {
        fn _accepts_lending_store<S: LendingStore>(_store: S) {}
        fn _accepts_unit<U: UnitOfWork>(_unit: U) {}
    }
}
