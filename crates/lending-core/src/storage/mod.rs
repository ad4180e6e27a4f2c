//! Storage layer for Lending.
//!
//! This module provides:
//! - Narrow store traits (catalog, membership, ledger, reservations)
//! - The unit of work that makes each engine operation atomic
//! - A SQLite backend and an in-memory backend

mod memory;
mod sqlite;
pub mod traits;
pub mod types;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{
    CatalogStore, LendingStore, MembershipStore, ReservationQueue, TransactionLedger, UnitOfWork,
};
pub use types::{
    BorrowedCount, IntegrityReport, Item, Member, NewItem, NewMember, NewReservation,
    NewTransaction, OverdueEntry, Reservation, ReservationId, ReservationStatus, ReturnOutcome,
    StoreMetadata, Transaction, TransactionFilter, TransactionStatus, TxnId,
};
