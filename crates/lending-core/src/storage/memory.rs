//! In-memory storage backend.
//!
//! A unit of work copies the whole state, mutates the copy, and writes it back
//! on commit. The state mutex is held for the unit's lifetime.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{LendingError, Result};
use crate::storage::traits::{
    CatalogStore, LendingStore, MembershipStore, ReservationQueue, TransactionLedger, UnitOfWork,
};
use crate::storage::types::{
    Item, Member, NewItem, NewMember, NewReservation, NewTransaction, Reservation, ReservationId,
    ReservationStatus, StoreMetadata, Transaction, TransactionFilter, TransactionStatus, TxnId,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    items: Vec<Item>,
    members: Vec<Member>,
    transactions: Vec<Transaction>,
    reservations: Vec<Reservation>,
}

/// Volatile store for tests and demos.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    metadata: StoreMetadata,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            metadata: StoreMetadata {
                format_version: "memory".to_string(),
                store_id: Uuid::new_v4(),
                created_at: Utc::now(),
            },
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| LendingError::StoreUnavailable("Memory store poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_new_id(kind: &str, id: &str, taken: bool) -> Result<()> {
    if id.trim().is_empty() {
        return Err(LendingError::InvalidInput(format!("{} ID must not be empty", kind)));
    }
    if taken {
        return Err(LendingError::InvalidInput(format!("{} {} already exists", kind, id)));
    }
    Ok(())
}

impl LendingStore for MemoryStore {
    type Unit<'a> = MemoryUnit<'a>;

    fn begin(&self) -> Result<MemoryUnit<'_>> {
        let guard = self.lock_state()?;
        let staged = guard.clone();
        Ok(MemoryUnit { guard, staged })
    }

    fn metadata(&self) -> Result<StoreMetadata> {
        Ok(self.metadata.clone())
    }

    fn register_item(&self, item: &NewItem) -> Result<Item> {
        let mut state = self.lock_state()?;
        let taken = state.items.iter().any(|existing| existing.id == item.id);
        check_new_id("Item", &item.id, taken)?;

        let created = Item {
            id: item.id.clone(),
            title: item.title.clone(),
            total_copies: item.copies,
            available_copies: item.copies,
            borrowed_count: 0,
        };
        state.items.push(created.clone());
        Ok(created)
    }

    fn register_member(&self, member: &NewMember) -> Result<Member> {
        let mut state = self.lock_state()?;
        let taken = state.members.iter().any(|existing| existing.id == member.id);
        check_new_id("Member", &member.id, taken)?;

        let created = Member {
            id: member.id.clone(),
            name: member.name.clone(),
            category: member.category,
        };
        state.members.push(created.clone());
        Ok(created)
    }

    fn list_members(&self) -> Result<Vec<Member>> {
        Ok(self.lock_state()?.members.clone())
    }
}

/// A staged copy of the memory store.
pub struct MemoryUnit<'a> {
    guard: MutexGuard<'a, MemoryState>,
    staged: MemoryState,
}

impl MemoryUnit<'_> {
    fn item_mut(&mut self, id: &str) -> Result<&mut Item> {
        self.staged
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| LendingError::UnknownItem(id.to_string()))
    }
}

impl UnitOfWork for MemoryUnit<'_> {
    fn commit(mut self) -> Result<()> {
        *self.guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}

impl CatalogStore for MemoryUnit<'_> {
    fn get_item(&self, id: &str) -> Result<Option<Item>> {
        Ok(self.staged.items.iter().find(|item| item.id == id).cloned())
    }

    fn adjust_availability(&mut self, id: &str, delta: i32) -> Result<()> {
        let item = self.item_mut(id)?;
        let next = i64::from(item.available_copies) + i64::from(delta);
        if next < 0 || next > i64::from(item.total_copies) {
            return Err(LendingError::Integrity(format!(
                "Adjusting {} by {} would leave {} of {} copies available",
                id, delta, next, item.total_copies
            )));
        }
        item.available_copies = next as u32;
        Ok(())
    }

    fn increment_borrowed_count(&mut self, id: &str) -> Result<()> {
        self.item_mut(id)?.borrowed_count += 1;
        Ok(())
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        Ok(self.staged.items.clone())
    }
}

impl MembershipStore for MemoryUnit<'_> {
    fn get_member(&self, id: &str) -> Result<Option<Member>> {
        Ok(self
            .staged
            .members
            .iter()
            .find(|member| member.id == id)
            .cloned())
    }
}

impl TransactionLedger for MemoryUnit<'_> {
    fn insert_transaction(&mut self, txn: &NewTransaction) -> Result<Transaction> {
        let next_id = self
            .staged
            .transactions
            .last()
            .map_or(1, |last| last.txn_id.0 + 1);
        let created = Transaction {
            txn_id: TxnId(next_id),
            member_id: txn.member_id.clone(),
            item_id: txn.item_id.clone(),
            issue_time: txn.issue_time,
            due_time: txn.due_time,
            return_time: None,
            fine_amount: 0,
            status: TransactionStatus::Borrowed,
        };
        self.staged.transactions.push(created.clone());
        Ok(created)
    }

    fn get_transaction(&self, id: TxnId) -> Result<Option<Transaction>> {
        Ok(self
            .staged
            .transactions
            .iter()
            .find(|txn| txn.txn_id == id)
            .cloned())
    }

    fn close_transaction(
        &mut self,
        id: TxnId,
        return_time: DateTime<Utc>,
        fine_amount: i64,
    ) -> Result<Transaction> {
        let txn = self
            .staged
            .transactions
            .iter_mut()
            .find(|txn| txn.txn_id == id)
            .ok_or(LendingError::UnknownTransaction(id))?;
        if !txn.is_open() {
            return Err(LendingError::AlreadyReturned(id));
        }

        txn.return_time = Some(return_time);
        txn.fine_amount = fine_amount;
        txn.status = TransactionStatus::Returned;
        Ok(txn.clone())
    }

    fn count_open_for_member(&self, member_id: &str) -> Result<usize> {
        Ok(self
            .staged
            .transactions
            .iter()
            .filter(|txn| txn.is_open() && txn.member_id == member_id)
            .count())
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        Ok(self
            .staged
            .transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .cloned()
            .collect())
    }
}

impl ReservationQueue for MemoryUnit<'_> {
    fn insert_reservation(&mut self, reservation: &NewReservation) -> Result<Reservation> {
        let next_id = self
            .staged
            .reservations
            .last()
            .map_or(1, |last| last.res_id.0 + 1);
        let created = Reservation {
            res_id: ReservationId(next_id),
            item_id: reservation.item_id.clone(),
            member_id: reservation.member_id.clone(),
            created_time: reservation.created_time,
            status: ReservationStatus::Waiting,
        };
        self.staged.reservations.push(created.clone());
        Ok(created)
    }

    fn next_waiting(&self, item_id: &str) -> Result<Option<Reservation>> {
        Ok(self
            .staged
            .reservations
            .iter()
            .filter(|res| res.item_id == item_id && res.status == ReservationStatus::Waiting)
            .min_by_key(|res| (res.created_time, res.res_id))
            .cloned())
    }

    fn mark_fulfilled(&mut self, id: ReservationId) -> Result<()> {
        match self
            .staged
            .reservations
            .iter_mut()
            .find(|res| res.res_id == id && res.status == ReservationStatus::Waiting)
        {
            Some(res) => {
                res.status = ReservationStatus::Fulfilled;
                Ok(())
            }
            None => Err(LendingError::Integrity(format!(
                "Reservation {} is not waiting",
                id
            ))),
        }
    }

    fn list_reservations(&self, item_id: Option<&str>) -> Result<Vec<Reservation>> {
        let mut reservations: Vec<Reservation> = self
            .staged
            .reservations
            .iter()
            .filter(|res| item_id.map_or(true, |item_id| res.item_id == item_id))
            .cloned()
            .collect();
        reservations.sort_by_key(|res| (res.created_time, res.res_id));
        Ok(reservations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Category;

    fn store_with_item(copies: u32) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .register_item(&NewItem::new("b003", "Introduction to Algorithms").with_copies(copies))
            .unwrap();
        store
            .register_member(&NewMember::new("m001", "Alice", Category::Student))
            .unwrap();
        store
    }

    #[test]
    fn test_uncommitted_changes_are_discarded() {
        let store = store_with_item(1);
        {
            let mut unit = store.begin().unwrap();
            unit.adjust_availability("b003", -1).unwrap();
            unit.increment_borrowed_count("b003").unwrap();
        }

        let unit = store.begin().unwrap();
        let item = unit.get_item("b003").unwrap().unwrap();
        assert_eq!(item.available_copies, 1);
        assert_eq!(item.borrowed_count, 0);
    }

    #[test]
    fn test_commit_publishes_changes() {
        let store = store_with_item(1);
        let mut unit = store.begin().unwrap();
        unit.adjust_availability("b003", -1).unwrap();
        unit.commit().unwrap();

        let unit = store.begin().unwrap();
        assert_eq!(unit.get_item("b003").unwrap().unwrap().available_copies, 0);
    }

    #[test]
    fn test_register_rejects_duplicates_and_blank_ids() {
        let store = store_with_item(1);
        assert!(store.register_item(&NewItem::new("b003", "Dup")).is_err());
        assert!(store.register_item(&NewItem::new("  ", "Blank")).is_err());
        assert!(store
            .register_member(&NewMember::without_category("m001", "Dup"))
            .is_err());
    }

    #[test]
    fn test_availability_cannot_leave_bounds() {
        let store = store_with_item(1);
        let mut unit = store.begin().unwrap();
        assert!(matches!(
            unit.adjust_availability("b003", 1),
            Err(LendingError::Integrity(_))
        ));
        unit.adjust_availability("b003", -1).unwrap();
        assert!(matches!(
            unit.adjust_availability("b003", -1),
            Err(LendingError::Integrity(_))
        ));
    }
}
