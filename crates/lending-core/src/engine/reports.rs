//! Read-only queries over the ledger, the catalog, and the reservation queue.
//!
//! Each query runs inside its own read unit so it sees one consistent
//! snapshot; the unit is dropped without committing.

use std::collections::HashMap;

use super::LendingEngine;
use crate::clock::Clock;
use crate::error::{LendingError, Result};
use crate::policy::overdue_days;
use crate::storage::traits::{
    CatalogStore, LendingStore, ReservationQueue, TransactionLedger,
};
use crate::storage::types::{
    BorrowedCount, IntegrityReport, Item, OverdueEntry, Reservation, ReservationStatus,
    Transaction, TransactionFilter, TxnId,
};

impl<S: LendingStore, C: Clock> LendingEngine<S, C> {
    /// Open loans held by a member, oldest first. Unknown members have none.
    pub fn list_open_transactions_for_member(&self, member_id: &str) -> Result<Vec<Transaction>> {
        let unit = self.store.begin_read()?;
        unit.list_transactions(&TransactionFilter::new().member(member_id).open_only())
    }

    /// Every open loan, oldest first.
    pub fn list_open_transactions(&self) -> Result<Vec<Transaction>> {
        let unit = self.store.begin_read()?;
        unit.list_transactions(&TransactionFilter::new().open_only())
    }

    /// All of a member's loans, newest issue first.
    pub fn member_history(&self, member_id: &str) -> Result<Vec<Transaction>> {
        let unit = self.store.begin_read()?;
        let mut history = unit.list_transactions(&TransactionFilter::new().member(member_id))?;
        history.sort_by(|a, b| {
            b.issue_time
                .cmp(&a.issue_time)
                .then_with(|| b.txn_id.cmp(&a.txn_id))
        });
        Ok(history)
    }

    pub fn find_transaction(&self, txn_id: TxnId) -> Result<Transaction> {
        let unit = self.store.begin_read()?;
        unit.get_transaction(txn_id)?
            .ok_or(LendingError::UnknownTransaction(txn_id))
    }

    /// Reservations in queue order, waiting and fulfilled alike.
    pub fn list_reservations(&self, item_id: Option<&str>) -> Result<Vec<Reservation>> {
        let unit = self.store.begin_read()?;
        unit.list_reservations(item_id)
    }

    pub fn list_items(&self) -> Result<Vec<Item>> {
        let unit = self.store.begin_read()?;
        unit.list_items()
    }

    /// Open loans whose due date has passed, with the fine each would carry
    /// if returned now.
    pub fn overdue_report(&self) -> Result<Vec<OverdueEntry>> {
        let now = self.clock.now();
        let unit = self.store.begin_read()?;

        Ok(unit
            .list_transactions(&TransactionFilter::new().open_only())?
            .into_iter()
            .filter_map(|txn| {
                let days = overdue_days(txn.due_time, now);
                (days > 0).then(|| OverdueEntry {
                    fine: self.policy.fine_for(days),
                    overdue_days: days,
                    txn_id: txn.txn_id,
                    member_id: txn.member_id,
                    item_id: txn.item_id,
                    due_time: txn.due_time,
                })
            })
            .collect())
    }

    /// The `limit` most borrowed items. Ties keep catalog order.
    pub fn top_borrowed(&self, limit: usize) -> Result<Vec<BorrowedCount>> {
        let unit = self.store.begin_read()?;
        let mut items = unit.list_items()?;
        // sort_by is stable, so equal counts stay in insertion order
        items.sort_by(|a, b| b.borrowed_count.cmp(&a.borrowed_count));

        Ok(items
            .into_iter()
            .take(limit)
            .map(|item| BorrowedCount {
                item_id: item.id,
                title: item.title,
                borrowed_count: item.borrowed_count,
            })
            .collect())
    }

    /// Verify copy bounds, conservation, and references for every item.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Integrity` describing the first violation.
    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        let unit = self.store.begin_read()?;
        let items = unit.list_items()?;
        let open = unit.list_transactions(&TransactionFilter::new().open_only())?;
        let reservations = unit.list_reservations(None)?;

        let mut open_per_item: HashMap<&str, u64> = HashMap::new();
        for txn in &open {
            if !items.iter().any(|item| item.id == txn.item_id) {
                return Err(LendingError::Integrity(format!(
                    "Transaction {} references unknown item {}",
                    txn.txn_id, txn.item_id
                )));
            }
            *open_per_item.entry(txn.item_id.as_str()).or_default() += 1;
        }

        for item in &items {
            if item.available_copies > item.total_copies {
                return Err(LendingError::Integrity(format!(
                    "Item {} has {} available of {} copies",
                    item.id, item.available_copies, item.total_copies
                )));
            }
            let on_loan = open_per_item.get(item.id.as_str()).copied().unwrap_or(0);
            if u64::from(item.available_copies) + on_loan != u64::from(item.total_copies) {
                return Err(LendingError::Integrity(format!(
                    "Item {}: {} available + {} on loan != {} copies",
                    item.id, item.available_copies, on_loan, item.total_copies
                )));
            }
        }

        let mut waiting = 0;
        for reservation in &reservations {
            if !items.iter().any(|item| item.id == reservation.item_id) {
                return Err(LendingError::Integrity(format!(
                    "Reservation {} references unknown item {}",
                    reservation.res_id, reservation.item_id
                )));
            }
            if reservation.status == ReservationStatus::Waiting {
                waiting += 1;
            }
        }

        Ok(IntegrityReport {
            items: items.len(),
            open_transactions: open.len(),
            waiting_reservations: waiting,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::policy::Category;
    use crate::storage::traits::LendingStore;
    use crate::storage::types::{NewItem, NewMember};
    use crate::storage::MemoryStore;
    use crate::LendingEngine;
    use chrono::{Duration, TimeZone, Utc};

    fn engine() -> LendingEngine<MemoryStore, ManualClock> {
        let store = MemoryStore::new();
        for (id, title, copies) in [
            ("b001", "The C Programming Language", 3),
            ("b002", "Clean Code", 2),
            ("b003", "Introduction to Algorithms", 1),
        ] {
            store
                .register_item(&NewItem::new(id, title).with_copies(copies))
                .unwrap();
        }
        store
            .register_member(&NewMember::new("m001", "Alice", Category::Student))
            .unwrap();
        store
            .register_member(&NewMember::new("m002", "Bob", Category::Staff))
            .unwrap();
        let start = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        LendingEngine::with_clock(store, ManualClock::new(start))
    }

    #[test]
    fn test_top_borrowed_ties_keep_catalog_order() {
        let engine = engine();
        engine.issue_item("m001", "b003").unwrap();
        engine.issue_item("m001", "b002").unwrap();
        engine.issue_item("m002", "b002").unwrap();

        let top: Vec<String> = engine
            .top_borrowed(10)
            .unwrap()
            .into_iter()
            .map(|entry| entry.item_id)
            .collect();
        assert_eq!(top, vec!["b002", "b003", "b001"]);
        assert_eq!(engine.top_borrowed(1).unwrap().len(), 1);
        assert!(engine.top_borrowed(0).unwrap().is_empty());
    }

    #[test]
    fn test_overdue_report_is_read_only() {
        let engine = engine();
        let late = engine.issue_item("m001", "b001").unwrap();
        engine.clock().advance(Duration::days(7));
        engine.issue_item("m002", "b002").unwrap();
        engine.clock().advance(Duration::days(10));

        let report = engine.overdue_report().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].txn_id, late.txn_id);
        assert_eq!(report[0].overdue_days, 3);
        assert_eq!(report[0].fine, 6);

        assert!(engine.find_transaction(late.txn_id).unwrap().is_open());
        assert_eq!(engine.overdue_report().unwrap(), report);
    }

    #[test]
    fn test_member_history_newest_first() {
        let engine = engine();
        let first = engine.issue_item("m001", "b001").unwrap();
        engine.clock().advance(Duration::days(1));
        let second = engine.issue_item("m001", "b002").unwrap();
        engine.return_item(first.txn_id).unwrap();

        let history = engine.member_history("m001").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].txn_id, second.txn_id);
        assert!(!history[1].is_open());

        let open = engine.list_open_transactions_for_member("m001").unwrap();
        assert_eq!(open.len(), 1);
        assert!(engine
            .list_open_transactions_for_member("nobody")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_integrity_counts() {
        let engine = engine();
        engine.issue_item("m001", "b003").unwrap();
        engine.reserve_item("m002", "b003").unwrap();

        let report = engine.check_integrity().unwrap();
        assert_eq!(report.items, 3);
        assert_eq!(report.open_transactions, 1);
        assert_eq!(report.waiting_reservations, 1);
    }

    #[test]
    fn test_store_begin_is_reusable_after_queries() {
        let engine = engine();
        engine.list_reservations(None).unwrap();
        assert!(engine.store().begin().is_ok());
    }
}
