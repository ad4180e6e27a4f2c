//! The lending engine.
//!
//! Every circulation operation reads the clock once, opens one unit of work,
//! checks its preconditions against that unit, applies all of its writes, and
//! commits. A refusal or failure drops the unit, which rolls everything back.

mod reports;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{LendingError, Result};
use crate::policy::{overdue_days, Category, LendingPolicy};
use crate::storage::traits::{
    CatalogStore, LendingStore, MembershipStore, ReservationQueue, TransactionLedger, UnitOfWork,
};
use crate::storage::types::{
    NewReservation, NewTransaction, Reservation, ReturnOutcome, Transaction, TxnId,
};

use chrono::{DateTime, Utc};

/// Circulation engine over a store, a clock, and a policy table.
pub struct LendingEngine<S, C = SystemClock> {
    store: S,
    clock: C,
    policy: LendingPolicy,
}

impl<S: LendingStore> LendingEngine<S> {
    /// Engine on the system clock with the default policy.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: LendingStore, C: Clock> LendingEngine<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            policy: LendingPolicy::default(),
        }
    }

    /// Replace the policy table.
    pub fn with_policy(mut self, policy: LendingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Lend one copy of `item_id` to `member_id`.
    ///
    /// Preconditions are checked in this order and the first failure wins:
    /// member known with a category, item known, a copy available, member
    /// under their borrow limit.
    pub fn issue_item(&self, member_id: &str, item_id: &str) -> Result<Transaction> {
        let now = self.clock.now();
        let mut unit = self.store.begin()?;

        let category = unit
            .get_member(member_id)?
            .and_then(|member| member.category)
            .ok_or_else(|| refuse(LendingError::UnknownMember(member_id.to_string())))?;
        let item = unit
            .get_item(item_id)?
            .ok_or_else(|| refuse(LendingError::UnknownItem(item_id.to_string())))?;
        if item.available_copies == 0 {
            return Err(refuse(LendingError::NoCopiesAvailable(item_id.to_string())));
        }
        let limit = self.policy.terms(Some(category)).borrow_limit;
        if unit.count_open_for_member(member_id)? >= limit {
            return Err(refuse(LendingError::BorrowLimitExceeded {
                member_id: member_id.to_string(),
                limit,
            }));
        }

        let txn = self.record_loan(&mut unit, member_id, item_id, Some(category), now)?;
        commit(unit)?;

        info!(
            txn = %txn.txn_id,
            member = member_id,
            item = item_id,
            due = %txn.due_time,
            "issued item"
        );
        Ok(txn)
    }

    /// Close a loan, charge any overdue fine, and hand the freed copy to the
    /// oldest waiting reservation for the item.
    ///
    /// Serves both staff returns and member self-service returns; ownership is
    /// checked by the caller.
    pub fn return_item(&self, txn_id: TxnId) -> Result<ReturnOutcome> {
        let now = self.clock.now();
        let mut unit = self.store.begin()?;

        let open = unit
            .get_transaction(txn_id)?
            .ok_or_else(|| refuse(LendingError::UnknownTransaction(txn_id)))?;
        if !open.is_open() {
            return Err(refuse(LendingError::AlreadyReturned(txn_id)));
        }

        let fine = self.policy.fine_for(overdue_days(open.due_time, now));
        let returned = unit.close_transaction(txn_id, now, fine)?;
        unit.adjust_availability(&returned.item_id, 1)?;

        // Handoff skips the availability and borrow-limit checks.
        let mut handoff = None;
        if let Some(reservation) = unit.next_waiting(&returned.item_id)? {
            unit.mark_fulfilled(reservation.res_id)?;
            let category = unit
                .get_member(&reservation.member_id)?
                .and_then(|member| member.category);
            let txn = self.record_loan(
                &mut unit,
                &reservation.member_id,
                &reservation.item_id,
                category,
                now,
            )?;
            handoff = Some((reservation, txn));
        }

        commit(unit)?;

        info!(
            txn = %txn_id,
            member = %returned.member_id,
            item = %returned.item_id,
            fine,
            "returned item"
        );
        if let Some((reservation, txn)) = &handoff {
            info!(
                reservation = %reservation.res_id,
                member = %reservation.member_id,
                txn = %txn.txn_id,
                "fulfilled reservation on return"
            );
        }

        let (reservation_fulfilled_member_id, handoff) = match handoff {
            Some((reservation, txn)) => (Some(reservation.member_id), Some(txn)),
            None => (None, None),
        };
        Ok(ReturnOutcome {
            returned,
            fine_amount: fine,
            reservation_fulfilled_member_id,
            handoff,
        })
    }

    /// Join the wait-list for an item that has no copy on the shelf.
    pub fn reserve_item(&self, member_id: &str, item_id: &str) -> Result<Reservation> {
        let now = self.clock.now();
        let mut unit = self.store.begin()?;

        if unit.get_member(member_id)?.is_none() {
            return Err(refuse(LendingError::UnknownMember(member_id.to_string())));
        }
        let item = unit
            .get_item(item_id)?
            .ok_or_else(|| refuse(LendingError::UnknownItem(item_id.to_string())))?;
        if item.available_copies > 0 {
            return Err(refuse(LendingError::ItemCurrentlyAvailable(
                item_id.to_string(),
            )));
        }

        let reservation = unit.insert_reservation(&NewReservation {
            item_id: item_id.to_string(),
            member_id: member_id.to_string(),
            created_time: now,
        })?;
        commit(unit)?;

        info!(
            reservation = %reservation.res_id,
            member = member_id,
            item = item_id,
            "reserved item"
        );
        Ok(reservation)
    }

    /// Write a new loan: one copy off the shelf, one more lifetime loan, one
    /// ledger row due after the category's loan period.
    fn record_loan<U: UnitOfWork>(
        &self,
        unit: &mut U,
        member_id: &str,
        item_id: &str,
        category: Option<Category>,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        unit.adjust_availability(item_id, -1)?;
        unit.increment_borrowed_count(item_id)?;
        unit.insert_transaction(&NewTransaction {
            member_id: member_id.to_string(),
            item_id: item_id.to_string(),
            issue_time: now,
            due_time: self.policy.due_time(category, now)?,
        })
    }
}

fn refuse(err: LendingError) -> LendingError {
    debug!(error = %err, "operation refused");
    err
}

fn commit<U: UnitOfWork>(unit: U) -> Result<()> {
    unit.commit().map_err(|err| {
        warn!(error = %err, "commit failed; changes rolled back");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::traits::CatalogStore;
    use crate::storage::types::{NewItem, NewMember, ReservationStatus};
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap()
    }

    fn engine() -> LendingEngine<MemoryStore, ManualClock> {
        let store = MemoryStore::new();
        store
            .register_item(&NewItem::new("b001", "The C Programming Language").with_copies(3))
            .unwrap();
        store
            .register_item(&NewItem::new("b003", "Introduction to Algorithms"))
            .unwrap();
        store
            .register_member(&NewMember::new("m001", "Alice", Category::Student))
            .unwrap();
        store
            .register_member(&NewMember::new("m002", "Bob", Category::Faculty))
            .unwrap();
        store
            .register_member(&NewMember::without_category("admin1", "Admin"))
            .unwrap();
        LendingEngine::with_clock(store, ManualClock::new(start()))
    }

    fn available(engine: &LendingEngine<MemoryStore, ManualClock>, item_id: &str) -> u32 {
        let unit = engine.store().begin().unwrap();
        unit.get_item(item_id).unwrap().unwrap().available_copies
    }

    #[test]
    fn test_issue_sets_due_from_category() {
        let engine = engine();
        let txn = engine.issue_item("m002", "b001").unwrap();

        assert_eq!(txn.issue_time, start());
        assert_eq!(txn.due_time, start() + Duration::days(30));
        assert!(txn.is_open());
        assert_eq!(available(&engine, "b001"), 2);
    }

    #[test]
    fn test_issue_precondition_order() {
        let engine = engine();

        // Unknown member wins over unknown item.
        assert!(matches!(
            engine.issue_item("ghost", "nope"),
            Err(LendingError::UnknownMember(_))
        ));
        assert!(matches!(
            engine.issue_item("admin1", "b001"),
            Err(LendingError::UnknownMember(_))
        ));
        assert!(matches!(
            engine.issue_item("m001", "nope"),
            Err(LendingError::UnknownItem(_))
        ));

        engine.issue_item("m001", "b003").unwrap();
        assert!(matches!(
            engine.issue_item("m002", "b003"),
            Err(LendingError::NoCopiesAvailable(_))
        ));
    }

    #[test]
    fn test_refused_issue_changes_nothing() {
        let engine = engine();
        engine.issue_item("m001", "b003").unwrap();
        let _ = engine.issue_item("m002", "b003");

        let unit = engine.store().begin().unwrap();
        let item = unit.get_item("b003").unwrap().unwrap();
        assert_eq!(item.available_copies, 0);
        assert_eq!(item.borrowed_count, 1);
    }

    #[test]
    fn test_return_on_time_has_no_fine() {
        let engine = engine();
        let txn = engine.issue_item("m001", "b001").unwrap();
        engine.clock().advance(Duration::days(14) + Duration::hours(13));

        let outcome = engine.return_item(txn.txn_id).unwrap();
        assert_eq!(outcome.fine_amount, 0);
        assert_eq!(outcome.returned.fine_amount, 0);
        assert!(outcome.reservation_fulfilled_member_id.is_none());
        assert_eq!(available(&engine, "b001"), 3);
    }

    #[test]
    fn test_return_twice_is_refused() {
        let engine = engine();
        let txn = engine.issue_item("m001", "b001").unwrap();
        engine.return_item(txn.txn_id).unwrap();

        assert!(matches!(
            engine.return_item(txn.txn_id),
            Err(LendingError::AlreadyReturned(_))
        ));
        assert!(matches!(
            engine.return_item(TxnId(99)),
            Err(LendingError::UnknownTransaction(_))
        ));
        assert_eq!(available(&engine, "b001"), 3);
    }

    #[test]
    fn test_reserve_requires_exhausted_stock() {
        let engine = engine();
        assert!(matches!(
            engine.reserve_item("m002", "b003"),
            Err(LendingError::ItemCurrentlyAvailable(_))
        ));
        assert!(matches!(
            engine.reserve_item("ghost", "b003"),
            Err(LendingError::UnknownMember(_))
        ));
        assert!(matches!(
            engine.reserve_item("m002", "nope"),
            Err(LendingError::UnknownItem(_))
        ));

        engine.issue_item("m001", "b003").unwrap();
        let reservation = engine.reserve_item("m002", "b003").unwrap();
        assert_eq!(reservation.status, ReservationStatus::Waiting);
        assert_eq!(reservation.created_time, start());
    }

    #[test]
    fn test_handoff_to_member_without_category_uses_student_period() {
        let engine = engine();
        let txn = engine.issue_item("m001", "b003").unwrap();
        engine.reserve_item("admin1", "b003").unwrap();
        engine.clock().advance(Duration::days(1));

        let outcome = engine.return_item(txn.txn_id).unwrap();
        let handoff = outcome.handoff.unwrap();
        assert_eq!(handoff.member_id, "admin1");
        assert_eq!(handoff.due_time, handoff.issue_time + Duration::days(14));
    }

    #[test]
    fn test_out_of_range_loan_period_is_refused_without_changes() {
        let mut policy = LendingPolicy::default();
        policy.student.loan_period_days = 100_000_000;
        let engine = engine().with_policy(policy);

        assert!(matches!(
            engine.issue_item("m001", "b001"),
            Err(LendingError::InvalidInput(_))
        ));
        assert_eq!(available(&engine, "b001"), 3);
        assert!(engine.list_open_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_huge_daily_fine_saturates() {
        let engine = engine().with_policy(LendingPolicy {
            fine_per_day: i64::MAX / 2,
            ..LendingPolicy::default()
        });
        let txn = engine.issue_item("m001", "b001").unwrap();
        engine.clock().advance(Duration::days(20));

        let outcome = engine.return_item(txn.txn_id).unwrap();
        assert_eq!(outcome.fine_amount, i64::MAX);
        assert_eq!(available(&engine, "b001"), 3);
    }
}
