//! JSON output formatting.

use serde_json::{json, Value};

use lending_core::storage::{
    BorrowedCount, IntegrityReport, Item, Member, OverdueEntry, Reservation, ReturnOutcome,
    Transaction,
};

/// Print a JSON document to stdout.
pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn transaction_json(txn: &Transaction) -> Value {
    json!({
        "txn_id": txn.txn_id.0,
        "txn": txn.txn_id.to_string(),
        "member_id": txn.member_id,
        "item_id": txn.item_id,
        "issue_time": txn.issue_time,
        "due_time": txn.due_time,
        "return_time": txn.return_time,
        "fine_amount": txn.fine_amount,
        "status": txn.status.as_str(),
    })
}

pub fn transactions_json(txns: &[Transaction]) -> Value {
    Value::Array(txns.iter().map(transaction_json).collect())
}

pub fn return_json(outcome: &ReturnOutcome) -> Value {
    json!({
        "returned": transaction_json(&outcome.returned),
        "fine_amount": outcome.fine_amount,
        "reservation_fulfilled_member_id": outcome.reservation_fulfilled_member_id,
        "handoff": outcome.handoff.as_ref().map(transaction_json),
    })
}

pub fn reservation_json(reservation: &Reservation) -> Value {
    json!({
        "res_id": reservation.res_id.0,
        "item_id": reservation.item_id,
        "member_id": reservation.member_id,
        "created_time": reservation.created_time,
        "status": reservation.status.as_str(),
    })
}

pub fn reservations_json(reservations: &[Reservation]) -> Value {
    Value::Array(reservations.iter().map(reservation_json).collect())
}

pub fn items_json(items: &[Item]) -> Value {
    json!(items)
}

pub fn members_json(members: &[Member]) -> Value {
    Value::Array(
        members
            .iter()
            .map(|member| {
                json!({
                    "id": member.id,
                    "name": member.name,
                    "category": member.category.map(|c| c.as_str()),
                })
            })
            .collect(),
    )
}

pub fn overdue_json(entries: &[OverdueEntry]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|entry| {
                json!({
                    "txn_id": entry.txn_id.0,
                    "member_id": entry.member_id,
                    "item_id": entry.item_id,
                    "due_time": entry.due_time,
                    "overdue_days": entry.overdue_days,
                    "fine": entry.fine,
                })
            })
            .collect(),
    )
}

pub fn top_json(counts: &[BorrowedCount]) -> Value {
    json!(counts)
}

pub fn integrity_json(report: &IntegrityReport) -> Value {
    json!({
        "status": "ok",
        "items": report.items,
        "open_transactions": report.open_transactions,
        "waiting_reservations": report.waiting_reservations,
    })
}
