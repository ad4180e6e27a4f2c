//! Issue, return, and reserve.

use lending_core::storage::{ReservationStatus, TxnId};

use crate::app::AppContext;
use crate::cli::{LoanRequestArgs, ReturnArgs};
use crate::errors::CliError;
use crate::output::{print_json, reservation_json, return_json, transaction_json};
use crate::ui::{badge, format_date, format_datetime, format_fine, receipt, Badge};

pub fn handle_issue(ctx: &AppContext, args: &LoanRequestArgs) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let txn = engine.issue_item(&args.member, &args.item)?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&transaction_json(&txn));
    }
    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui,
                &format!("Issued {} to {}", txn.item_id, txn.member_id),
                &[
                    ("Txn", txn.txn_id.to_string()),
                    ("Due", format_date(&txn.due_time)),
                ],
            )
        );
    }
    Ok(())
}

pub fn handle_return(ctx: &AppContext, args: &ReturnArgs) -> anyhow::Result<()> {
    let txn_id: TxnId = args.txn.parse()?;
    let engine = ctx.open_engine()?;

    if let Some(member_id) = args.member.as_deref() {
        let txn = engine.find_transaction(txn_id)?;
        if txn.member_id != member_id {
            return Err(CliError::not_owner(txn_id, member_id).into());
        }
    }

    let outcome = engine.return_item(txn_id)?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&return_json(&outcome));
    }
    if ctx.quiet() {
        return Ok(());
    }

    let returned = &outcome.returned;
    let mut fields = vec![
        ("Item", returned.item_id.clone()),
        ("Member", returned.member_id.clone()),
        ("Fine", format_fine(outcome.fine_amount)),
    ];
    if let Some(at) = returned.return_time {
        fields.push(("Returned", format_datetime(&at, ui.mode.is_pretty())));
    }
    println!(
        "{}",
        receipt(&ui, &format!("Returned {}", returned.txn_id), &fields)
    );

    if let Some(handoff) = &outcome.handoff {
        let message = format!(
            "Handed {} to {} as {} (due {})",
            handoff.item_id,
            handoff.member_id,
            handoff.txn_id,
            format_date(&handoff.due_time)
        );
        if ui.mode.is_pretty() {
            println!("{}", badge(&ui, Badge::Info, &message));
        } else {
            println!("handoff={} member={}", handoff.txn_id, handoff.member_id);
        }
    }
    Ok(())
}

pub fn handle_reserve(ctx: &AppContext, args: &LoanRequestArgs) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let reservation = engine.reserve_item(&args.member, &args.item)?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&reservation_json(&reservation));
    }
    if !ctx.quiet() {
        let position = engine
            .list_reservations(Some(&reservation.item_id))?
            .iter()
            .filter(|r| r.status == ReservationStatus::Waiting)
            .position(|r| r.res_id == reservation.res_id)
            .map(|index| index + 1)
            .unwrap_or(1);
        println!(
            "{}",
            receipt(
                &ui,
                &format!("Reserved {} for {}", reservation.item_id, reservation.member_id),
                &[
                    ("Reservation", reservation.res_id.to_string()),
                    ("Queue position", position.to_string()),
                ],
            )
        );
    }
    Ok(())
}
