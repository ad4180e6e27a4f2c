use crate::app::AppContext;
use crate::cli::{LoansArgs, ReservationsArgs};
use crate::output::{
    history_columns, loan_columns, print_json, reservation_rows, reservations_json,
    transaction_rows, transactions_json, RESERVATION_COLUMNS,
};
use crate::ui::{header, hint, simple_table};

pub fn handle_loans(ctx: &AppContext, args: &LoansArgs) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let txns = match (args.member.as_deref(), args.history) {
        (Some(member_id), true) => engine.member_history(member_id)?,
        (Some(member_id), false) => engine.list_open_transactions_for_member(member_id)?,
        (None, _) => engine.list_open_transactions()?,
    };

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&transactions_json(&txns));
    }

    let command = if args.history { "history" } else { "loans" };
    if !ctx.quiet() {
        println!("{}", header(&ui, command, args.member.as_deref()));
    }
    if txns.is_empty() {
        if ui.mode.is_pretty() && !ctx.quiet() {
            println!("No loans found.");
            println!("{}", hint(&ui, "Run `lending issue <MEMBER> <ITEM>` to lend an item."));
        }
        return Ok(());
    }

    let columns = if args.history {
        history_columns()
    } else {
        loan_columns()
    };
    let rows = transaction_rows(&txns, args.history, ui.mode.is_pretty());
    println!("{}", simple_table(&ui, &columns, &rows));
    Ok(())
}

pub fn handle_reservations(ctx: &AppContext, args: &ReservationsArgs) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let reservations = engine.list_reservations(args.item.as_deref())?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&reservations_json(&reservations));
    }
    if !ctx.quiet() {
        println!("{}", header(&ui, "reservations", args.item.as_deref()));
    }
    if reservations.is_empty() {
        if ui.mode.is_pretty() && !ctx.quiet() {
            println!("No reservations found.");
        }
        return Ok(());
    }

    let rows = reservation_rows(&reservations, ui.mode.is_pretty());
    println!("{}", simple_table(&ui, &RESERVATION_COLUMNS, &rows));
    Ok(())
}
