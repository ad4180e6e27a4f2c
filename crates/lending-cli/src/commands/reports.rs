use crate::app::AppContext;
use crate::cli::TopArgs;
use crate::output::{
    overdue_json, overdue_rows, print_json, top_json, top_rows, OVERDUE_COLUMNS, TOP_COLUMNS,
};
use crate::ui::{badge, header, table, Badge};

pub fn handle_overdue(ctx: &AppContext) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let entries = engine.overdue_report()?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&overdue_json(&entries));
    }
    if !ctx.quiet() {
        println!("{}", header(&ui, "report overdue", None));
    }
    if entries.is_empty() {
        if ui.mode.is_pretty() && !ctx.quiet() {
            println!("{}", badge(&ui, Badge::Ok, "No overdue loans."));
        }
        return Ok(());
    }

    if ui.mode.is_pretty() && !ctx.quiet() {
        let total: i64 = entries.iter().map(|entry| entry.fine).sum();
        println!(
            "{}",
            badge(
                &ui,
                Badge::Warn,
                &format!("{} overdue, {} in fines so far", entries.len(), total)
            )
        );
    }
    println!("{}", table(&ui, &OVERDUE_COLUMNS, &overdue_rows(&entries)));
    Ok(())
}

pub fn handle_top(ctx: &AppContext, args: &TopArgs) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let counts = engine.top_borrowed(args.limit)?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&top_json(&counts));
    }
    if !ctx.quiet() {
        let context = format!("top {}", args.limit);
        println!("{}", header(&ui, "report top", Some(&context)));
    }
    let rows = top_rows(&counts, ui.mode.is_pretty());
    if !rows.is_empty() || ui.mode.is_pretty() {
        println!("{}", table(&ui, &TOP_COLUMNS, &rows));
    }
    Ok(())
}
