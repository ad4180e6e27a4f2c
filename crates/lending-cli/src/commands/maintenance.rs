use std::path::Path;

use serde_json::json;

use crate::app::AppContext;
use crate::cli::BackupArgs;
use crate::output::{integrity_json, print_json};
use crate::ui::{badge, kv, receipt, Badge};

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    // A failed check propagates as an integrity error with its own exit code
    let report = engine.check_integrity()?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&integrity_json(&report));
    }
    if !ctx.quiet() {
        println!("{}", badge(&ui, Badge::Ok, "Integrity check: OK"));
        println!("{}", kv(&ui, "Items", &report.items.to_string()));
        println!(
            "{}",
            kv(&ui, "Open loans", &report.open_transactions.to_string())
        );
        println!(
            "{}",
            kv(
                &ui,
                "Waiting reservations",
                &report.waiting_reservations.to_string()
            )
        );
    }
    Ok(())
}

pub fn handle_backup(ctx: &AppContext, args: &BackupArgs) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let destination = Path::new(&args.destination);
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create backup directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    engine.store().backup_to(destination)?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&json!({ "status": "ok", "destination": args.destination }));
    }
    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui,
                "Backed up store",
                &[("Destination", args.destination.clone())]
            )
        );
    }
    Ok(())
}
