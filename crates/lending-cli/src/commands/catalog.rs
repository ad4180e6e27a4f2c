//! Catalog and membership registration.

use lending_core::storage::{LendingStore, NewItem, NewMember};

use crate::app::AppContext;
use crate::cli::{ItemAddArgs, MemberAddArgs};
use crate::errors::CliError;
use crate::output::{
    item_rows, items_json, member_rows, members_json, print_json, ITEM_COLUMNS, MEMBER_COLUMNS,
};
use crate::ui::{header, receipt, table};

pub fn handle_item_add(ctx: &AppContext, args: &ItemAddArgs) -> anyhow::Result<()> {
    if args.copies == 0 {
        return Err(CliError::invalid_input("An item needs at least one copy").into());
    }
    let engine = ctx.open_engine()?;
    let item = engine
        .store()
        .register_item(&NewItem::new(args.id.as_str(), args.title.as_str()).with_copies(args.copies))?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&serde_json::json!(item));
    }
    if !ctx.quiet() {
        println!(
            "{}",
            receipt(
                &ui,
                &format!("Registered {}", item.id),
                &[
                    ("Title", item.title.clone()),
                    ("Copies", item.total_copies.to_string()),
                ],
            )
        );
    }
    Ok(())
}

pub fn handle_item_list(ctx: &AppContext) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let items = engine.list_items()?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&items_json(&items));
    }
    if !ctx.quiet() {
        println!("{}", header(&ui, "items", None));
    }
    let rows = item_rows(&items, ui.mode.is_pretty());
    if !rows.is_empty() || ui.mode.is_pretty() {
        println!("{}", table(&ui, &ITEM_COLUMNS, &rows));
    }
    Ok(())
}

pub fn handle_member_add(ctx: &AppContext, args: &MemberAddArgs) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let new_member = match args.category {
        Some(category) => NewMember::new(args.id.as_str(), args.name.as_str(), category),
        None => NewMember::without_category(args.id.as_str(), args.name.as_str()),
    };
    let member = engine.store().register_member(&new_member)?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&members_json(std::slice::from_ref(&member)));
    }
    if !ctx.quiet() {
        let category = member
            .category
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "none (cannot borrow)".to_string());
        println!(
            "{}",
            receipt(
                &ui,
                &format!("Registered {}", member.id),
                &[("Name", member.name.clone()), ("Category", category)],
            )
        );
    }
    Ok(())
}

pub fn handle_member_list(ctx: &AppContext) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;
    let members = engine.store().list_members()?;

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&members_json(&members));
    }
    if !ctx.quiet() {
        println!("{}", header(&ui, "members", None));
    }
    let rows = member_rows(&members, ui.mode.is_pretty());
    if !rows.is_empty() || ui.mode.is_pretty() {
        println!("{}", table(&ui, &MEMBER_COLUMNS, &rows));
    }
    Ok(())
}
