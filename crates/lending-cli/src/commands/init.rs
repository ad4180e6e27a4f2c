use std::path::PathBuf;

use serde_json::json;

use lending_core::storage::{LendingStore, NewItem, NewMember};
use lending_core::{Category, SqliteStore};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{write_config, LendingConfig};
use crate::output::print_json;
use crate::ui::{hint, kv, receipt};

/// Books registered by `init --seed`.
const DEMO_ITEMS: [(&str, &str, u32); 3] = [
    ("b001", "The C Programming Language", 3),
    ("b002", "Clean Code", 2),
    ("b003", "Introduction to Algorithms", 1),
];

const DEMO_MEMBER: (&str, &str) = ("m001", "Alice Student");

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let target = match args.path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => ctx.store_path()?,
    };

    let store = SqliteStore::create(&target)?;
    let metadata = store.metadata()?;
    tracing::info!(store = %target.display(), store_id = %metadata.store_id, "created store");

    if args.seed {
        seed_demo_catalog(&store)?;
    }

    let config_path = resolve_config_path()?;
    let wrote_config = if config_path.exists() {
        false
    } else {
        write_config(&config_path, &LendingConfig::new(&target))?;
        true
    };

    let ui = ctx.ui_context();
    if ui.mode.is_json() {
        return print_json(&json!({
            "store": target.display().to_string(),
            "store_id": metadata.store_id,
            "format_version": metadata.format_version,
            "config": config_path.display().to_string(),
            "config_written": wrote_config,
            "seeded": args.seed,
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }

    let mut fields = vec![
        ("Store", target.display().to_string()),
        ("Store ID", metadata.store_id.to_string()),
    ];
    if wrote_config {
        fields.push(("Config", config_path.display().to_string()));
    }
    if args.seed {
        fields.push(("Seeded", format!("{} items, 1 member", DEMO_ITEMS.len())));
    }
    println!("{}", receipt(&ui, "Initialized lending store", &fields));

    if !wrote_config {
        println!("{}", kv(&ui, "Existing config", &config_path.display().to_string()));
        println!(
            "{}",
            hint(&ui, "Pass --store or set [store] path in the config to use this store.")
        );
    }
    Ok(())
}

fn seed_demo_catalog(store: &SqliteStore) -> anyhow::Result<()> {
    for (id, title, copies) in DEMO_ITEMS {
        store.register_item(&NewItem::new(id, title).with_copies(copies))?;
    }
    let (id, name) = DEMO_MEMBER;
    store.register_member(&NewMember::new(id, name, Category::Student))?;
    Ok(())
}
