//! Lending CLI - circulation desk for a catalog of physical items
//!
//! This is the command-line interface for Lending. It wires the core engine
//! to a SQLite store and renders results for terminals, pipes, and `--json`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::AppContext;
use cli::{Cli, Commands, ItemSubcommand, MemberSubcommand, ReportSubcommand};
use commands::{catalog, circulation, init, loans, maintenance, misc, reports};
use constants::exit_codes;
use errors::classify;
use ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = AppContext::new(&cli);
    if let Err(e) = run(&ctx) {
        let ui_ctx = ctx.ui_context();
        match classify(&e) {
            Some(cli_err) => {
                print_error(&ui_ctx, &cli_err.to_string(), cli_err.hint());
                std::process::exit(cli_err.exit_code());
            }
            None => {
                print_error(&ui_ctx, &format!("{:#}", e), None);
                std::process::exit(exit_codes::GENERAL);
            }
        }
    }
}

/// Logs go to stderr; RUST_LOG overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(ctx: &AppContext) -> anyhow::Result<()> {
    match &ctx.cli().command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args),
        Some(Commands::Item(ItemSubcommand::Add(args))) => catalog::handle_item_add(ctx, args),
        Some(Commands::Item(ItemSubcommand::List)) => catalog::handle_item_list(ctx),
        Some(Commands::Member(MemberSubcommand::Add(args))) => {
            catalog::handle_member_add(ctx, args)
        }
        Some(Commands::Member(MemberSubcommand::List)) => catalog::handle_member_list(ctx),
        Some(Commands::Issue(args)) => circulation::handle_issue(ctx, args),
        Some(Commands::Return(args)) => circulation::handle_return(ctx, args),
        Some(Commands::Reserve(args)) => circulation::handle_reserve(ctx, args),
        Some(Commands::Loans(args)) => loans::handle_loans(ctx, args),
        Some(Commands::Reservations(args)) => loans::handle_reservations(ctx, args),
        Some(Commands::Report(ReportSubcommand::Overdue)) => reports::handle_overdue(ctx),
        Some(Commands::Report(ReportSubcommand::Top(args))) => reports::handle_top(ctx, args),
        Some(Commands::Check) => maintenance::handle_check(ctx),
        Some(Commands::Backup(args)) => maintenance::handle_backup(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args.shell),
        None => {
            println!("Lending CLI v{}", lending_core::VERSION);
            println!();
            println!("Run `lending --help` for usage information.");
            Ok(())
        }
    }
}
