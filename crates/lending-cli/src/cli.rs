use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use lending_core::{Category, VERSION};

use crate::constants::DEFAULT_TOP_LIMIT;

/// Lending - circulation desk for a catalog of physical items
#[derive(Parser)]
#[command(name = "lending")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the lending store
    #[arg(short, long, global = true, env = "LENDING_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log engine activity to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols and table borders
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Register the demo catalog and a student member
    #[arg(long)]
    pub seed: bool,
}

/// Arguments for `item add`
#[derive(Args)]
pub struct ItemAddArgs {
    /// Item ID (e.g., b004)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Display title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Number of identical copies
    #[arg(long, default_value_t = 1)]
    pub copies: u32,
}

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// Register a catalog item
    Add(ItemAddArgs),

    /// List the catalog with copy counts
    List,
}

/// Arguments for `member add`
#[derive(Args)]
pub struct MemberAddArgs {
    /// Member ID (e.g., m002)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Display name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Lending category (student, faculty, staff); omit for no lending rights
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
}

#[derive(Subcommand)]
pub enum MemberSubcommand {
    /// Register a member
    Add(MemberAddArgs),

    /// List members
    List,
}

/// Arguments for the `issue` and `reserve` commands
#[derive(Args)]
pub struct LoanRequestArgs {
    /// Member ID
    #[arg(value_name = "MEMBER")]
    pub member: String,

    /// Item ID
    #[arg(value_name = "ITEM")]
    pub item: String,
}

/// Arguments for the `return` command
#[derive(Args)]
pub struct ReturnArgs {
    /// Transaction ID (e.g., TX12 or 12)
    #[arg(value_name = "TXN")]
    pub txn: String,

    /// Self-service return: refuse unless this member holds the loan
    #[arg(long, value_name = "ID")]
    pub member: Option<String>,
}

/// Arguments for the `loans` command
#[derive(Args)]
pub struct LoansArgs {
    /// Only loans of this member
    #[arg(long, value_name = "ID")]
    pub member: Option<String>,

    /// Include returned loans (requires --member)
    #[arg(long, requires = "member")]
    pub history: bool,
}

/// Arguments for the `reservations` command
#[derive(Args)]
pub struct ReservationsArgs {
    /// Only reservations for this item
    #[arg(long, value_name = "ID")]
    pub item: Option<String>,
}

/// Arguments for `report top`
#[derive(Args)]
pub struct TopArgs {
    /// Number of items to show
    #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
    pub limit: usize,
}

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Open loans past their due date, with the fine owed so far
    Overdue,

    /// Most borrowed items
    Top(TopArgs),
}

/// Arguments for the `backup` command
#[derive(Args)]
pub struct BackupArgs {
    /// Destination path
    #[arg(value_name = "DEST")]
    pub destination: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new lending store and config
    Init(InitArgs),

    /// Manage catalog items
    #[command(subcommand)]
    Item(ItemSubcommand),

    /// Manage members
    #[command(subcommand)]
    Member(MemberSubcommand),

    /// Lend an item to a member
    Issue(LoanRequestArgs),

    /// Return a loan and hand the copy to the next reservation
    Return(ReturnArgs),

    /// Join the wait-list for an item with no copies on the shelf
    Reserve(LoanRequestArgs),

    /// List open loans, or a member's full history
    Loans(LoansArgs),

    /// List reservations in queue order
    Reservations(ReservationsArgs),

    /// Circulation reports
    #[command(subcommand)]
    Report(ReportSubcommand),

    /// Check store integrity
    Check,

    /// Backup the store
    Backup(BackupArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|e: lending_core::LendingError| e.to_string())
}
