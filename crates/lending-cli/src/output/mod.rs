//! Output formatting helpers for the CLI.
//!
//! JSON documents for `--json`, and table rows for the pretty and plain
//! renderers.

mod json;
mod text;

pub use json::{
    integrity_json, items_json, members_json, overdue_json, print_json, reservation_json,
    reservations_json, return_json, top_json, transaction_json, transactions_json,
};
pub use text::{
    history_columns, item_rows, loan_columns, member_rows, overdue_rows, reservation_rows,
    top_rows, transaction_rows, ITEM_COLUMNS, MEMBER_COLUMNS, OVERDUE_COLUMNS,
    RESERVATION_COLUMNS, TOP_COLUMNS,
};
