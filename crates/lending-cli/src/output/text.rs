//! Table rows for pretty and plain output.

use lending_core::storage::{BorrowedCount, Item, Member, OverdueEntry, Reservation, Transaction};

use crate::ui::{format_date, format_datetime, format_fine, truncate, Column};

const TITLE_WIDTH: usize = 40;

pub const ITEM_COLUMNS: [Column; 5] = [
    Column::new("ID"),
    Column::new("Title"),
    Column::new("Available"),
    Column::new("Copies"),
    Column::new("Borrowed"),
];

pub const MEMBER_COLUMNS: [Column; 3] = [
    Column::new("ID"),
    Column::new("Name"),
    Column::new("Category"),
];

pub const RESERVATION_COLUMNS: [Column; 5] = [
    Column::new("Res"),
    Column::new("Item"),
    Column::new("Member"),
    Column::new("Created"),
    Column::new("Status"),
];

pub const OVERDUE_COLUMNS: [Column; 6] = [
    Column::new("Txn"),
    Column::new("Member"),
    Column::new("Item"),
    Column::new("Due"),
    Column::new("Days"),
    Column::new("Fine"),
];

pub const TOP_COLUMNS: [Column; 3] = [
    Column::new("Item"),
    Column::new("Title"),
    Column::new("Borrowed"),
];

/// Columns for open loans.
pub fn loan_columns() -> Vec<Column> {
    vec![
        Column::new("Txn"),
        Column::new("Member"),
        Column::new("Item"),
        Column::new("Issued"),
        Column::new("Due"),
    ]
}

/// Columns for a member history, which includes closed loans.
pub fn history_columns() -> Vec<Column> {
    let mut columns = loan_columns();
    columns.push(Column::new("Returned"));
    columns.push(Column::new("Fine"));
    columns
}

pub fn transaction_rows(txns: &[Transaction], history: bool, pretty: bool) -> Vec<Vec<String>> {
    txns.iter()
        .map(|txn| {
            let mut row = vec![
                txn.txn_id.to_string(),
                txn.member_id.clone(),
                txn.item_id.clone(),
                format_datetime(&txn.issue_time, pretty),
                format_date(&txn.due_time),
            ];
            if history {
                row.push(
                    txn.return_time
                        .map(|at| format_datetime(&at, pretty))
                        .unwrap_or_else(|| "-".to_string()),
                );
                row.push(format_fine(txn.fine_amount));
            }
            row
        })
        .collect()
}

pub fn item_rows(items: &[Item], pretty: bool) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| {
            let title = if pretty {
                truncate(&item.title, TITLE_WIDTH)
            } else {
                item.title.replace(' ', "_")
            };
            vec![
                item.id.clone(),
                title,
                item.available_copies.to_string(),
                item.total_copies.to_string(),
                item.borrowed_count.to_string(),
            ]
        })
        .collect()
}

pub fn member_rows(members: &[Member], pretty: bool) -> Vec<Vec<String>> {
    members
        .iter()
        .map(|member| {
            let name = if pretty {
                member.name.clone()
            } else {
                member.name.replace(' ', "_")
            };
            vec![
                member.id.clone(),
                name,
                member
                    .category
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

pub fn reservation_rows(reservations: &[Reservation], pretty: bool) -> Vec<Vec<String>> {
    reservations
        .iter()
        .map(|reservation| {
            vec![
                reservation.res_id.to_string(),
                reservation.item_id.clone(),
                reservation.member_id.clone(),
                format_datetime(&reservation.created_time, pretty),
                reservation.status.as_str().to_string(),
            ]
        })
        .collect()
}

pub fn overdue_rows(entries: &[OverdueEntry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            vec![
                entry.txn_id.to_string(),
                entry.member_id.clone(),
                entry.item_id.clone(),
                format_date(&entry.due_time),
                entry.overdue_days.to_string(),
                format_fine(entry.fine),
            ]
        })
        .collect()
}

pub fn top_rows(counts: &[BorrowedCount], pretty: bool) -> Vec<Vec<String>> {
    counts
        .iter()
        .map(|count| {
            let title = if pretty {
                truncate(&count.title, TITLE_WIDTH)
            } else {
                count.title.replace(' ', "_")
            };
            vec![count.item_id.clone(), title, count.borrowed_count.to_string()]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_rows_plain_keeps_fields_whitespace_free() {
        let items = vec![Item {
            id: "b003".to_string(),
            title: "Introduction to Algorithms".to_string(),
            total_copies: 1,
            available_copies: 0,
            borrowed_count: 2,
        }];
        let rows = item_rows(&items, false);
        assert_eq!(
            rows[0],
            vec!["b003", "Introduction_to_Algorithms", "0", "1", "2"]
        );
    }

    #[test]
    fn test_history_columns_extend_loan_columns() {
        assert_eq!(loan_columns().len() + 2, history_columns().len());
    }

    #[test]
    fn test_member_without_category() {
        let members = vec![Member {
            id: "m009".to_string(),
            name: "Guest".to_string(),
            category: None,
        }];
        assert_eq!(member_rows(&members, true)[0][2], "-");
    }
}
