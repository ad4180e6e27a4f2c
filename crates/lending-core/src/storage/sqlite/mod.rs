//! SQLite storage backend.
//!
//! One connection lives behind a mutex, so units of work are serialized
//! within the process. Each unit runs inside `BEGIN IMMEDIATE`, which takes
//! the database write lock up front and serializes writers across processes
//! too; contending writers wait up to the busy timeout.

mod row;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{LendingError, Result};
use crate::storage::traits::{
    CatalogStore, LendingStore, MembershipStore, ReservationQueue, TransactionLedger, UnitOfWork,
};
use crate::storage::types::{
    Item, Member, NewItem, NewMember, NewReservation, NewTransaction, Reservation, ReservationId,
    ReservationStatus, StoreMetadata, Transaction, TransactionFilter, TransactionStatus, TxnId,
};

use row::{encode_time, ItemRow, MemberRow, ReservationRow, TransactionRow};

const FORMAT_VERSION: &str = "1";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        total_copies INTEGER NOT NULL CHECK (total_copies >= 0),
        available_copies INTEGER NOT NULL
            CHECK (available_copies >= 0 AND available_copies <= total_copies),
        borrowed_count INTEGER NOT NULL DEFAULT 0,
        seq INTEGER NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS members (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT,
        seq INTEGER NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS transactions (
        txn_id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id TEXT NOT NULL,
        item_id TEXT NOT NULL,
        issue_time TEXT NOT NULL,
        due_time TEXT NOT NULL,
        return_time TEXT,
        fine_amount INTEGER NOT NULL DEFAULT 0 CHECK (fine_amount >= 0),
        status TEXT NOT NULL CHECK (status IN ('borrowed', 'returned')),

        FOREIGN KEY (member_id) REFERENCES members(id),
        FOREIGN KEY (item_id) REFERENCES items(id)
    );

    CREATE INDEX IF NOT EXISTS transactions_open_by_member
    ON transactions (member_id)
    WHERE status = 'borrowed';

    -- Reservations are never deleted; fulfilled rows stay as an audit trail
    CREATE TABLE IF NOT EXISTS reservations (
        res_id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id TEXT NOT NULL,
        member_id TEXT NOT NULL,
        created_time TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('waiting', 'fulfilled')),

        FOREIGN KEY (item_id) REFERENCES items(id),
        FOREIGN KEY (member_id) REFERENCES members(id)
    );

    CREATE INDEX IF NOT EXISTS reservations_waiting_by_item
    ON reservations (item_id, created_time, res_id)
    WHERE status = 'waiting';
"#;

/// SQLite-backed lending store.
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new store file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::InvalidInput` if the file already exists.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(LendingError::InvalidInput(format!(
                "Store already exists at {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure_connection(&conn, true)?;
        Self::init_schema(&conn)?;
        info!(path = %path.display(), "created lending store");

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open an existing store file.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::StoreNotFound` if the file does not exist and
    /// `LendingError::StoreUnavailable` if it is not a lending store.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LendingError::StoreNotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        Self::configure_connection(&conn, true)?;
        Self::verify_format(&conn)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn, false)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Path of the backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write a consistent snapshot of the store to `destination`.
    ///
    /// The snapshot is written next to the destination first and renamed
    /// into place, so a failed backup never leaves a partial file behind.
    pub fn backup_to(&self, destination: &Path) -> Result<()> {
        let temp_path = crate::fs::temp_sibling(destination)
            .map_err(|e| LendingError::InvalidInput(e.to_string()))?;

        {
            let conn = self.lock_conn()?;
            if let Err(err) = conn.execute(
                "VACUUM INTO ?1",
                params![temp_path.to_string_lossy().to_string()],
            ) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(err.into());
            }
        }

        crate::fs::rename_with_fallback(&temp_path, destination).map_err(|e| {
            LendingError::StoreUnavailable(format!("Backup rename failed: {}", e))
        })?;
        info!(destination = %destination.display(), "wrote store backup");
        Ok(())
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LendingError::StoreUnavailable("SQLite connection poisoned".to_string()))
    }

    fn configure_connection(conn: &Connection, file_backed: bool) -> Result<()> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        if file_backed {
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }
        Ok(())
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;

        let store_id = Uuid::new_v4().to_string();
        let created_at = encode_time(Utc::now());
        for (key, value) in [
            ("format_version", FORMAT_VERSION),
            ("store_id", store_id.as_str()),
            ("created_at", created_at.as_str()),
        ] {
            conn.execute(
                "INSERT OR IGNORE INTO meta (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        Ok(())
    }

    fn verify_format(conn: &Connection) -> Result<()> {
        let has_meta: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'meta'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_meta.is_none() {
            return Err(LendingError::StoreUnavailable(
                "File is not a lending store".to_string(),
            ));
        }

        let version = Self::meta_value(conn, "format_version")?;
        if version != FORMAT_VERSION {
            return Err(LendingError::StoreUnavailable(format!(
                "Unsupported store format version {} (expected {})",
                version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    fn meta_value(conn: &Connection, key: &str) -> Result<String> {
        conn.query_row("SELECT value FROM meta WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?
        .ok_or_else(|| LendingError::StoreUnavailable(format!("Missing metadata key: {}", key)))
    }
}

fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(LendingError::InvalidInput(format!("{} ID must not be empty", kind)));
    }
    Ok(())
}

impl LendingStore for SqliteStore {
    type Unit<'a> = SqliteUnit<'a>;

    fn begin(&self) -> Result<SqliteUnit<'_>> {
        SqliteUnit::new(self.lock_conn()?, "BEGIN IMMEDIATE")
    }

    /// Deferred transaction: under WAL it reads a snapshot and never blocks
    /// writers in other processes.
    fn begin_read(&self) -> Result<SqliteUnit<'_>> {
        SqliteUnit::new(self.lock_conn()?, "BEGIN DEFERRED")
    }

    fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.lock_conn()?;

        let format_version = Self::meta_value(&conn, "format_version")?;
        let store_id = Uuid::parse_str(&Self::meta_value(&conn, "store_id")?)
            .map_err(|e| LendingError::StoreUnavailable(format!("Invalid store_id: {}", e)))?;
        let created_at = DateTime::parse_from_rfc3339(&Self::meta_value(&conn, "created_at")?)
            .map_err(|e| {
                LendingError::StoreUnavailable(format!("Invalid created_at timestamp: {}", e))
            })?
            .with_timezone(&Utc);

        Ok(StoreMetadata {
            format_version,
            store_id,
            created_at,
        })
    }

    fn register_item(&self, item: &NewItem) -> Result<Item> {
        require_id("Item", &item.id)?;
        let conn = self.lock_conn()?;

        let inserted = conn.execute(
            r#"
            INSERT INTO items (id, title, total_copies, available_copies, borrowed_count, seq)
            VALUES (?1, ?2, ?3, ?3, 0, (SELECT COALESCE(MAX(seq), 0) + 1 FROM items))
            ON CONFLICT(id) DO NOTHING
            "#,
            params![item.id, item.title, item.copies],
        )?;
        if inserted == 0 {
            return Err(LendingError::InvalidInput(format!(
                "Item {} already exists",
                item.id
            )));
        }

        Ok(Item {
            id: item.id.clone(),
            title: item.title.clone(),
            total_copies: item.copies,
            available_copies: item.copies,
            borrowed_count: 0,
        })
    }

    fn register_member(&self, member: &NewMember) -> Result<Member> {
        require_id("Member", &member.id)?;
        let conn = self.lock_conn()?;

        let inserted = conn.execute(
            r#"
            INSERT INTO members (id, name, category, seq)
            VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(seq), 0) + 1 FROM members))
            ON CONFLICT(id) DO NOTHING
            "#,
            params![
                member.id,
                member.name,
                member.category.map(|category| category.as_str())
            ],
        )?;
        if inserted == 0 {
            return Err(LendingError::InvalidInput(format!(
                "Member {} already exists",
                member.id
            )));
        }

        Ok(Member {
            id: member.id.clone(),
            name: member.name.clone(),
            category: member.category,
        })
    }

    fn list_members(&self) -> Result<Vec<Member>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM members ORDER BY seq",
            MemberRow::COLUMNS
        ))?;
        let rows = stmt.query_map([], MemberRow::from_row)?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row?.into());
        }
        Ok(members)
    }
}

/// A unit of work over the SQLite connection.
///
/// Holds the connection lock for its whole lifetime; dropping it without
/// committing rolls the database transaction back.
pub struct SqliteUnit<'a> {
    conn: MutexGuard<'a, Connection>,
    active: bool,
}

impl<'a> SqliteUnit<'a> {
    fn new(conn: MutexGuard<'a, Connection>, begin: &str) -> Result<Self> {
        conn.execute_batch(begin)?;
        Ok(Self { conn, active: true })
    }
}

impl Drop for SqliteUnit<'_> {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = self.conn.execute_batch("ROLLBACK") {
                warn!(error = %err, "rollback failed");
            }
        }
    }
}

impl UnitOfWork for SqliteUnit<'_> {
    fn commit(mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        self.active = false;
        Ok(())
    }
}

impl CatalogStore for SqliteUnit<'_> {
    fn get_item(&self, id: &str) -> Result<Option<Item>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?1", ItemRow::COLUMNS),
                [id],
                ItemRow::from_row,
            )
            .optional()?
            .map(Item::try_from)
            .transpose()
    }

    fn adjust_availability(&mut self, id: &str, delta: i32) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE items
            SET available_copies = available_copies + ?1
            WHERE id = ?2
              AND available_copies + ?1 BETWEEN 0 AND total_copies
            "#,
            params![delta, id],
        )?;
        if changed == 1 {
            return Ok(());
        }

        match self.get_item(id)? {
            None => Err(LendingError::UnknownItem(id.to_string())),
            Some(item) => Err(LendingError::Integrity(format!(
                "Adjusting {} by {} would leave {} of {} copies available",
                id,
                delta,
                i64::from(item.available_copies) + i64::from(delta),
                item.total_copies
            ))),
        }
    }

    fn increment_borrowed_count(&mut self, id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE items SET borrowed_count = borrowed_count + 1 WHERE id = ?1",
            [id],
        )?;
        if changed == 0 {
            return Err(LendingError::UnknownItem(id.to_string()));
        }
        Ok(())
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM items ORDER BY seq",
            ItemRow::COLUMNS
        ))?;
        let rows = stmt.query_map([], ItemRow::from_row)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?.try_into()?);
        }
        Ok(items)
    }
}

impl MembershipStore for SqliteUnit<'_> {
    fn get_member(&self, id: &str) -> Result<Option<Member>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM members WHERE id = ?1", MemberRow::COLUMNS),
                [id],
                MemberRow::from_row,
            )
            .optional()?;
        Ok(row.map(Member::from))
    }
}

impl TransactionLedger for SqliteUnit<'_> {
    fn insert_transaction(&mut self, txn: &NewTransaction) -> Result<Transaction> {
        self.conn.execute(
            r#"
            INSERT INTO transactions (member_id, item_id, issue_time, due_time, fine_amount, status)
            VALUES (?1, ?2, ?3, ?4, 0, 'borrowed')
            "#,
            params![
                txn.member_id,
                txn.item_id,
                encode_time(txn.issue_time),
                encode_time(txn.due_time)
            ],
        )?;
        let txn_id = TxnId(self.conn.last_insert_rowid());

        Ok(Transaction {
            txn_id,
            member_id: txn.member_id.clone(),
            item_id: txn.item_id.clone(),
            issue_time: txn.issue_time,
            due_time: txn.due_time,
            return_time: None,
            fine_amount: 0,
            status: TransactionStatus::Borrowed,
        })
    }

    fn get_transaction(&self, id: TxnId) -> Result<Option<Transaction>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE txn_id = ?1",
                    TransactionRow::COLUMNS
                ),
                [id.0],
                TransactionRow::from_row,
            )
            .optional()?
            .map(Transaction::try_from)
            .transpose()
    }

    fn close_transaction(
        &mut self,
        id: TxnId,
        return_time: DateTime<Utc>,
        fine_amount: i64,
    ) -> Result<Transaction> {
        let changed = self.conn.execute(
            r#"
            UPDATE transactions
            SET return_time = ?2, fine_amount = ?3, status = 'returned'
            WHERE txn_id = ?1 AND status = 'borrowed'
            "#,
            params![id.0, encode_time(return_time), fine_amount],
        )?;
        if changed == 0 {
            return match self.get_transaction(id)? {
                None => Err(LendingError::UnknownTransaction(id)),
                Some(_) => Err(LendingError::AlreadyReturned(id)),
            };
        }

        self.get_transaction(id)?.ok_or_else(|| {
            LendingError::StoreUnavailable(format!("Transaction {} vanished after update", id))
        })
    }

    fn count_open_for_member(&self, member_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE member_id = ?1 AND status = 'borrowed'",
            [member_id],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| LendingError::StoreUnavailable(format!("Invalid count: {}", count)))
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref member_id) = filter.member_id {
            conditions.push("member_id = ?");
            params.push(Box::new(member_id.clone()));
        }
        if let Some(ref item_id) = filter.item_id {
            conditions.push("item_id = ?");
            params.push(Box::new(item_id.clone()));
        }
        if filter.open_only {
            conditions.push("status = 'borrowed'");
        }

        let mut query = format!("SELECT {} FROM transactions", TransactionRow::COLUMNS);
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY txn_id");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            TransactionRow::from_row,
        )?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row?.try_into()?);
        }
        Ok(transactions)
    }
}

impl ReservationQueue for SqliteUnit<'_> {
    fn insert_reservation(&mut self, reservation: &NewReservation) -> Result<Reservation> {
        self.conn.execute(
            r#"
            INSERT INTO reservations (item_id, member_id, created_time, status)
            VALUES (?1, ?2, ?3, 'waiting')
            "#,
            params![
                reservation.item_id,
                reservation.member_id,
                encode_time(reservation.created_time)
            ],
        )?;
        let res_id = ReservationId(self.conn.last_insert_rowid());

        Ok(Reservation {
            res_id,
            item_id: reservation.item_id.clone(),
            member_id: reservation.member_id.clone(),
            created_time: reservation.created_time,
            status: ReservationStatus::Waiting,
        })
    }

    fn next_waiting(&self, item_id: &str) -> Result<Option<Reservation>> {
        self.conn
            .query_row(
                &format!(
                    r#"
                    SELECT {} FROM reservations
                    WHERE item_id = ?1 AND status = 'waiting'
                    ORDER BY created_time, res_id
                    LIMIT 1
                    "#,
                    ReservationRow::COLUMNS
                ),
                [item_id],
                ReservationRow::from_row,
            )
            .optional()?
            .map(Reservation::try_from)
            .transpose()
    }

    fn mark_fulfilled(&mut self, id: ReservationId) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE reservations SET status = 'fulfilled' WHERE res_id = ?1 AND status = 'waiting'",
            [id.0],
        )?;
        if changed == 0 {
            return Err(LendingError::Integrity(format!(
                "Reservation {} is not waiting",
                id
            )));
        }
        Ok(())
    }

    fn list_reservations(&self, item_id: Option<&str>) -> Result<Vec<Reservation>> {
        let mut query = format!("SELECT {} FROM reservations", ReservationRow::COLUMNS);
        if item_id.is_some() {
            query.push_str(" WHERE item_id = ?1");
        }
        query.push_str(" ORDER BY created_time, res_id");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = match item_id {
            Some(item_id) => stmt.query_map([item_id], ReservationRow::from_row)?,
            None => stmt.query_map([], ReservationRow::from_row)?,
        };

        let mut reservations = Vec::new();
        for row in rows {
            reservations.push(row?.try_into()?);
        }
        Ok(reservations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Category;
    use chrono::{Duration, TimeZone};

    fn seeded() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .register_item(&NewItem::new("b001", "Clean Code").with_copies(2))
            .unwrap();
        store
            .register_member(&NewMember::new("m001", "Alice", Category::Student))
            .unwrap();
        store
    }

    fn new_loan(at: DateTime<Utc>) -> NewTransaction {
        NewTransaction {
            member_id: "m001".to_string(),
            item_id: "b001".to_string(),
            issue_time: at,
            due_time: at + Duration::days(14),
        }
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let store = seeded();
        let err = store
            .register_item(&NewItem::new("b001", "Again"))
            .unwrap_err();
        assert!(matches!(err, LendingError::InvalidInput(_)));
    }

    #[test]
    fn test_dropped_unit_rolls_back() {
        let store = seeded();
        {
            let mut unit = store.begin().unwrap();
            unit.adjust_availability("b001", -1).unwrap();
        }
        let unit = store.begin().unwrap();
        assert_eq!(unit.get_item("b001").unwrap().unwrap().available_copies, 2);
    }

    #[test]
    fn test_committed_unit_persists() {
        let store = seeded();
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();

        let mut unit = store.begin().unwrap();
        let txn = unit.insert_transaction(&new_loan(at)).unwrap();
        unit.commit().unwrap();

        let unit = store.begin().unwrap();
        let stored = unit.get_transaction(txn.txn_id).unwrap().unwrap();
        assert_eq!(stored, txn);
        assert_eq!(unit.count_open_for_member("m001").unwrap(), 1);
    }

    #[test]
    fn test_availability_bounds_enforced() {
        let store = seeded();
        let mut unit = store.begin().unwrap();
        assert!(matches!(
            unit.adjust_availability("b001", 1),
            Err(LendingError::Integrity(_))
        ));
        assert!(matches!(
            unit.adjust_availability("nope", -1),
            Err(LendingError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_close_transaction_only_once() {
        let store = seeded();
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        let mut unit = store.begin().unwrap();
        let txn = unit.insert_transaction(&new_loan(at)).unwrap();

        let closed = unit.close_transaction(txn.txn_id, at, 0).unwrap();
        assert_eq!(closed.status, TransactionStatus::Returned);
        assert_eq!(closed.return_time, Some(at));
        assert!(matches!(
            unit.close_transaction(txn.txn_id, at, 0),
            Err(LendingError::AlreadyReturned(_))
        ));
        assert!(matches!(
            unit.close_transaction(TxnId(999), at, 0),
            Err(LendingError::UnknownTransaction(_))
        ));
    }

    #[test]
    fn test_next_waiting_breaks_ties_by_id() {
        let store = seeded();
        store
            .register_member(&NewMember::new("m002", "Bob", Category::Staff))
            .unwrap();
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();

        let mut unit = store.begin().unwrap();
        let first = unit
            .insert_reservation(&NewReservation {
                item_id: "b001".to_string(),
                member_id: "m002".to_string(),
                created_time: at,
            })
            .unwrap();
        unit.insert_reservation(&NewReservation {
            item_id: "b001".to_string(),
            member_id: "m001".to_string(),
            created_time: at,
        })
        .unwrap();

        let next = unit.next_waiting("b001").unwrap().unwrap();
        assert_eq!(next.res_id, first.res_id);

        unit.mark_fulfilled(first.res_id).unwrap();
        assert!(unit.mark_fulfilled(first.res_id).is_err());
        assert_eq!(
            unit.next_waiting("b001").unwrap().unwrap().member_id,
            "m001"
        );
    }

    #[test]
    fn test_metadata() {
        let store = SqliteStore::open_in_memory().unwrap();
        let metadata = store.metadata().unwrap();
        assert_eq!(metadata.format_version, FORMAT_VERSION);
        assert!(!metadata.store_id.is_nil());
    }
}
