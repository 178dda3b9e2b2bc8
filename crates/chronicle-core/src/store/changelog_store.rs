//! Changelog storage layer.
//!
//! Provides SQLite-backed persistence for changelog entries. Listings are
//! always sorted by release date, newest first, so "latest release" never
//! depends on physical row order.

use crate::error::{ChronicleError, ChronicleResult, ErrorCode};
use crate::types::{ChangelogDraft, ChangelogEntry, ChangelogFields};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str =
    "SELECT id, title, content, version, release_date, created_at, updated_at FROM changelogs";

/// Trait for changelog storage operations.
///
/// Every operation is atomic on a single entry.
#[cfg_attr(test, mockall::automock)]
pub trait ChangelogStore: Send + Sync {
    /// Entries ordered by release date descending, sliced to a 1-indexed page.
    /// Returns the page items and the total number of entries.
    fn list_ordered(&self, page: u32, page_size: u32)
        -> ChronicleResult<(Vec<ChangelogEntry>, u64)>;

    /// Get an entry by ID.
    fn get(&self, id: i64) -> ChronicleResult<ChangelogEntry>;

    /// Validate and insert a new entry.
    fn create(&self, fields: &ChangelogFields) -> ChronicleResult<ChangelogEntry>;

    /// Merge fields over an existing entry, validate, and persist.
    fn update(&self, id: i64, fields: &ChangelogFields) -> ChronicleResult<ChangelogEntry>;

    /// Permanently remove an entry.
    fn delete(&self, id: i64) -> ChronicleResult<()>;

    /// Count all entries.
    fn count(&self) -> ChronicleResult<u64>;

    /// First entry (by ID) carrying the given version label.
    fn find_by_version(&self, version: &str) -> ChronicleResult<Option<ChangelogEntry>>;
}

/// SQLite-backed changelog store
pub struct SqliteChangelogStore {
    conn: Mutex<Connection>,
}

impl SqliteChangelogStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: impl AsRef<Path>) -> ChronicleResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> ChronicleResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> ChronicleResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ChronicleError::Internal("changelog store lock poisoned".to_string()))
    }

    fn init_schema(&self) -> ChronicleResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS changelogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                version TEXT NOT NULL,
                release_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_changelogs_release_date
                ON changelogs(release_date DESC, id);

            CREATE INDEX IF NOT EXISTS idx_changelogs_version
                ON changelogs(version);
        "#,
        )?;
        Ok(())
    }

    fn format_date(date: Option<NaiveDate>) -> Option<String> {
        date.map(|d| d.format(DATE_FORMAT).to_string())
    }

    fn parse_timestamp(value: &str) -> ChronicleResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ChronicleError::parse(ErrorCode::ParseInvalidTimestamp, e.to_string()))
    }

    fn row_to_entry(row: &rusqlite::Row<'_>) -> ChronicleResult<ChangelogEntry> {
        let id: i64 = row.get(0)?;
        let title: String = row.get(1)?;
        let content: String = row.get(2)?;
        let version: String = row.get(3)?;
        let release_date: Option<String> = row.get(4)?;
        let created_at: String = row.get(5)?;
        let updated_at: String = row.get(6)?;

        let release_date = release_date
            .map(|d| {
                NaiveDate::parse_from_str(&d, DATE_FORMAT)
                    .map_err(|e| ChronicleError::parse(ErrorCode::ParseInvalidDate, e.to_string()))
            })
            .transpose()?;

        Ok(ChangelogEntry {
            id,
            title,
            content,
            version,
            release_date,
            created_at: Self::parse_timestamp(&created_at)?,
            updated_at: Self::parse_timestamp(&updated_at)?,
        })
    }

    fn fetch(conn: &Connection, id: i64) -> ChronicleResult<Option<ChangelogEntry>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        stmt.query_row(params![id], |row| Ok(Self::row_to_entry(row)))
            .optional()?
            .transpose()
    }

    fn insert(conn: &Connection, draft: &ChangelogDraft) -> ChronicleResult<ChangelogEntry> {
        let now = Utc::now();
        conn.execute(
            r#"INSERT INTO changelogs
               (title, content, version, release_date, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                draft.title,
                draft.content,
                draft.version,
                Self::format_date(draft.release_date),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(ChangelogEntry {
            id: conn.last_insert_rowid(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            version: draft.version.clone(),
            release_date: draft.release_date,
            created_at: now,
            updated_at: now,
        })
    }
}

impl ChangelogStore for SqliteChangelogStore {
    fn list_ordered(
        &self,
        page: u32,
        page_size: u32,
    ) -> ChronicleResult<(Vec<ChangelogEntry>, u64)> {
        if page_size == 0 {
            return Err(ChronicleError::validation("page size must be at least 1"));
        }
        let page = page.max(1);
        let offset = (u64::from(page) - 1).saturating_mul(u64::from(page_size));
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let conn = self.lock()?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM changelogs", [], |row| row.get(0))?;

        // Undated entries sort after dated ones; equal dates keep insertion order.
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY release_date IS NULL, release_date DESC, id ASC LIMIT ?1 OFFSET ?2",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![i64::from(page_size), offset], |row| {
            Ok(Self::row_to_entry(row))
        })?;

        let items = rows
            .map(|r| r.map_err(ChronicleError::from).and_then(|inner| inner))
            .collect::<ChronicleResult<Vec<_>>>()?;

        Ok((items, total as u64))
    }

    fn get(&self, id: i64) -> ChronicleResult<ChangelogEntry> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)?.ok_or_else(|| ChronicleError::not_found(id))
    }

    fn create(&self, fields: &ChangelogFields) -> ChronicleResult<ChangelogEntry> {
        let draft = fields.to_draft()?;
        let conn = self.lock()?;
        let entry = Self::insert(&conn, &draft)?;
        debug!(id = entry.id, version = %entry.version, "Created changelog");
        Ok(entry)
    }

    fn update(&self, id: i64, fields: &ChangelogFields) -> ChronicleResult<ChangelogEntry> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let existing = Self::fetch(&tx, id)?.ok_or_else(|| ChronicleError::not_found(id))?;
        let draft = fields.merge_onto(&existing)?;
        let now = Utc::now();

        tx.execute(
            r#"UPDATE changelogs
               SET title = ?1, content = ?2, version = ?3, release_date = ?4, updated_at = ?5
               WHERE id = ?6"#,
            params![
                draft.title,
                draft.content,
                draft.version,
                Self::format_date(draft.release_date),
                now.to_rfc3339(),
                id,
            ],
        )?;
        tx.commit()?;

        debug!(id, version = %draft.version, "Updated changelog");
        Ok(ChangelogEntry {
            id,
            title: draft.title,
            content: draft.content,
            version: draft.version,
            release_date: draft.release_date,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    fn delete(&self, id: i64) -> ChronicleResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM changelogs WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(ChronicleError::not_found(id));
        }
        debug!(id, "Deleted changelog");
        Ok(())
    }

    fn count(&self) -> ChronicleResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM changelogs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn find_by_version(&self, version: &str) -> ChronicleResult<Option<ChangelogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE version = ?1 ORDER BY id ASC LIMIT 1",
            SELECT_COLUMNS
        ))?;
        stmt.query_row(params![version], |row| Ok(Self::row_to_entry(row)))
            .optional()?
            .transpose()
    }
}
