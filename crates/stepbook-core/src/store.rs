//! Journal storage for Stepbook
//!
//! Handles all SQLite operations for the practice journal: schema
//! creation, upserts, and snapshot queries. The analytics engine never
//! touches this layer; it consumes the snapshots produced here.

use crate::{Difficulty, MediaKind, MediaRef, Mood, PracticeRecord};
use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Record not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub struct JournalStore {
    conn: Connection,
}

impl JournalStore {
    /// Open or create a journal at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open the default journal
    pub fn open_default() -> Result<Self> {
        let path = crate::journal_path();
        info!("Opening journal at {:?}", path);
        Self::open(path)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS practice_records (
                id TEXT PRIMARY KEY,
                occurred_at INTEGER NOT NULL,
                style TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                studio TEXT NOT NULL,
                instructor TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                mood TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                music_title TEXT NOT NULL DEFAULT '',
                media_url TEXT,
                media_kind TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_practice_occurred ON practice_records(occurred_at);
            CREATE INDEX IF NOT EXISTS idx_practice_style ON practice_records(style);
            "#,
        )?;

        Ok(())
    }

    /// Insert a record, or replace an existing one with the same id.
    /// Records are immutable; an edit is a replace-by-identity.
    pub fn upsert_record(&self, record: &PracticeRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO practice_records
                (id, occurred_at, style, duration_minutes, studio, instructor,
                 difficulty, mood, notes, music_title, media_url, media_kind)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                occurred_at = excluded.occurred_at,
                style = excluded.style,
                duration_minutes = excluded.duration_minutes,
                studio = excluded.studio,
                instructor = excluded.instructor,
                difficulty = excluded.difficulty,
                mood = excluded.mood,
                notes = excluded.notes,
                music_title = excluded.music_title,
                media_url = excluded.media_url,
                media_kind = excluded.media_kind
            "#,
            params![
                record.id.to_string(),
                record.occurred_at.and_utc().timestamp(),
                record.style,
                record.duration_minutes,
                record.studio,
                record.instructor,
                record.difficulty.as_str(),
                record.mood.as_str(),
                record.notes,
                record.music_title,
                record.media.as_ref().map(|m| m.url.as_str()),
                record.media.as_ref().map(|m| m.kind.as_str()),
            ],
        )?;

        Ok(())
    }

    /// Fetch a single record by id
    pub fn get_record(&self, id: Uuid) -> Result<PracticeRecord> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, occurred_at, style, duration_minutes, studio, instructor,
                   difficulty, mood, notes, music_title, media_url, media_kind
            FROM practice_records
            WHERE id = ?1
            "#,
        )?;

        match stmt.query_row(params![id.to_string()], row_to_record) {
            Ok(record) => Ok(record),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::from(e)),
        }
    }

    /// Delete a record by id
    pub fn delete_record(&self, id: Uuid) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM practice_records WHERE id = ?1",
            params![id.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Full snapshot of the journal, ascending by occurrence time
    pub fn all_records(&self) -> Result<Vec<PracticeRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, occurred_at, style, duration_minutes, studio, instructor,
                   difficulty, mood, notes, music_title, media_url, media_kind
            FROM practice_records
            ORDER BY occurred_at
            "#,
        )?;

        let rows = stmt.query_map([], row_to_record)?;
        rows.collect::<SqliteResult<Vec<_>>>().map_err(StoreError::from)
    }

    /// Records for one calendar day, ascending by occurrence time
    /// (the ordering the detail view relies on)
    pub fn records_for_day(&self, day: NaiveDate) -> Result<Vec<PracticeRecord>> {
        let start = crate::range::day_start(day).and_utc().timestamp();
        let end = crate::range::day_end(day).and_utc().timestamp();

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, occurred_at, style, duration_minutes, studio, instructor,
                   difficulty, mood, notes, music_title, media_url, media_kind
            FROM practice_records
            WHERE occurred_at >= ?1 AND occurred_at <= ?2
            ORDER BY occurred_at
            "#,
        )?;

        let rows = stmt.query_map(params![start, end], row_to_record)?;
        rows.collect::<SqliteResult<Vec<_>>>().map_err(StoreError::from)
    }

    /// Number of records in the journal
    pub fn record_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM practice_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn row_to_record(row: &Row<'_>) -> SqliteResult<PracticeRecord> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let ts: i64 = row.get(1)?;
    let difficulty: String = row.get(6)?;
    let mood: String = row.get(7)?;
    let media_url: Option<String> = row.get(10)?;
    let media_kind: Option<String> = row.get(11)?;

    let media = match (media_url, media_kind.as_deref().and_then(MediaKind::parse)) {
        (Some(url), Some(kind)) => Some(MediaRef { url, kind }),
        _ => None,
    };

    Ok(PracticeRecord {
        id,
        occurred_at: Utc.timestamp_opt(ts, 0).unwrap().naive_utc(),
        style: row.get(2)?,
        duration_minutes: row.get::<_, i64>(3)? as u32,
        studio: row.get(4)?,
        instructor: row.get(5)?,
        difficulty: Difficulty::parse(&difficulty).unwrap_or(Difficulty::Open),
        mood: Mood::parse(&mood).unwrap_or(Mood::Happy),
        notes: row.get(8)?,
        music_title: row.get(9)?,
        media,
    })
}
