//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::safety::SafetyVerdict;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RecordMethod, RunCounts, RunRecord, RunStatus, StoredRecord};
use crate::SafecrawlError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and initializes the schema
    pub fn new(path: &Path) -> Result<Self, SafecrawlError> {
        let conn = Connection::open(path).map_err(StorageError::from)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;

        initialize_schema(&conn).map_err(StorageError::from)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database, mostly useful in tests
    pub fn open_in_memory() -> Result<Self, SafecrawlError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        initialize_schema(&conn).map_err(StorageError::from)?;
        Ok(Self { conn })
    }
}

fn map_run_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        counts: RunCounts {
            classified: row.get::<_, i64>(5)? as u64,
            skipped: row.get::<_, i64>(6)? as u64,
            failed: row.get::<_, i64>(7)? as u64,
        },
    })
}

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, classified, skipped, failed";

impl Storage for SqliteStorage {
    // ===== Classification Records =====

    fn get_record(&self, collection: &str, key: &str) -> StorageResult<Option<StoredRecord>> {
        let row: Option<(String, Option<String>, String, String)> = self
            .conn
            .query_row(
                "SELECT method, search_key, url, safety FROM records
                 WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((method, search_key, url, safety)) = row else {
            return Ok(None);
        };

        let method = RecordMethod::from_db_string(&method).ok_or_else(|| {
            StorageError::CorruptRecord {
                key: key.to_string(),
                message: format!("unknown method '{}'", method),
            }
        })?;
        let safety = SafetyVerdict::from_db_string(&safety).ok_or_else(|| {
            StorageError::CorruptRecord {
                key: key.to_string(),
                message: format!("unknown safety '{}'", safety),
            }
        })?;

        Ok(Some(StoredRecord {
            method,
            search_key,
            url,
            safety,
        }))
    }

    fn set_record(
        &mut self,
        collection: &str,
        key: &str,
        record: &StoredRecord,
    ) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO records (collection, key, method, search_key, url, safety)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                collection,
                key,
                record.method.to_db_string(),
                record.search_key,
                record.url,
                record.safety.to_db_string()
            ],
        )?;
        Ok(())
    }

    fn count_records(&self, collection: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_by_safety(&self, collection: &str) -> StorageResult<HashMap<SafetyVerdict, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT safety, COUNT(*) FROM records WHERE collection = ?1 GROUP BY safety",
        )?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(safety, count)| {
                SafetyVerdict::from_db_string(&safety).map(|verdict| (verdict, count as u64))
            })
            .collect())
    }

    fn count_by_method(&self, collection: &str) -> StorageResult<HashMap<RecordMethod, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT method, COUNT(*) FROM records WHERE collection = ?1 GROUP BY method",
        )?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(method, count)| {
                RecordMethod::from_db_string(&method).map(|method| (method, count as u64))
            })
            .collect())
    }

    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                map_run_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                map_run_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        counts: &RunCounts,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, classified = ?3, skipped = ?4, failed = ?5
             WHERE id = ?6",
            params![
                status.to_db_string(),
                now,
                counts.classified as i64,
                counts.skipped as i64,
                counts.failed as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }
}
