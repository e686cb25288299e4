use crate::error::Result;
use crate::model::PullRequestRecord;
use rusqlite::{params, Connection};
use std::path::Path;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path.as_ref())?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Safe to call on every run; existing rows are untouched.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pull_request (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                number INTEGER NOT NULL UNIQUE,
                github_id TEXT NOT NULL,
                merged_time TEXT NOT NULL,
                zh_word_count INTEGER NOT NULL,
                base_branch TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_pull_request_merged_time ON pull_request(merged_time);
            ",
        )?;
        Ok(())
    }

    pub fn exists(&self, number: u64) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM pull_request WHERE number = ?1")?;
        Ok(stmt.exists(params![number])?)
    }

    /// Inserts the record unless its number is already present. Returns
    /// whether a row was written; an existing row keeps its original count.
    pub fn insert(&self, record: &PullRequestRecord) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO pull_request
                (number, github_id, merged_time, zh_word_count, base_branch)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.number,
                record.author,
                record.merged_at,
                record.zh_word_count,
                record.base_branch,
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn records(&self) -> Result<Vec<PullRequestRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT number, github_id, merged_time, zh_word_count, base_branch
             FROM pull_request
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PullRequestRecord {
                number: row.get(0)?,
                author: row.get(1)?,
                merged_at: row.get(2)?,
                zh_word_count: row.get(3)?,
                base_branch: row.get(4)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Into::into)
    }
}
