//! SQLite-backed task store.
//!
//! The database lives at `~/.mindflow/mindflow.db` unless the config points
//! elsewhere. It holds to-dos and inspiration notes in a single `tasks` table;
//! the category column tells them apart.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::types::Config;

pub mod tasks;
pub mod types;
pub use types::*;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT '',
    priority INTEGER NOT NULL DEFAULT 2,
    is_done INTEGER NOT NULL DEFAULT 0,
    due_date INTEGER,
    reminder_time INTEGER,
    category TEXT NOT NULL DEFAULT 'other',
    image_uris TEXT NOT NULL DEFAULT '',
    completed_at INTEGER,
    is_incubated INTEGER NOT NULL DEFAULT 0,
    is_from_inspiration INTEGER NOT NULL DEFAULT 0,
    audio_path TEXT
);
CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
CREATE INDEX IF NOT EXISTS idx_tasks_category ON tasks(category);
";

pub struct TaskDb {
    conn: Connection,
}

impl TaskDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Open (or create) the database named by `config`, falling back to
    /// `~/.mindflow/mindflow.db`.
    pub fn open(config: &Config) -> Result<Self, DbError> {
        let path = match config.database_path.as_deref() {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => Self::db_path()?,
        };
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        log::debug!("Opened task database at {}", path.display());
        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.mindflow/mindflow.db`.
    fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".mindflow").join("mindflow.db"))
    }
}
