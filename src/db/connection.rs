//! FitLog database handle
//!
//! One SQLite file behind an r2d2 pool. Opening it creates the parent
//! directory and brings the schema up to date, so callers get a store that
//! is ready for the tool layer.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::info;

use super::migrations;
use crate::config::Config;

const POOL_SIZE: u32 = 4;

/// How long a writer waits on a lock held by another process
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database pool error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot create database directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
    path: Arc<PathBuf>,
}

impl Database {
    /// Open the configured log file
    pub fn open(config: &Config) -> DbResult<Self> {
        Self::open_path(&config.database_path)
    }

    /// Open (or create) a log file at `path` and run pending migrations
    pub fn open_path(path: &Path) -> DbResult<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| DbError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(configure_connection);
        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;

        let db = Self {
            pool: Arc::new(pool),
            path: Arc::new(path.to_path_buf()),
        };
        let version = db.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            migrations::get_schema_version(conn)
        })?;
        info!("Opened {} (schema v{})", path.display(), version);

        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` with a pooled connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.pool.get()?;
        f(&conn)
    }

    /// Run `f` with a mutable pooled connection, for transactions
    pub fn with_conn_mut<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.pool.get()?;
        f(&mut conn)
    }
}

/// Custom log entries cascade with their type, so foreign keys must be on
fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_directory_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("fitlog.db");

        let db = Database::open_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());

        let (version, foreign_keys): (i32, i64) = db
            .with_conn(|conn| {
                let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
                Ok((migrations::get_schema_version(conn)?, fk))
            })
            .unwrap();
        assert!(version >= 1);
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("fitlog.db"),
            similarity_threshold: 0.65,
        };

        let first = Database::open(&config).unwrap();
        first
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO custom_log_types (name, unit) VALUES ('water', 'ml')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
        drop(first);

        let second = Database::open(&config).unwrap();
        let count: i64 = second
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM custom_log_types", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_open_fails_when_directory_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = Database::open_path(&blocker.join("fitlog.db"));
        assert!(matches!(result, Err(DbError::CreateDir { .. })));
    }
}
