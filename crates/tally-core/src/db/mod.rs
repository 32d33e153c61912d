//! Database access layer and schema
//!
//! This module is organized by domain:
//! - `transactions` - Transaction inserts, monthly aggregation, history queries
//! - `transaction_filter` - WHERE clause builder for history queries
//!
//! The store holds exactly one SQLite connection. It lives in an r2d2 pool of
//! size one, so every call checks it out for the duration of one statement
//! and statements from concurrent callers are serialized.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tempfile::TempDir;
use tracing::info;

use crate::error::Result;

mod transaction_filter;
mod transactions;

pub use transaction_filter::{FilterResult, TransactionFilter};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Database file used when no path is configured
pub const DEFAULT_DB_PATH: &str = "database.db";

/// Tables created by schema initialization
pub const TABLES: [&str; 4] = ["transactions", "categories", "budget", "savings_goals"];

/// Handle to the transaction store
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    /// Directory removed once the last clone of a throwaway database drops
    _temp_dir: Option<Arc<TempDir>>,
}

impl Database {
    /// Open (or create) the database file at `path` and initialize the schema
    ///
    /// Schema creation is idempotent, so opening an existing store never
    /// touches its rows.
    pub fn new(path: &str) -> Result<Self> {
        Self::open(path, None)
    }

    fn open(path: &str, temp_dir: Option<Arc<TempDir>>) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Applied to every connection the pool opens
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            _temp_dir: temp_dir,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a file in a fresh temporary directory rather than `:memory:`
    /// because the pool may recycle its connection, which would discard an
    /// in-memory database. The directory is deleted when the last clone drops.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("tally_test_").tempdir()?;
        let path = dir.path().join("database.db").to_string_lossy().into_owned();

        Self::open(&path, Some(Arc::new(dir)))
    }

    /// Get the connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Names of the user tables currently present, sorted
    pub fn table_names(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Create the schema if it does not exist yet
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            -- Note: creates -wal and -shm sidecar files alongside the database
            PRAGMA journal_mode = WAL;

            -- Transactions (the only table the tools read or write)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,                  -- ISO YYYY-MM-DD, compared as text
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );

            -- Categories (placeholder, not used by any tool)
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                type TEXT NOT NULL CHECK(type IN ('income', 'expense')),
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );

            -- Budget (placeholder, not used by any tool)
            CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                month TEXT NOT NULL,
                year INTEGER NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (category_id) REFERENCES categories(id)
            );

            -- Savings goals (placeholder, not used by any tool)
            CREATE TABLE IF NOT EXISTS savings_goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL,
                current_amount REAL NOT NULL DEFAULT 0,
                target_date TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        info!(path = %self.db_path, "Database schema initialized");
        Ok(())
    }
}
