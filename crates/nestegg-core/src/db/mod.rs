//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - Account holders
//! - `categories` - Income and expense categories
//! - `transactions` - Transaction CRUD and period aggregates
//! - `goals` - Savings goals and their saved amounts
//! - `snapshot` - Assembling goal snapshots for the recommendation engine

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{Error, Result};

mod categories;
mod goals;
mod snapshot;
mod transactions;
mod users;

pub use snapshot::SnapshotWindow;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Read a decimal stored as TEXT
pub(crate) fn decimal_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

/// Read a nullable decimal stored as TEXT
pub(crate) fn optional_decimal_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| s.parse().map_err(|e| conversion_error(idx, e)))
        .transpose()
}

/// Read a `YYYY-MM-DD` date column
pub(crate) fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_error(idx, e))
}

/// Read a nullable `YYYY-MM-DD` date column
pub(crate) fn optional_date_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| conversion_error(idx, e)))
        .transpose()
}

/// Format a date the way it is stored
pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Add a stored amount to a running total
///
/// Validation caps single amounts, so overflow means rows written outside it.
pub(crate) fn add_amount(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total.checked_add(amount).ok_or_else(|| {
        Error::InvalidData(format!("Amount total overflowed adding {}", amount))
    })
}

/// Sum decimal TEXT values in Rust to keep exact precision
pub(crate) fn sum_decimals<I>(values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add_amount)
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a database file and run migrations
    pub fn new(path: &str) -> Result<Self> {
        // Foreign keys are a per-connection setting in SQLite
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        info!("Database ready at {}", path);
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every pooled
    /// connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "nestegg_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Income and expense categories, per user
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                color TEXT NOT NULL DEFAULT '#6366F1',
                icon TEXT NOT NULL DEFAULT '💰',
                budget_limit TEXT,                          -- decimal as text
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, type, name)
            );

            CREATE INDEX IF NOT EXISTS idx_categories_user ON categories(user_id);

            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                target_amount TEXT NOT NULL,                -- decimal as text
                target_date DATE,
                completed BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id);

            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount TEXT NOT NULL,                       -- decimal as text, always positive
                category TEXT NOT NULL,
                description TEXT,
                date DATE NOT NULL,
                eco_impact TEXT,
                goal_id INTEGER REFERENCES goals(id) ON DELETE SET NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
            CREATE INDEX IF NOT EXISTS idx_transactions_goal ON transactions(goal_id);
            "#,
        )?;

        Ok(())
    }
}
