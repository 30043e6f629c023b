pub mod config;
pub mod error;
pub mod legacy;
pub mod models;
pub mod queries;
pub mod schema;

pub use config::DbConfig;
pub use error::{DbError, Result};

use chrono::Utc;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use tracing::info;

/// Handle on the SQLite file. Holds no connection: every operation opens its
/// own and drops it before returning.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Opens (creating if needed) the store at `path` and makes sure the schema
    /// exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Self {
            path: path.to_path_buf(),
        };

        // WAL is persistent in the file, so later connections inherit it.
        db.with_conn(|conn| Ok(conn.pragma_update(None, "journal_mode", "WAL")?))?;
        db.init()?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn from_config(config: &DbConfig) -> Result<Self> {
        Self::open(&config.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-runs schema creation. Safe on an already initialized store.
    pub fn init(&self) -> Result<()> {
        self.with_conn(schema::run)
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.connect()?;
        f(&mut conn)
    }

    /// Runs `f` inside a read transaction so that every statement sees the
    /// same snapshot of the file.
    pub fn with_snapshot<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
            let out = f(&tx)?;
            tx.commit()?;
            Ok(out)
        })
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        // The bundled build enforces foreign keys by default. Owners and
        // members are allowed to act before their profile row exists.
        conn.pragma_update(None, "foreign_keys", "OFF")?;
        Ok(conn)
    }
}

/// Current UTC time in the text form stored in timestamp columns. Fixed-width,
/// so lexical order matches chronological order.
pub(crate) fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_fixed_width() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2024-01-01 00:00:00.000000".len());
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%d %H:%M:%S%.6f").is_ok());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("garajhub.db");

        let db = Database::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
    }

    #[test]
    fn open_switches_to_wal() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("wal.db")).unwrap();

        let mode: String = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA journal_mode", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn connections_do_not_enforce_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("fk.db")).unwrap();

        let enforced: i64 = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(enforced, 0);
    }

    #[test]
    fn init_is_idempotent_on_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("init.db")).unwrap();
        db.save_user(1, Some("ali"), "Ali").unwrap();

        db.init().unwrap();
        let reopened = Database::open(db.path()).unwrap();

        assert!(reopened.get_user(1).unwrap().is_some());
    }
}
