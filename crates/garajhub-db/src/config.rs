use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "GARAJHUB_DB_PATH";
pub const DEFAULT_DB_PATH: &str = "garajhub.db";

/// Location of the SQLite file backing the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub path: PathBuf,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads `GARAJHUB_DB_PATH`, falling back to `garajhub.db` in the working
    /// directory.
    pub fn from_env() -> Self {
        let path = std::env::var(DB_PATH_VAR).unwrap_or_else(|_| DEFAULT_DB_PATH.into());
        Self::new(path)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}
