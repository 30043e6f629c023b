#![allow(dead_code)]

use garajhub_db::Database;
use garajhub_db::models::NewStartup;
use tempfile::TempDir;

/// Fresh store in its own temp directory. Keep the `TempDir` alive for the
/// duration of the test.
pub fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("garajhub.db")).unwrap();
    (dir, db)
}

pub fn new_startup(name: &str, owner_id: i64) -> NewStartup<'_> {
    NewStartup {
        name,
        description: "An idea worth building",
        logo: None,
        group_link: "https://t.me/+example",
        owner_id,
    }
}
