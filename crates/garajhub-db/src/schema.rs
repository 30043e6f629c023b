use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Creates any missing table or index. Never drops or rewrites existing data,
/// so it runs on every start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER UNIQUE NOT NULL,
            username    TEXT,
            first_name  TEXT,
            last_name   TEXT DEFAULT '',
            phone       TEXT DEFAULT '',
            gender      TEXT DEFAULT '',
            birth_date  TEXT DEFAULT '',
            bio         TEXT DEFAULT '',
            joined_at   TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS startups (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            description TEXT NOT NULL,
            logo        TEXT,
            group_link  TEXT NOT NULL,
            owner_id    INTEGER NOT NULL,
            status      TEXT DEFAULT 'pending',
            results     TEXT DEFAULT '',
            created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            started_at  TIMESTAMP,
            ended_at    TIMESTAMP,
            FOREIGN KEY (owner_id) REFERENCES users(user_id)
        );

        CREATE TABLE IF NOT EXISTS startup_members (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            startup_id  INTEGER NOT NULL,
            user_id     INTEGER NOT NULL,
            status      TEXT DEFAULT 'pending',
            joined_at   TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(startup_id, user_id),
            FOREIGN KEY (startup_id) REFERENCES startups(id),
            FOREIGN KEY (user_id) REFERENCES users(user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_user_id ON users(user_id);
        CREATE INDEX IF NOT EXISTS idx_startup_owner ON startups(owner_id);
        CREATE INDEX IF NOT EXISTS idx_startup_status ON startups(status);
        CREATE INDEX IF NOT EXISTS idx_member_startup ON startup_members(startup_id);
        CREATE INDEX IF NOT EXISTS idx_member_user ON startup_members(user_id);
        ",
    )?;

    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_names(conn: &Connection, kind: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = ?1 AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([kind], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<String>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn creates_tables_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        assert_eq!(object_names(&conn, "table"), ["startup_members", "startups", "users"]);
        assert_eq!(
            object_names(&conn, "index"),
            [
                "idx_member_startup",
                "idx_member_user",
                "idx_startup_owner",
                "idx_startup_status",
                "idx_user_id",
            ]
        );
    }

    #[test]
    fn rerun_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute("INSERT INTO users (user_id, username) VALUES (7, 'ali')", [])
            .unwrap();

        run(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
