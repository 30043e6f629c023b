use std::str::FromStr;

use garajhub_types::{MemberStatus, Page, StartupStatus, Statistics, UserField, pagination};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, warn};

use crate::models::{
    JoinRequestRow, MemberProfileRow, NewStartup, RecentStartupRow, RecentUserRow, StartupRow,
    UserRow,
};
use crate::{Database, Result, timestamp_now};

const USER_COLUMNS: &str =
    "id, user_id, username, first_name, last_name, phone, gender, birth_date, bio, joined_at";

const STARTUP_COLUMNS: &str = "id, name, description, logo, group_link, owner_id, status, results, \
     created_at, started_at, ended_at";

impl Database {
    // -- Users --

    pub fn get_user(&self, user_id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, user_id))
    }

    /// Records the latest username and first name for `user_id`, creating the
    /// row on first contact. Profile fields filled in later are left alone.
    pub fn save_user(&self, user_id: i64, username: Option<&str>, first_name: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (user_id, username, first_name, joined_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     username = excluded.username,
                     first_name = excluded.first_name",
                params![user_id, username, first_name, timestamp_now()],
            )?;
            debug!(user_id, "user saved");
            Ok(())
        })
    }

    pub fn update_user_field(&self, user_id: i64, field: UserField, value: &str) -> Result<()> {
        // The column name comes from a closed enum, never from caller text.
        let sql = format!("UPDATE users SET {} = ?1 WHERE user_id = ?2", field.column());
        self.with_conn(|conn| {
            let changed = conn.execute(&sql, params![value, user_id])?;
            debug!(user_id, %field, changed, "user field updated");
            Ok(())
        })
    }

    pub fn get_all_users(&self) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT user_id FROM users")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    pub fn get_recent_users(&self, limit: u32) -> Result<Vec<RecentUserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, username, first_name, last_name, joined_at
                 FROM users
                 ORDER BY joined_at DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([i64::from(limit)], |row| {
                    Ok(RecentUserRow {
                        user_id: row.get(0)?,
                        username: row.get(1)?,
                        first_name: row.get(2)?,
                        last_name: text_or_empty(row, 3)?,
                        joined_at: text_or_empty(row, 4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Startups --

    /// Inserts a startup awaiting review and returns its id.
    pub fn create_startup(&self, new: &NewStartup<'_>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO startups (name, description, logo, group_link, owner_id, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    new.name,
                    new.description,
                    new.logo,
                    new.group_link,
                    new.owner_id,
                    StartupStatus::Pending.as_str(),
                    timestamp_now(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(startup_id = id, owner_id = new.owner_id, "startup created");
            Ok(id)
        })
    }

    pub fn get_startup(&self, startup_id: i64) -> Result<Option<StartupRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {STARTUP_COLUMNS} FROM startups WHERE id = ?1");
            let row = conn.query_row(&sql, [startup_id], startup_from_row).optional()?;
            Ok(row)
        })
    }

    /// All startups submitted by `owner_id`, newest first.
    pub fn get_startups_by_owner(&self, owner_id: i64) -> Result<Vec<StartupRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {STARTUP_COLUMNS} FROM startups
                 WHERE owner_id = ?1
                 ORDER BY created_at DESC, id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = known_rows(stmt.query_map([owner_id], startup_from_row)?)?;
            Ok(rows)
        })
    }

    /// One page of startups in `status`, newest first, with the total number of
    /// startups in that status. Count and page are read from the same snapshot.
    pub fn get_startups_by_status(
        &self,
        status: StartupStatus,
        page: u32,
        per_page: u32,
    ) -> Result<Page<StartupRow>> {
        self.with_snapshot(|tx| {
            let total: i64 = tx.query_row(
                "SELECT COUNT(*) FROM startups WHERE status = ?1",
                [status.as_str()],
                |r| r.get(0),
            )?;

            let sql = format!(
                "SELECT {STARTUP_COLUMNS} FROM startups
                 WHERE status = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = tx.prepare(&sql)?;
            let items = stmt
                .query_map(
                    params![status.as_str(), i64::from(per_page), offset(page, per_page)],
                    startup_from_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Page {
                items,
                total: count(total),
            })
        })
    }

    pub fn get_pending_startups(&self, page: u32, per_page: u32) -> Result<Page<StartupRow>> {
        self.get_startups_by_status(StartupStatus::Pending, page, per_page)
    }

    pub fn get_active_startups(&self, page: u32, per_page: u32) -> Result<Page<StartupRow>> {
        self.get_startups_by_status(StartupStatus::Active, page, per_page)
    }

    pub fn get_completed_startups(&self, page: u32, per_page: u32) -> Result<Page<StartupRow>> {
        self.get_startups_by_status(StartupStatus::Completed, page, per_page)
    }

    pub fn get_rejected_startups(&self, page: u32, per_page: u32) -> Result<Page<StartupRow>> {
        self.get_startups_by_status(StartupStatus::Rejected, page, per_page)
    }

    /// Records a new status. Moving to `Active` stamps `started_at`, moving to
    /// `Completed` stamps `ended_at`; other targets leave both timestamps as
    /// they are. Legality of the move is the caller's concern.
    pub fn update_startup_status(&self, startup_id: i64, status: StartupStatus) -> Result<()> {
        self.with_conn(|conn| {
            let changed = match status {
                StartupStatus::Active => conn.execute(
                    "UPDATE startups SET status = ?1, started_at = ?2 WHERE id = ?3",
                    params![status.as_str(), timestamp_now(), startup_id],
                )?,
                StartupStatus::Completed => conn.execute(
                    "UPDATE startups SET status = ?1, ended_at = ?2 WHERE id = ?3",
                    params![status.as_str(), timestamp_now(), startup_id],
                )?,
                StartupStatus::Pending | StartupStatus::Rejected => conn.execute(
                    "UPDATE startups SET status = ?1 WHERE id = ?2",
                    params![status.as_str(), startup_id],
                )?,
            };
            debug!(startup_id, %status, changed, "startup status updated");
            Ok(())
        })
    }

    pub fn update_startup_results(&self, startup_id: i64, results: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE startups SET results = ?1 WHERE id = ?2",
                params![results, startup_id],
            )?;
            Ok(())
        })
    }

    pub fn get_recent_startups(&self, limit: u32) -> Result<Vec<RecentStartupRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, status, created_at
                 FROM startups
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = known_rows(stmt.query_map([i64::from(limit)], |row| {
                Ok(RecentStartupRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    status: parse_column(row, 2)?,
                    created_at: text_or_empty(row, 3)?,
                })
            })?)?;
            Ok(rows)
        })
    }

    // -- Join requests --

    /// Files a join request for `user_id`. If one already exists for the pair
    /// its id is returned and the row is left untouched.
    pub fn add_startup_member(&self, startup_id: i64, user_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO startup_members (startup_id, user_id, status, joined_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(startup_id, user_id) DO NOTHING",
                params![
                    startup_id,
                    user_id,
                    MemberStatus::Pending.as_str(),
                    timestamp_now()
                ],
            )?;

            let id = if inserted == 1 {
                conn.last_insert_rowid()
            } else {
                conn.query_row(
                    "SELECT id FROM startup_members WHERE startup_id = ?1 AND user_id = ?2",
                    [startup_id, user_id],
                    |row| row.get(0),
                )?
            };
            debug!(startup_id, user_id, request_id = id, new = inserted == 1, "join request filed");
            Ok(id)
        })
    }

    pub fn get_join_request_id(&self, startup_id: i64, user_id: i64) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM startup_members WHERE startup_id = ?1 AND user_id = ?2",
                    [startup_id, user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    pub fn get_join_request(&self, request_id: i64) -> Result<Option<JoinRequestRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, startup_id, user_id, status, joined_at
                     FROM startup_members WHERE id = ?1",
                    [request_id],
                    |row| {
                        Ok(JoinRequestRow {
                            id: row.get(0)?,
                            startup_id: row.get(1)?,
                            user_id: row.get(2)?,
                            status: parse_column(row, 3)?,
                            joined_at: text_or_empty(row, 4)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn update_join_request(&self, request_id: i64, status: MemberStatus) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE startup_members SET status = ?1 WHERE id = ?2",
                params![status.as_str(), request_id],
            )?;
            debug!(request_id, %status, changed, "join request updated");
            Ok(())
        })
    }

    /// One page of accepted members with their profiles, plus the number of
    /// accepted members overall. Pending and rejected requests are excluded
    /// from both.
    pub fn get_startup_members(
        &self,
        startup_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<MemberProfileRow>> {
        let accepted = MemberStatus::Accepted.as_str();
        self.with_snapshot(|tx| {
            let total: i64 = tx.query_row(
                "SELECT COUNT(*) FROM startup_members sm
                 JOIN users u ON sm.user_id = u.user_id
                 WHERE sm.startup_id = ?1 AND sm.status = ?2",
                params![startup_id, accepted],
                |r| r.get(0),
            )?;

            let mut stmt = tx.prepare(
                "SELECT u.user_id, u.first_name, u.last_name, u.username, u.phone, u.bio
                 FROM startup_members sm
                 JOIN users u ON sm.user_id = u.user_id
                 WHERE sm.startup_id = ?1 AND sm.status = ?2
                 ORDER BY sm.id
                 LIMIT ?3 OFFSET ?4",
            )?;
            let items = stmt
                .query_map(
                    params![startup_id, accepted, i64::from(per_page), offset(page, per_page)],
                    |row| {
                        Ok(MemberProfileRow {
                            user_id: row.get(0)?,
                            first_name: row.get(1)?,
                            last_name: text_or_empty(row, 2)?,
                            username: row.get(3)?,
                            phone: text_or_empty(row, 4)?,
                            bio: text_or_empty(row, 5)?,
                        })
                    },
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Page {
                items,
                total: count(total),
            })
        })
    }

    /// User ids of every accepted member, for broadcasts to the whole team.
    pub fn get_all_startup_members(&self, startup_id: i64) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id FROM startup_members WHERE startup_id = ?1 AND status = ?2",
            )?;
            let ids = stmt
                .query_map(params![startup_id, MemberStatus::Accepted.as_str()], |row| {
                    row.get(0)
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    // -- Statistics --

    /// User and startup counters, read in a single statement.
    pub fn get_statistics(&self) -> Result<Statistics> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                     (SELECT COUNT(*) FROM users),
                     COUNT(*),
                     COALESCE(SUM(status = ?1), 0),
                     COALESCE(SUM(status = ?2), 0),
                     COALESCE(SUM(status = ?3), 0),
                     COALESCE(SUM(status = ?4), 0)
                 FROM startups",
                params![
                    StartupStatus::Active.as_str(),
                    StartupStatus::Pending.as_str(),
                    StartupStatus::Completed.as_str(),
                    StartupStatus::Rejected.as_str(),
                ],
                |row| {
                    Ok(Statistics {
                        total_users: count(row.get(0)?),
                        total_startups: count(row.get(1)?),
                        active_startups: count(row.get(2)?),
                        pending_startups: count(row.get(3)?),
                        completed_startups: count(row.get(4)?),
                        rejected_startups: count(row.get(5)?),
                    })
                },
            )?;
            Ok(stats)
        })
    }
}

fn query_user(conn: &Connection, user_id: i64) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([user_id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                username: row.get(2)?,
                first_name: row.get(3)?,
                last_name: text_or_empty(row, 4)?,
                phone: text_or_empty(row, 5)?,
                gender: text_or_empty(row, 6)?,
                birth_date: text_or_empty(row, 7)?,
                bio: text_or_empty(row, 8)?,
                joined_at: text_or_empty(row, 9)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn startup_from_row(row: &Row<'_>) -> rusqlite::Result<StartupRow> {
    Ok(StartupRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        logo: row.get(3)?,
        group_link: row.get(4)?,
        owner_id: row.get(5)?,
        status: parse_column(row, 6)?,
        results: text_or_empty(row, 7)?,
        created_at: text_or_empty(row, 8)?,
        started_at: row.get(9)?,
        ended_at: row.get(10)?,
    })
}

/// Reads a defaulted text column, treating NULL as the empty default.
fn text_or_empty(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

/// Collects a listing, dropping rows whose status spelling is not one we
/// know (written by an older bot, say) instead of failing the whole list.
/// Point lookups still report such a row as an error.
fn known_rows<T>(rows: impl Iterator<Item = rusqlite::Result<T>>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for row in rows {
        match row {
            Ok(item) => out.push(item),
            Err(rusqlite::Error::FromSqlConversionFailure(column, _, err)) => {
                warn!(column, error = %err, "skipping row with unrecognised value");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

/// Reads a text column holding one of our enum spellings.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn offset(page: u32, per_page: u32) -> i64 {
    i64::try_from(pagination::offset(page, per_page)).unwrap_or(i64::MAX)
}

fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}
