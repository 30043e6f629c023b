//! Database row types. They map directly to SQLite rows and serialize to the
//! field names of their columns, which is what the bot layer renders.

use garajhub_types::{MemberStatus, StartupStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub phone: String,
    pub gender: String,
    pub birth_date: String,
    pub bio: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub group_link: String,
    pub owner_id: i64,
    pub status: StartupStatus,
    pub results: String,
    pub created_at: String,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
}

/// Fields supplied when an owner submits a new startup.
#[derive(Debug, Clone)]
pub struct NewStartup<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub logo: Option<&'a str>,
    pub group_link: &'a str,
    pub owner_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinRequestRow {
    pub id: i64,
    pub startup_id: i64,
    pub user_id: i64,
    pub status: MemberStatus,
    pub joined_at: String,
}

/// Accepted member of a startup, joined with their profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberProfileRow {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: String,
    pub username: Option<String>,
    pub phone: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentUserRow {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentStartupRow {
    pub id: i64,
    pub name: String,
    pub status: StartupStatus,
    pub created_at: String,
}
