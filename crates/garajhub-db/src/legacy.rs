//! Fail-soft view of [`Database`] for callers that only distinguish "data" from
//! "no data".
//!
//! Every method logs the failure with the operation name and its identifying
//! arguments, then returns the empty value: `None`, an empty `Vec`,
//! `(vec![], 0)` for pages, or an empty map for statistics. A lookup that
//! failed is therefore indistinguishable from one that found nothing.

use std::collections::BTreeMap;

use garajhub_types::{MemberStatus, Page, StartupStatus, UserField};
use tracing::error;

use crate::models::{
    JoinRequestRow, MemberProfileRow, NewStartup, RecentStartupRow, RecentUserRow, StartupRow,
    UserRow,
};
use crate::{Database, DbError};

pub struct FailSoft<'a> {
    db: &'a Database,
}

impl Database {
    pub fn fail_soft(&self) -> FailSoft<'_> {
        FailSoft { db: self }
    }
}

/// Splits a page into the `(items, total)` pair, logging and returning
/// `(vec![], 0)` on failure. `describe` names the listing in the log line.
fn page_or_empty<T>(
    result: Result<Page<T>, DbError>,
    page: u32,
    per_page: u32,
    describe: &'static str,
) -> (Vec<T>, u64) {
    match result {
        Ok(p) => p.into_parts(),
        Err(err) => {
            error!(page, per_page, error = %err, "Error getting {describe}");
            (Vec::new(), 0)
        }
    }
}

impl FailSoft<'_> {
    // -- Users --

    pub fn get_user(&self, user_id: i64) -> Option<UserRow> {
        self.db.get_user(user_id).unwrap_or_else(|err| {
            error!(user_id, error = %err, "Error getting user");
            None
        })
    }

    pub fn save_user(&self, user_id: i64, username: Option<&str>, first_name: &str) {
        if let Err(err) = self.db.save_user(user_id, username, first_name) {
            error!(user_id, error = %err, "Error saving user");
        }
    }

    pub fn update_user_field(&self, user_id: i64, field: UserField, value: &str) {
        if let Err(err) = self.db.update_user_field(user_id, field, value) {
            error!(user_id, %field, error = %err, "Error updating user field");
        }
    }

    pub fn get_all_users(&self) -> Vec<i64> {
        self.db.get_all_users().unwrap_or_else(|err| {
            error!(error = %err, "Error getting all users");
            Vec::new()
        })
    }

    pub fn get_recent_users(&self, limit: u32) -> Vec<RecentUserRow> {
        self.db.get_recent_users(limit).unwrap_or_else(|err| {
            error!(limit, error = %err, "Error getting recent users");
            Vec::new()
        })
    }

    // -- Startups --

    pub fn create_startup(&self, new: &NewStartup<'_>) -> Option<i64> {
        match self.db.create_startup(new) {
            Ok(id) => Some(id),
            Err(err) => {
                error!(owner_id = new.owner_id, error = %err, "Error creating startup");
                None
            }
        }
    }

    pub fn get_startup(&self, startup_id: i64) -> Option<StartupRow> {
        self.db.get_startup(startup_id).unwrap_or_else(|err| {
            error!(startup_id, error = %err, "Error getting startup");
            None
        })
    }

    pub fn get_startups_by_owner(&self, owner_id: i64) -> Vec<StartupRow> {
        self.db.get_startups_by_owner(owner_id).unwrap_or_else(|err| {
            error!(owner_id, error = %err, "Error getting startups for owner");
            Vec::new()
        })
    }

    pub fn get_pending_startups(&self, page: u32, per_page: u32) -> (Vec<StartupRow>, u64) {
        page_or_empty(
            self.db.get_pending_startups(page, per_page),
            page,
            per_page,
            "pending startups",
        )
    }

    pub fn get_active_startups(&self, page: u32, per_page: u32) -> (Vec<StartupRow>, u64) {
        page_or_empty(
            self.db.get_active_startups(page, per_page),
            page,
            per_page,
            "active startups",
        )
    }

    pub fn get_completed_startups(&self, page: u32, per_page: u32) -> (Vec<StartupRow>, u64) {
        page_or_empty(
            self.db.get_completed_startups(page, per_page),
            page,
            per_page,
            "completed startups",
        )
    }

    pub fn get_rejected_startups(&self, page: u32, per_page: u32) -> (Vec<StartupRow>, u64) {
        page_or_empty(
            self.db.get_rejected_startups(page, per_page),
            page,
            per_page,
            "rejected startups",
        )
    }

    pub fn update_startup_status(&self, startup_id: i64, status: StartupStatus) {
        if let Err(err) = self.db.update_startup_status(startup_id, status) {
            error!(startup_id, %status, error = %err, "Error updating startup status");
        }
    }

    pub fn update_startup_results(&self, startup_id: i64, results: &str) {
        if let Err(err) = self.db.update_startup_results(startup_id, results) {
            error!(startup_id, error = %err, "Error updating startup results");
        }
    }

    pub fn get_recent_startups(&self, limit: u32) -> Vec<RecentStartupRow> {
        self.db.get_recent_startups(limit).unwrap_or_else(|err| {
            error!(limit, error = %err, "Error getting recent startups");
            Vec::new()
        })
    }

    // -- Join requests --

    pub fn add_startup_member(&self, startup_id: i64, user_id: i64) -> Option<i64> {
        match self.db.add_startup_member(startup_id, user_id) {
            Ok(id) => Some(id),
            Err(err) => {
                error!(startup_id, user_id, error = %err, "Error adding startup member");
                None
            }
        }
    }

    pub fn get_join_request_id(&self, startup_id: i64, user_id: i64) -> Option<i64> {
        self.db
            .get_join_request_id(startup_id, user_id)
            .unwrap_or_else(|err| {
                error!(startup_id, user_id, error = %err, "Error getting join request");
                None
            })
    }

    pub fn get_join_request(&self, request_id: i64) -> Option<JoinRequestRow> {
        self.db.get_join_request(request_id).unwrap_or_else(|err| {
            error!(request_id, error = %err, "Error getting join request");
            None
        })
    }

    pub fn update_join_request(&self, request_id: i64, status: MemberStatus) {
        if let Err(err) = self.db.update_join_request(request_id, status) {
            error!(request_id, %status, error = %err, "Error updating join request");
        }
    }

    pub fn get_startup_members(
        &self,
        startup_id: i64,
        page: u32,
        per_page: u32,
    ) -> (Vec<MemberProfileRow>, u64) {
        match self.db.get_startup_members(startup_id, page, per_page) {
            Ok(members) => members.into_parts(),
            Err(err) => {
                error!(
                    startup_id,
                    page,
                    per_page,
                    error = %err,
                    "Error getting startup members"
                );
                (Vec::new(), 0)
            }
        }
    }

    pub fn get_all_startup_members(&self, startup_id: i64) -> Vec<i64> {
        self.db
            .get_all_startup_members(startup_id)
            .unwrap_or_else(|err| {
                error!(startup_id, error = %err, "Error getting all startup members");
                Vec::new()
            })
    }

    // -- Statistics --

    /// Counter map, or an empty map when the snapshot could not be read.
    pub fn get_statistics(&self) -> BTreeMap<&'static str, u64> {
        match self.db.get_statistics() {
            Ok(stats) => stats.to_map(),
            Err(err) => {
                error!(error = %err, "Error getting statistics");
                BTreeMap::new()
            }
        }
    }
}
