use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// -- Pagination --

/// Page sizes the bot menus use for each listing.
pub mod pagination {
    pub const PENDING_PER_PAGE: u32 = 5;
    pub const ACTIVE_PER_PAGE: u32 = 10;
    pub const COMPLETED_PER_PAGE: u32 = 5;
    pub const REJECTED_PER_PAGE: u32 = 5;
    pub const MEMBERS_PER_PAGE: u32 = 5;
    pub const RECENT_LIMIT: u32 = 10;

    /// Row offset of a 1-indexed page. Page 0 is treated as page 1.
    pub fn offset(page: u32, per_page: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(per_page)
    }
}

/// One page of a listing together with the number of rows matching the
/// filter across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.items, self.total)
    }

    /// Number of pages needed to show `total` rows at `per_page` rows each.
    pub fn page_count(&self, per_page: u32) -> u64 {
        if per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(per_page))
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

// -- Statistics --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_users: u64,
    pub total_startups: u64,
    pub active_startups: u64,
    pub pending_startups: u64,
    pub completed_startups: u64,
    pub rejected_startups: u64,
}

impl Statistics {
    /// Key/count mapping in the shape the admin panel renders.
    pub fn to_map(&self) -> BTreeMap<&'static str, u64> {
        BTreeMap::from([
            ("total_users", self.total_users),
            ("total_startups", self.total_startups),
            ("active_startups", self.active_startups),
            ("pending_startups", self.pending_startups),
            ("completed_startups", self.completed_startups),
            ("rejected_startups", self.rejected_startups),
        ])
    }
}
