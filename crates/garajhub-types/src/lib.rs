//! Domain types shared by the GarajHub storage layer and its callers.

pub mod api;
pub mod models;

pub use api::{Page, Statistics, pagination};
pub use models::{MemberStatus, ParseStatusError, ParseUserFieldError, StartupStatus, UserField};
