use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} status: {value:?}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user field: {0:?}")]
pub struct ParseUserFieldError(pub String);

// -- Startups --

/// Review lifecycle of a startup proposal.
///
/// `Pending → Active → Completed`, or `Pending → Rejected`. The storage layer
/// records whatever target it is given; callers decide which moves are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupStatus {
    Pending,
    Active,
    Completed,
    Rejected,
}

impl StartupStatus {
    /// Spelling stored in the `startups.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for StartupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartupStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseStatusError {
                kind: "startup",
                value: other.to_string(),
            }),
        }
    }
}

// -- Join requests --

/// State of a request to join a startup. Only `Accepted` requests count as
/// members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseStatusError {
                kind: "member",
                value: other.to_string(),
            }),
        }
    }
}

// -- Users --

/// Profile fields that may be updated one at a time.
///
/// Each variant maps to a fixed column of the `users` table, so no
/// caller-supplied text ever ends up in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Username,
    FirstName,
    LastName,
    Phone,
    Gender,
    BirthDate,
    Bio,
}

impl UserField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Phone => "phone",
            Self::Gender => "gender",
            Self::BirthDate => "birth_date",
            Self::Bio => "bio",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for UserField {
    type Err = ParseUserFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(Self::Username),
            "first_name" => Ok(Self::FirstName),
            "last_name" => Ok(Self::LastName),
            "phone" => Ok(Self::Phone),
            "gender" => Ok(Self::Gender),
            "birth_date" => Ok(Self::BirthDate),
            "bio" => Ok(Self::Bio),
            other => Err(ParseUserFieldError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_status_parses_its_own_spelling() {
        for status in [
            StartupStatus::Pending,
            StartupStatus::Active,
            StartupStatus::Completed,
            StartupStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<StartupStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "archived".parse::<StartupStatus>().unwrap_err();
        assert_eq!(err.kind, "startup");
        assert_eq!(err.value, "archived");

        assert!("Accepted".parse::<MemberStatus>().is_err());
    }

    #[test]
    fn user_field_rejects_non_columns() {
        assert_eq!("birth_date".parse::<UserField>().unwrap(), UserField::BirthDate);
        assert!("user_id".parse::<UserField>().is_err());
        assert!("bio = '', user_id".parse::<UserField>().is_err());
    }

    #[test]
    fn serde_uses_storage_spelling() {
        let json = serde_json::to_string(&StartupStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");

        let field: UserField = serde_json::from_str("\"last_name\"").unwrap();
        assert_eq!(field, UserField::LastName);
    }
}
