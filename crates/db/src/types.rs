use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    #[sea_orm(string_value = "TODO")]
    Todo,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "IN_REVIEW")]
    InReview,
    #[sea_orm(string_value = "DONE")]
    Done,
    #[sea_orm(string_value = "BLOCKED")]
    Blocked,
}

impl TicketStatus {
    pub fn is_done(self) -> bool {
        self == TicketStatus::Done
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PullRequestStatus {
    #[default]
    #[sea_orm(string_value = "Open")]
    Open,
    #[sea_orm(string_value = "Merged")]
    Merged,
    #[sea_orm(string_value = "Closed")]
    Closed,
    #[sea_orm(string_value = "Draft")]
    Draft,
}

/// A loosely typed reference to a row id as clients send it: `7`, `"7"` or `""`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Id(i64),
    Text(String),
}

impl IdRef {
    /// `None` for blank or non-numeric text.
    pub fn id(&self) -> Option<i64> {
        match self {
            IdRef::Id(id) => Some(*id),
            IdRef::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, IdRef::Text(text) if text.trim().is_empty())
    }
}
