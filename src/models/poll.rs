use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Active,
    Closed,
}

impl PollStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(PollStatus::Active),
            "closed" => Some(PollStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub question: String,
    pub club_id: i64,
    pub status: PollStatus,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// One poll option with its vote tally, counted at read time.
#[derive(Debug, FromRow, Serialize)]
pub struct OptionTally {
    pub idx: i64,
    pub text: String,
    pub votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePollDto {
    pub question: String,
    pub club_id: i64,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CastPollVoteDto {
    pub option_index: i64,
}

#[derive(Debug, Deserialize)]
pub struct PollFilter {
    pub club_id: Option<i64>,
    pub status: Option<String>,
}
