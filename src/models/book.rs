use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Proposed,
    Voting,
    Reading,
    Completed,
}

impl BookStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "proposed" => Some(BookStatus::Proposed),
            "voting" => Some(BookStatus::Voting),
            "reading" => Some(BookStatus::Reading),
            "completed" => Some(BookStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upvote" => Some(VoteType::Upvote),
            "downvote" => Some(VoteType::Downvote),
            _ => None,
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: Option<String>,
    pub cover_image: Option<String>,
    pub total_pages: i64,
    pub proposed_by: i64,
    pub status: BookStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Book plus its derived vote score, computed by the query rather than stored.
#[derive(Debug, FromRow, Serialize)]
pub struct BookWithScore {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub book: Book,
    pub score: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct VoteEntry {
    pub user_id: i64,
    pub username: String,
    pub vote_type: VoteType,
    pub voted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub cover_image: Option<String>,
    pub total_pages: i64,
}

#[derive(Debug, Deserialize)]
pub struct CastVoteDto {
    pub vote_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookStatusDto {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RateBookDto {
    pub rating: i64,
}

#[derive(Debug, Deserialize)]
pub struct BookFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}
