use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Club {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_private: bool,
    pub invite_code: Option<String>,
    pub admin_id: i64,
    pub current_book: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct MemberEntry {
    pub user_id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClubDto {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub invite_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JoinClubDto {
    pub invite_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClubDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_private: Option<bool>,
    pub invite_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentBookDto {
    pub book_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ClubFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    /// "private" or "public", anything else means both.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
