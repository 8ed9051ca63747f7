use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    Reading,
    Completed,
    OnHold,
}

impl ProgressStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reading" => Some(ProgressStatus::Reading),
            "completed" => Some(ProgressStatus::Completed),
            "on-hold" => Some(ProgressStatus::OnHold),
            _ => None,
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Progress {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub status: ProgressStatus,
    pub current_page: i64,
    pub total_pages: i64,
    pub notes: Option<String>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct NoteEntry {
    pub id: i64,
    pub content: String,
    pub page: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertProgressDto {
    pub book_id: i64,
    pub current_page: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddNoteDto {
    pub content: String,
    pub page: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgressStatusDto {
    pub status: String,
}
