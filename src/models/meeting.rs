use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub club_id: i64,
    pub title: String,
    pub meeting_date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct AttendeeEntry {
    pub user_id: i64,
    pub username: String,
    pub rsvp_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMeetingDto {
    pub title: String,
    pub club_id: i64,
    pub meeting_date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MeetingFilter {
    pub club_id: Option<i64>,
}
