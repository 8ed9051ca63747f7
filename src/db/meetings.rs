use crate::api::api_error::ApiError;
use crate::models::meeting::{AttendeeEntry, CreateMeetingDto, Meeting, MeetingFilter};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

const MEETING_COLUMNS: &str = "id, club_id, title, meeting_date, time, description, created_at";

pub async fn create_meeting(
    db: &Pool<Sqlite>,
    meeting: &CreateMeetingDto,
) -> Result<Meeting, ApiError> {
    let club: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clubs WHERE id = ?1")
        .bind(meeting.club_id)
        .fetch_one(db)
        .await?;
    if club == 0 {
        return Err(ApiError::NotFound("Club not found".into()));
    }

    let created = sqlx::query_as::<_, Meeting>(&format!(
        r#"
        INSERT INTO meetings (club_id, title, meeting_date, time, description, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING {MEETING_COLUMNS}
        "#
    ))
    .bind(meeting.club_id)
    .bind(&meeting.title)
    .bind(meeting.meeting_date)
    .bind(meeting.time.as_deref())
    .bind(meeting.description.as_deref().unwrap_or(""))
    .bind(Utc::now())
    .fetch_one(db)
    .await?;

    Ok(created)
}

pub async fn list_meetings(
    db: &Pool<Sqlite>,
    filter: &MeetingFilter,
) -> Result<Vec<Meeting>, ApiError> {
    let meetings = sqlx::query_as::<_, Meeting>(&format!(
        r#"
        SELECT {MEETING_COLUMNS}
        FROM meetings
        WHERE (?1 IS NULL OR club_id = ?1)
        ORDER BY created_at DESC
        "#
    ))
    .bind(filter.club_id)
    .fetch_all(db)
    .await?;

    Ok(meetings)
}

/// RSVPing twice leaves the attendee set unchanged.
pub async fn rsvp(db: &Pool<Sqlite>, meeting_id: i64, user_id: i64) -> Result<(), ApiError> {
    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meetings WHERE id = ?1")
        .bind(meeting_id)
        .fetch_one(db)
        .await?;
    if exists == 0 {
        return Err(ApiError::NotFound("Meeting not found".into()));
    }

    sqlx::query(
        r#"
        INSERT INTO meeting_attendees (meeting_id, user_id, rsvp_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(meeting_id, user_id) DO NOTHING
        "#,
    )
    .bind(meeting_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

pub async fn attendees(db: &Pool<Sqlite>, meeting_id: i64) -> Result<Vec<AttendeeEntry>, ApiError> {
    let attendees = sqlx::query_as::<_, AttendeeEntry>(
        r#"
        SELECT a.user_id, u.username, a.rsvp_at
        FROM meeting_attendees a
        JOIN users u ON u.id = a.user_id
        WHERE a.meeting_id = ?1
        ORDER BY a.rsvp_at
        "#,
    )
    .bind(meeting_id)
    .fetch_all(db)
    .await?;

    Ok(attendees)
}
