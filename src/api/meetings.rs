use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::meetings::{attendees, create_meeting, list_meetings, rsvp};
use crate::models::meeting::{CreateMeetingDto, MeetingFilter};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<MeetingFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let meetings = list_meetings(&state.db_pool, &filter).await?;

    Ok(Json(json!({
        "count": meetings.len(),
        "data": meetings,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<CreateMeetingDto>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }

    let meeting = create_meeting(&state.db_pool, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Meeting created",
            "data": meeting,
        })),
    ))
}

pub async fn attend(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(meeting_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    rsvp(db, meeting_id, claims.sub).await?;
    let attendees = attendees(db, meeting_id).await?;

    Ok(Json(json!({
        "message": "RSVP recorded",
        "attendees": attendees,
    })))
}
