use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::progress::{
    add_note, book_progress, for_book, my_progress, notes, update_status, upsert_progress,
};
use crate::models::progress::{
    AddNoteDto, ProgressStatus, UpdateProgressStatusDto, UpsertProgressDto,
};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

pub async fn upsert(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<UpsertProgressDto>,
) -> Result<impl IntoResponse, ApiError> {
    let progress = upsert_progress(&state.db_pool, claims.sub, &payload).await?;

    Ok(Json(json!({
        "message": "Progress saved",
        "data": progress,
    })))
}

pub async fn mine(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let progress = my_progress(&state.db_pool, claims.sub).await?;

    Ok(Json(json!({
        "count": progress.len(),
        "data": progress,
    })))
}

pub async fn for_book_mine(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let progress = for_book(db, claims.sub, book_id).await?;
    let notes = notes(db, progress.id).await?;

    Ok(Json(json!({
        "data": progress,
        "notes": notes,
    })))
}

/// Everyone's progress for one book, for the club view.
pub async fn for_book_all(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let progress = book_progress(&state.db_pool, book_id).await?;

    Ok(Json(json!({
        "count": progress.len(),
        "data": progress,
    })))
}

pub async fn create_note(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(progress_id): Path<i64>,
    Json(payload): Json<AddNoteDto>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = add_note(&state.db_pool, progress_id, claims.sub, &payload).await?;

    Ok(Json(json!({
        "message": "Note added",
        "notes": notes,
    })))
}

pub async fn set_status(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(progress_id): Path<i64>,
    Json(payload): Json<UpdateProgressStatusDto>,
) -> Result<impl IntoResponse, ApiError> {
    let status = ProgressStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::Validation("Invalid status".into()))?;

    let progress = update_status(&state.db_pool, progress_id, claims.sub, status).await?;

    Ok(Json(json!({
        "message": "Status updated",
        "data": progress,
    })))
}
