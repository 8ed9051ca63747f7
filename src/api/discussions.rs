use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::discussions::{
    add_reply, by_book, create_discussion, delete_discussion, get_discussion, replies,
};
use crate::models::discussion::{CreateDiscussionDto, ReplyDto};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

pub async fn list_for_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let discussions = by_book(&state.db_pool, book_id).await?;

    Ok(Json(json!({
        "count": discussions.len(),
        "data": discussions,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(discussion_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let discussion = get_discussion(db, discussion_id).await?;
    let replies = replies(db, discussion_id).await?;

    Ok(Json(json!({
        "data": discussion,
        "replies": replies,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateDiscussionDto>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation("Content is required".into()));
    }

    let discussion = create_discussion(&state.db_pool, claims.sub, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Discussion created",
            "data": discussion,
        })),
    ))
}

pub async fn reply(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(discussion_id): Path<i64>,
    Json(payload): Json<ReplyDto>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation("Content is required".into()));
    }

    let replies = add_reply(&state.db_pool, discussion_id, claims.sub, &payload.content).await?;

    Ok(Json(json!({
        "message": "Reply added",
        "replies": replies,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(discussion_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    delete_discussion(&state.db_pool, discussion_id, claims.sub).await?;

    Ok(Json(json!({
        "message": "Discussion deleted",
    })))
}
