use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::polls::{cast_vote, close_poll, create_poll, get_poll, list_polls, results};
use crate::models::poll::{CastPollVoteDto, CreatePollDto, PollFilter};
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
    Query(filter): Query<PollFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let polls = list_polls(&state.db_pool, &filter).await?;

    Ok(Json(json!({
        "count": polls.len(),
        "data": polls,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreatePollDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let poll = create_poll(db, claims.sub, &payload).await?;
    let options = results(db, poll.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Poll created",
            "data": poll,
            "options": options,
        })),
    ))
}

pub async fn vote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(poll_id): Path<i64>,
    Json(payload): Json<CastPollVoteDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    cast_vote(db, poll_id, claims.sub, payload.option_index).await?;

    let poll = get_poll(db, poll_id).await?;
    let options = results(db, poll_id).await?;

    Ok(Json(json!({
        "data": poll,
        "options": options,
    })))
}

pub async fn get_results(
    State(state): State<AppState>,
    Path(poll_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let poll = get_poll(db, poll_id).await?;
    let options = results(db, poll_id).await?;
    let total: i64 = options.iter().map(|o| o.votes).sum();

    Ok(Json(json!({
        "data": poll,
        "options": options,
        "total_votes": total,
    })))
}

pub async fn close(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(poll_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let poll = close_poll(&state.db_pool, poll_id, claims.sub).await?;

    Ok(Json(json!({
        "message": "Poll closed",
        "data": poll,
    })))
}
