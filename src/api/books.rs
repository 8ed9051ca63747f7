use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::books::{
    average_rating, book_votes, cast_vote, get_book, list_books, propose_book, rate_book,
    remove_vote, update_status,
};
use crate::models::book::{
    BookFilter, BookStatus, CastVoteDto, CreateBookDto, RateBookDto, UpdateBookStatusDto, VoteType,
};
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
    Query(filter): Query<BookFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let books = list_books(&state.db_pool, &filter).await?;

    Ok(Json(json!({
        "count": books.len(),
        "data": books,
    })))
}

pub async fn propose(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateBookDto>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if payload.author.trim().is_empty() {
        return Err(ApiError::Validation("Author is required".into()));
    }

    let book = propose_book(&state.db_pool, claims.sub, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Book proposed",
            "data": book,
        })),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let book = get_book(db, book_id).await?;
    let votes = book_votes(db, book_id).await?;
    let rating = average_rating(db, book_id).await?;

    Ok(Json(json!({
        "data": book,
        "votes": votes,
        "average_rating": rating,
    })))
}

pub async fn vote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(book_id): Path<i64>,
    Json(payload): Json<CastVoteDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let vote_type = VoteType::parse(&payload.vote_type)
        .ok_or_else(|| ApiError::Validation("Invalid vote type".into()))?;

    cast_vote(db, book_id, claims.sub, vote_type).await?;

    let book = get_book(db, book_id).await?;
    let votes = book_votes(db, book_id).await?;

    Ok(Json(json!({
        "data": book,
        "votes": votes,
    })))
}

pub async fn unvote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(book_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    remove_vote(db, book_id, claims.sub).await?;

    let book = get_book(db, book_id).await?;

    Ok(Json(json!({
        "message": "Vote removed",
        "data": book,
    })))
}

pub async fn set_status(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(book_id): Path<i64>,
    Json(payload): Json<UpdateBookStatusDto>,
) -> Result<impl IntoResponse, ApiError> {
    let status = BookStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::Validation("Invalid status".into()))?;

    let book = update_status(&state.db_pool, book_id, status).await?;

    Ok(Json(json!({
        "message": "Status updated",
        "data": book,
    })))
}

pub async fn rate(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(book_id): Path<i64>,
    Json(payload): Json<RateBookDto>,
) -> Result<impl IntoResponse, ApiError> {
    let average = rate_book(&state.db_pool, book_id, claims.sub, payload.rating).await?;

    Ok(Json(json!({
        "message": "Rating saved",
        "average_rating": average,
    })))
}
