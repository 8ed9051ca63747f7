use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::clubs::{
    book_history, create_club, get_club, join_club, leave_club, list_clubs, members, my_clubs,
    update_club, update_current_book,
};
use crate::models::club::{
    ClubFilter, CreateClubDto, CurrentBookDto, JoinClubDto, UpdateClubDto,
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
    Query(filter): Query<ClubFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let clubs = list_clubs(&state.db_pool, &filter).await?;

    Ok(Json(json!({
        "count": clubs.len(),
        "data": clubs,
    })))
}

pub async fn mine(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let clubs = my_clubs(&state.db_pool, claims.sub).await?;

    Ok(Json(json!({
        "count": clubs.len(),
        "data": clubs,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateClubDto>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }

    let club = create_club(&state.db_pool, claims.sub, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Club created",
            "data": club,
        })),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(club_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let club = get_club(db, club_id).await?;
    let members = members(db, club_id).await?;
    let books = book_history(db, club_id).await?;

    Ok(Json(json!({
        "data": club,
        "members": members,
        "books": books,
    })))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(club_id): Path<i64>,
    Json(payload): Json<UpdateClubDto>,
) -> Result<impl IntoResponse, ApiError> {
    let club = update_club(&state.db_pool, club_id, claims.sub, &payload).await?;

    Ok(Json(json!({
        "message": "Club updated",
        "data": club,
    })))
}

pub async fn join(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(club_id): Path<i64>,
    Json(payload): Json<JoinClubDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let club = join_club(db, club_id, claims.sub, payload.invite_code.as_deref()).await?;
    let members = members(db, club_id).await?;

    Ok(Json(json!({
        "message": "Joined club",
        "data": club,
        "members": members,
    })))
}

pub async fn leave(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(club_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    leave_club(&state.db_pool, club_id, claims.sub).await?;

    Ok(Json(json!({
        "message": "Left club successfully",
    })))
}

pub async fn set_current_book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(club_id): Path<i64>,
    Json(payload): Json<CurrentBookDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let club = update_current_book(db, club_id, payload.book_id, claims.sub).await?;
    let books = book_history(db, club_id).await?;

    Ok(Json(json!({
        "message": "Current book updated",
        "data": club,
        "books": books,
    })))
}
