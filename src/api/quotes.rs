use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::quotes::{
    add_comment, add_like, add_to_collection, collections, comments, create_quote, delete_quote,
    get_quote_checked, like_comment, likes, list_quotes, popular_quotes, remove_like,
    toggle_favorite, update_quote, user_quotes,
};
use crate::models::quote::{
    AddCommentDto, CollectionDto, CreateQuoteDto, LikeCommentDto, QuoteFilter, UpdateQuoteDto,
};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateQuoteDto>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation("Content is required".into()));
    }
    if payload.page_number < 1 {
        return Err(ApiError::Validation(
            "Page number must be a positive number".into(),
        ));
    }

    let quote = create_quote(&state.db_pool, claims.sub, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Quote created successfully",
            "data": quote,
        })),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<QuoteFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let quotes = list_quotes(&state.db_pool, &filter).await?;

    Ok(Json(json!({
        "count": quotes.len(),
        "data": quotes,
    })))
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<i64>,
}

pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Result<impl IntoResponse, ApiError> {
    let quotes = popular_quotes(&state.db_pool, params.limit.unwrap_or(10)).await?;

    Ok(Json(json!({
        "count": quotes.len(),
        "data": quotes,
    })))
}

pub async fn by_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let quotes = user_quotes(&state.db_pool, user_id, claims.sub).await?;

    Ok(Json(json!({
        "count": quotes.len(),
        "data": quotes,
    })))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let quote = get_quote_checked(db, quote_id, claims.sub).await?;
    let likes = likes(db, quote_id).await?;
    let comments = comments(db, quote_id).await?;
    let collections = collections(db, quote_id).await?;

    Ok(Json(json!({
        "data": quote,
        "likes": likes,
        "comments": comments,
        "collections": collections,
    })))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
    Json(payload): Json<UpdateQuoteDto>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = update_quote(&state.db_pool, quote_id, claims.sub, &payload).await?;

    Ok(Json(json!({
        "message": "Quote updated successfully",
        "data": quote,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    delete_quote(&state.db_pool, quote_id, claims.sub).await?;

    Ok(Json(json!({
        "message": "Quote deleted successfully",
    })))
}

pub async fn like(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    add_like(db, quote_id, claims.sub).await?;
    let likes = likes(db, quote_id).await?;

    Ok(Json(json!({
        "message": "Quote liked successfully",
        "likes": likes,
    })))
}

pub async fn unlike(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    remove_like(db, quote_id, claims.sub).await?;
    let likes = likes(db, quote_id).await?;

    Ok(Json(json!({
        "message": "Quote unliked successfully",
        "likes": likes,
    })))
}

pub async fn comment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
    Json(payload): Json<AddCommentDto>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation("Content is required".into()));
    }

    let db = &state.db_pool;

    add_comment(db, quote_id, claims.sub, &payload.content).await?;
    let comments = comments(db, quote_id).await?;

    Ok(Json(json!({
        "message": "Comment added successfully",
        "comments": comments,
    })))
}

pub async fn comment_like(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
    Json(payload): Json<LikeCommentDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    like_comment(db, quote_id, payload.comment_index, claims.sub).await?;
    let comments = comments(db, quote_id).await?;

    Ok(Json(json!({
        "message": "Comment liked successfully",
        "comments": comments,
    })))
}

pub async fn collect(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(quote_id): Path<i64>,
    Json(payload): Json<CollectionDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    add_to_collection(db, quote_id, claims.sub, &payload.collection_name).await?;
    let collections = collections(db, quote_id).await?;

    Ok(Json(json!({
        "message": "Added to collection successfully",
        "collections": collections,
    })))
}

pub async fn favorite(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(quote_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = toggle_favorite(&state.db_pool, quote_id).await?;

    let message = if quote.is_favorite {
        "Quote favorited successfully"
    } else {
        "Quote unfavorited successfully"
    };

    Ok(Json(json!({
        "message": message,
        "data": quote,
    })))
}
