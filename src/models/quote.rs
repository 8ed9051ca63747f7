use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub book_id: i64,
    pub club_id: i64,
    pub user_id: i64,
    pub content: String,
    pub page_number: i64,
    pub chapter: Option<String>,
    pub is_public: bool,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// Quote plus its like count, for listings sorted by popularity.
#[derive(Debug, FromRow, Serialize)]
pub struct QuoteWithLikes {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub quote: Quote,
    pub like_count: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct LikeEntry {
    pub user_id: i64,
    pub username: String,
    pub liked_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct CommentEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct CollectionEntry {
    pub name: String,
    pub user_id: i64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteDto {
    pub club_id: i64,
    pub book_id: i64,
    pub content: String,
    pub page_number: i64,
    pub chapter: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuoteDto {
    pub content: Option<String>,
    pub page_number: Option<i64>,
    pub chapter: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentDto {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct LikeCommentDto {
    pub comment_index: i64,
}

#[derive(Debug, Deserialize)]
pub struct CollectionDto {
    pub collection_name: String,
}

#[derive(Debug, Deserialize)]
pub struct QuoteFilter {
    pub club_id: Option<i64>,
    pub book_id: Option<i64>,
    pub user_id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
