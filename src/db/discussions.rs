use crate::api::api_error::ApiError;
use crate::db::books::book_exists;
use crate::models::discussion::{CreateDiscussionDto, Discussion, ReplyEntry};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

const DISCUSSION_COLUMNS: &str = "id, book_id, user_id, title, content, created_at";

pub async fn create_discussion(
    db: &Pool<Sqlite>,
    user_id: i64,
    discussion: &CreateDiscussionDto,
) -> Result<Discussion, ApiError> {
    if !book_exists(db, discussion.book_id).await? {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    let created = sqlx::query_as::<_, Discussion>(&format!(
        r#"
        INSERT INTO discussions (book_id, user_id, title, content, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING {DISCUSSION_COLUMNS}
        "#
    ))
    .bind(discussion.book_id)
    .bind(user_id)
    .bind(&discussion.title)
    .bind(&discussion.content)
    .bind(Utc::now())
    .fetch_one(db)
    .await?;

    Ok(created)
}

pub async fn by_book(db: &Pool<Sqlite>, book_id: i64) -> Result<Vec<Discussion>, ApiError> {
    let discussions = sqlx::query_as::<_, Discussion>(&format!(
        r#"
        SELECT {DISCUSSION_COLUMNS}
        FROM discussions
        WHERE book_id = ?1
        ORDER BY created_at DESC
        "#
    ))
    .bind(book_id)
    .fetch_all(db)
    .await?;

    Ok(discussions)
}

pub async fn get_discussion(db: &Pool<Sqlite>, discussion_id: i64) -> Result<Discussion, ApiError> {
    let discussion = sqlx::query_as::<_, Discussion>(&format!(
        r#"
        SELECT {DISCUSSION_COLUMNS}
        FROM discussions
        WHERE id = ?1
        "#
    ))
    .bind(discussion_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Discussion not found".into()))?;

    Ok(discussion)
}

pub async fn add_reply(
    db: &Pool<Sqlite>,
    discussion_id: i64,
    user_id: i64,
    content: &str,
) -> Result<Vec<ReplyEntry>, ApiError> {
    get_discussion(db, discussion_id).await?;

    sqlx::query(
        "INSERT INTO discussion_replies (discussion_id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(discussion_id)
    .bind(user_id)
    .bind(content)
    .bind(Utc::now())
    .execute(db)
    .await?;

    replies(db, discussion_id).await
}

pub async fn replies(db: &Pool<Sqlite>, discussion_id: i64) -> Result<Vec<ReplyEntry>, ApiError> {
    let replies = sqlx::query_as::<_, ReplyEntry>(
        r#"
        SELECT r.id, r.user_id, u.username, r.content, r.created_at
        FROM discussion_replies r
        JOIN users u ON u.id = r.user_id
        WHERE r.discussion_id = ?1
        ORDER BY r.id
        "#,
    )
    .bind(discussion_id)
    .fetch_all(db)
    .await?;

    Ok(replies)
}

/// Only the author may delete a discussion; replies go with it.
pub async fn delete_discussion(
    db: &Pool<Sqlite>,
    discussion_id: i64,
    requester: i64,
) -> Result<(), ApiError> {
    let discussion = get_discussion(db, discussion_id).await?;

    if discussion.user_id != requester {
        return Err(ApiError::Forbidden(
            "Only the author can delete this discussion".into(),
        ));
    }

    sqlx::query("DELETE FROM discussions WHERE id = ?1")
        .bind(discussion_id)
        .execute(db)
        .await?;

    Ok(())
}
