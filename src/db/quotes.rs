use crate::api::api_error::ApiError;
use crate::db::books::book_exists;
use crate::db::clubs::is_member;
use crate::models::quote::{
    CollectionEntry, CommentEntry, CreateQuoteDto, LikeEntry, Quote, QuoteFilter, QuoteWithLikes,
    UpdateQuoteDto,
};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

const QUOTE_COLUMNS: &str = r#"id, book_id, club_id, user_id, content, page_number, chapter,
                  is_public, is_favorite, created_at"#;

pub async fn create_quote(
    db: &Pool<Sqlite>,
    user_id: i64,
    quote: &CreateQuoteDto,
) -> Result<Quote, ApiError> {
    let club: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clubs WHERE id = ?1")
        .bind(quote.club_id)
        .fetch_one(db)
        .await?;
    if club == 0 {
        return Err(ApiError::NotFound("Club not found".into()));
    }

    if !is_member(db, quote.club_id, user_id).await? {
        return Err(ApiError::Forbidden(
            "Only club members can create quotes".into(),
        ));
    }

    if !book_exists(db, quote.book_id).await? {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    let created = sqlx::query_as::<_, Quote>(&format!(
        r#"
        INSERT INTO quotes
            (book_id, club_id, user_id, content, page_number, chapter, is_public, is_favorite, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(quote.book_id)
    .bind(quote.club_id)
    .bind(user_id)
    .bind(&quote.content)
    .bind(quote.page_number)
    .bind(quote.chapter.as_deref())
    .bind(quote.is_public.unwrap_or(true))
    .bind(Utc::now())
    .fetch_one(db)
    .await?;

    Ok(created)
}

pub async fn get_quote(db: &Pool<Sqlite>, quote_id: i64) -> Result<Quote, ApiError> {
    let quote = sqlx::query_as::<_, Quote>(&format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM quotes
        WHERE id = ?1
        "#
    ))
    .bind(quote_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Quote not found".into()))?;

    Ok(quote)
}

// A private quote is readable by its author and by current members of its
// club, nobody else.
pub async fn get_quote_checked(
    db: &Pool<Sqlite>,
    quote_id: i64,
    requester: i64,
) -> Result<Quote, ApiError> {
    let quote = get_quote(db, quote_id).await?;

    if !quote.is_public
        && quote.user_id != requester
        && !is_member(db, quote.club_id, requester).await?
    {
        return Err(ApiError::Forbidden("Access denied".into()));
    }

    Ok(quote)
}

pub async fn list_quotes(
    db: &Pool<Sqlite>,
    filter: &QuoteFilter,
) -> Result<Vec<QuoteWithLikes>, ApiError> {
    let limit = filter.limit.unwrap_or(20);
    let offset = (filter.page.unwrap_or(1).max(1) - 1) * limit;

    let quotes = sqlx::query_as::<_, QuoteWithLikes>(
        r#"
        SELECT q.id, q.book_id, q.club_id, q.user_id, q.content, q.page_number, q.chapter,
               q.is_public, q.is_favorite, q.created_at,
               (SELECT COUNT(*) FROM quote_likes l WHERE l.quote_id = q.id) AS like_count
        FROM quotes q
        WHERE q.is_public = 1
          AND (?1 IS NULL OR q.club_id = ?1)
          AND (?2 IS NULL OR q.book_id = ?2)
          AND (?3 IS NULL OR q.user_id = ?3)
        ORDER BY q.created_at DESC
        LIMIT ?4 OFFSET ?5
        "#,
    )
    .bind(filter.club_id)
    .bind(filter.book_id)
    .bind(filter.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(quotes)
}

pub async fn popular_quotes(db: &Pool<Sqlite>, limit: i64) -> Result<Vec<QuoteWithLikes>, ApiError> {
    let quotes = sqlx::query_as::<_, QuoteWithLikes>(
        r#"
        SELECT q.id, q.book_id, q.club_id, q.user_id, q.content, q.page_number, q.chapter,
               q.is_public, q.is_favorite, q.created_at,
               (SELECT COUNT(*) FROM quote_likes l WHERE l.quote_id = q.id) AS like_count
        FROM quotes q
        WHERE q.is_public = 1
        ORDER BY like_count DESC, q.created_at DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(quotes)
}

/// A user's own quotes include private ones; everyone else sees public only.
pub async fn user_quotes(
    db: &Pool<Sqlite>,
    target_user: i64,
    requester: i64,
) -> Result<Vec<QuoteWithLikes>, ApiError> {
    let quotes = sqlx::query_as::<_, QuoteWithLikes>(
        r#"
        SELECT q.id, q.book_id, q.club_id, q.user_id, q.content, q.page_number, q.chapter,
               q.is_public, q.is_favorite, q.created_at,
               (SELECT COUNT(*) FROM quote_likes l WHERE l.quote_id = q.id) AS like_count
        FROM quotes q
        WHERE q.user_id = ?1
          AND (q.is_public = 1 OR ?1 = ?2)
        ORDER BY q.created_at DESC
        "#,
    )
    .bind(target_user)
    .bind(requester)
    .fetch_all(db)
    .await?;

    Ok(quotes)
}

pub async fn update_quote(
    db: &Pool<Sqlite>,
    quote_id: i64,
    requester: i64,
    patch: &UpdateQuoteDto,
) -> Result<Quote, ApiError> {
    let quote = get_quote(db, quote_id).await?;

    if quote.user_id != requester {
        return Err(ApiError::Forbidden(
            "Only the quote owner can update it".into(),
        ));
    }

    let updated = sqlx::query_as::<_, Quote>(&format!(
        r#"
        UPDATE quotes
        SET content = COALESCE(?1, content),
            page_number = COALESCE(?2, page_number),
            chapter = COALESCE(?3, chapter),
            is_public = COALESCE(?4, is_public)
        WHERE id = ?5
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(patch.content.as_deref())
    .bind(patch.page_number)
    .bind(patch.chapter.as_deref())
    .bind(patch.is_public)
    .bind(quote_id)
    .fetch_one(db)
    .await?;

    Ok(updated)
}

pub async fn delete_quote(db: &Pool<Sqlite>, quote_id: i64, requester: i64) -> Result<(), ApiError> {
    let quote = get_quote(db, quote_id).await?;

    if quote.user_id != requester {
        return Err(ApiError::Forbidden(
            "Only the quote owner can delete it".into(),
        ));
    }

    sqlx::query("DELETE FROM quotes WHERE id = ?1")
        .bind(quote_id)
        .execute(db)
        .await?;

    Ok(())
}

// Like rows are keyed (quote, user); liking twice hits the conflict clause
// and changes nothing.
pub async fn add_like(db: &Pool<Sqlite>, quote_id: i64, user_id: i64) -> Result<(), ApiError> {
    get_quote(db, quote_id).await?;

    sqlx::query(
        r#"
        INSERT INTO quote_likes (quote_id, user_id, liked_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(quote_id, user_id) DO NOTHING
        "#,
    )
    .bind(quote_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

pub async fn remove_like(db: &Pool<Sqlite>, quote_id: i64, user_id: i64) -> Result<(), ApiError> {
    get_quote(db, quote_id).await?;

    sqlx::query("DELETE FROM quote_likes WHERE quote_id = ?1 AND user_id = ?2")
        .bind(quote_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn likes(db: &Pool<Sqlite>, quote_id: i64) -> Result<Vec<LikeEntry>, ApiError> {
    let likes = sqlx::query_as::<_, LikeEntry>(
        r#"
        SELECT l.user_id, u.username, l.liked_at
        FROM quote_likes l
        JOIN users u ON u.id = l.user_id
        WHERE l.quote_id = ?1
        ORDER BY l.liked_at
        "#,
    )
    .bind(quote_id)
    .fetch_all(db)
    .await?;

    Ok(likes)
}

pub async fn add_comment(
    db: &Pool<Sqlite>,
    quote_id: i64,
    user_id: i64,
    content: &str,
) -> Result<(), ApiError> {
    get_quote(db, quote_id).await?;

    sqlx::query(
        "INSERT INTO quote_comments (quote_id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(quote_id)
    .bind(user_id)
    .bind(content)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

pub async fn comments(db: &Pool<Sqlite>, quote_id: i64) -> Result<Vec<CommentEntry>, ApiError> {
    let comments = sqlx::query_as::<_, CommentEntry>(
        r#"
        SELECT c.id, c.user_id, u.username, c.content, c.created_at,
               (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = c.id) AS likes
        FROM quote_comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.quote_id = ?1
        ORDER BY c.id
        "#,
    )
    .bind(quote_id)
    .fetch_all(db)
    .await?;

    Ok(comments)
}

// The comment is addressed by its position in the quote's comment list. An
// out-of-range index is a silent no-op, unlike the strict poll index check.
pub async fn like_comment(
    db: &Pool<Sqlite>,
    quote_id: i64,
    comment_index: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    get_quote(db, quote_id).await?;

    let ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM quote_comments WHERE quote_id = ?1 ORDER BY id")
            .bind(quote_id)
            .fetch_all(db)
            .await?;

    if comment_index < 0 || comment_index as usize >= ids.len() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO comment_likes (comment_id, user_id, liked_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(comment_id, user_id) DO NOTHING
        "#,
    )
    .bind(ids[comment_index as usize])
    .bind(user_id)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

/// Set semantics over the (user, name) pair; re-adding is a no-op.
pub async fn add_to_collection(
    db: &Pool<Sqlite>,
    quote_id: i64,
    user_id: i64,
    name: &str,
) -> Result<(), ApiError> {
    get_quote(db, quote_id).await?;

    sqlx::query(
        r#"
        INSERT INTO quote_collections (quote_id, user_id, name, added_at) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(quote_id, user_id, name) DO NOTHING
        "#,
    )
    .bind(quote_id)
    .bind(user_id)
    .bind(name)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

pub async fn collections(db: &Pool<Sqlite>, quote_id: i64) -> Result<Vec<CollectionEntry>, ApiError> {
    let collections = sqlx::query_as::<_, CollectionEntry>(
        r#"
        SELECT name, user_id, added_at
        FROM quote_collections
        WHERE quote_id = ?1
        ORDER BY added_at
        "#,
    )
    .bind(quote_id)
    .fetch_all(db)
    .await?;

    Ok(collections)
}

// The favorite flag is shared by every viewer, last writer wins.
pub async fn toggle_favorite(db: &Pool<Sqlite>, quote_id: i64) -> Result<Quote, ApiError> {
    let quote = sqlx::query_as::<_, Quote>(&format!(
        r#"
        UPDATE quotes SET is_favorite = NOT is_favorite WHERE id = ?1
        RETURNING {QUOTE_COLUMNS}
        "#
    ))
    .bind(quote_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Quote not found".into()))?;

    Ok(quote)
}
