use crate::api::api_error::ApiError;
use crate::models::book::{
    Book, BookFilter, BookStatus, BookWithScore, CreateBookDto, VoteEntry, VoteType,
};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

// Score is derived per read: upvotes minus downvotes over the vote rows.
const SCORE_SUBQUERY: &str = r#"
    (SELECT COALESCE(SUM(CASE WHEN v.vote_type = 'upvote' THEN 1 ELSE -1 END), 0)
     FROM book_votes v WHERE v.book_id = b.id) AS score
"#;

pub async fn propose_book(
    db: &Pool<Sqlite>,
    proposer: i64,
    book: &CreateBookDto,
) -> Result<Book, ApiError> {
    if book.total_pages < 1 {
        return Err(ApiError::Validation(
            "Total pages must be a positive number".into(),
        ));
    }

    let book = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (title, author, description, isbn, cover_image, total_pages,
                           proposed_by, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'voting', ?8)
        RETURNING id, title, author, description, isbn, cover_image, total_pages,
                  proposed_by, status, start_date, end_date, created_at
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(book.description.as_deref().unwrap_or(""))
    .bind(book.isbn.as_deref())
    .bind(book.cover_image.as_deref())
    .bind(book.total_pages)
    .bind(proposer)
    .bind(Utc::now())
    .fetch_one(db)
    .await?;

    Ok(book)
}

pub async fn list_books(
    db: &Pool<Sqlite>,
    filter: &BookFilter,
) -> Result<Vec<BookWithScore>, ApiError> {
    let query = format!(
        r#"
        SELECT b.id, b.title, b.author, b.description, b.isbn, b.cover_image,
               b.total_pages, b.proposed_by, b.status, b.start_date, b.end_date,
               b.created_at, {SCORE_SUBQUERY}
        FROM books b
        WHERE (?1 IS NULL OR b.status = ?1)
          AND (?2 IS NULL OR b.title LIKE '%' || ?2 || '%' OR b.author LIKE '%' || ?2 || '%')
        ORDER BY b.created_at DESC
        LIMIT ?3
        "#
    );

    let books = sqlx::query_as::<_, BookWithScore>(&query)
        .bind(filter.status.as_deref())
        .bind(filter.search.as_deref())
        .bind(filter.limit.unwrap_or(20))
        .fetch_all(db)
        .await?;

    Ok(books)
}

pub async fn get_book(db: &Pool<Sqlite>, book_id: i64) -> Result<BookWithScore, ApiError> {
    let query = format!(
        r#"
        SELECT b.id, b.title, b.author, b.description, b.isbn, b.cover_image,
               b.total_pages, b.proposed_by, b.status, b.start_date, b.end_date,
               b.created_at, {SCORE_SUBQUERY}
        FROM books b
        WHERE b.id = ?1
        "#
    );

    let book = sqlx::query_as::<_, BookWithScore>(&query)
        .bind(book_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".into()))?;

    Ok(book)
}

pub async fn book_exists(db: &Pool<Sqlite>, book_id: i64) -> Result<bool, ApiError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ?1")
        .bind(book_id)
        .fetch_one(db)
        .await?;

    Ok(count > 0)
}

pub async fn book_votes(db: &Pool<Sqlite>, book_id: i64) -> Result<Vec<VoteEntry>, ApiError> {
    let votes = sqlx::query_as::<_, VoteEntry>(
        r#"
        SELECT v.user_id, u.username, v.vote_type, v.voted_at
        FROM book_votes v
        JOIN users u ON u.id = v.user_id
        WHERE v.book_id = ?1
        ORDER BY v.voted_at
        "#,
    )
    .bind(book_id)
    .fetch_all(db)
    .await?;

    Ok(votes)
}

// One vote per (book, user): the primary key makes a re-vote replace the
// previous entry in a single statement, so two entries can never coexist.
pub async fn cast_vote(
    db: &Pool<Sqlite>,
    book_id: i64,
    user_id: i64,
    vote_type: VoteType,
) -> Result<(), ApiError> {
    if !book_exists(db, book_id).await? {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    sqlx::query(
        r#"
        INSERT INTO book_votes (book_id, user_id, vote_type, voted_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(book_id, user_id) DO UPDATE SET
            vote_type = excluded.vote_type,
            voted_at = excluded.voted_at
        "#,
    )
    .bind(book_id)
    .bind(user_id)
    .bind(vote_type)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

/// Removing an absent vote is a no-op, not an error.
pub async fn remove_vote(db: &Pool<Sqlite>, book_id: i64, user_id: i64) -> Result<(), ApiError> {
    if !book_exists(db, book_id).await? {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    sqlx::query("DELETE FROM book_votes WHERE book_id = ?1 AND user_id = ?2")
        .bind(book_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}

// Any status may follow any other; the workflow is advisory. start_date and
// end_date are stamped the first time their status is reached and never
// overwritten after that.
pub async fn update_status(
    db: &Pool<Sqlite>,
    book_id: i64,
    status: BookStatus,
) -> Result<Book, ApiError> {
    let current = get_book(db, book_id).await?.book;

    let now = Utc::now();
    let start_date = match (status, current.start_date) {
        (BookStatus::Reading, None) => Some(now),
        (_, existing) => existing,
    };
    let end_date = match (status, current.end_date) {
        (BookStatus::Completed, None) => Some(now),
        (_, existing) => existing,
    };

    let book = sqlx::query_as::<_, Book>(
        r#"
        UPDATE books
        SET status = ?1, start_date = ?2, end_date = ?3
        WHERE id = ?4
        RETURNING id, title, author, description, isbn, cover_image, total_pages,
                  proposed_by, status, start_date, end_date, created_at
        "#,
    )
    .bind(status)
    .bind(start_date)
    .bind(end_date)
    .bind(book_id)
    .fetch_one(db)
    .await?;

    Ok(book)
}

pub async fn rate_book(
    db: &Pool<Sqlite>,
    book_id: i64,
    user_id: i64,
    rating: i64,
) -> Result<f64, ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::Validation(
            "Rating must be between 1 and 5".into(),
        ));
    }

    if !book_exists(db, book_id).await? {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    sqlx::query(
        r#"
        INSERT INTO book_ratings (book_id, user_id, rating)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(book_id, user_id) DO UPDATE SET rating = excluded.rating
        "#,
    )
    .bind(book_id)
    .bind(user_id)
    .bind(rating)
    .execute(db)
    .await?;

    average_rating(db, book_id).await
}

pub async fn average_rating(db: &Pool<Sqlite>, book_id: i64) -> Result<f64, ApiError> {
    let avg: Option<f64> =
        sqlx::query_scalar("SELECT AVG(rating) FROM book_ratings WHERE book_id = ?1")
            .bind(book_id)
            .fetch_one(db)
            .await?;

    Ok(avg.unwrap_or(0.0))
}
