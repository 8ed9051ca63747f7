use crate::api::api_error::ApiError;
use crate::models::progress::{
    AddNoteDto, NoteEntry, Progress, ProgressStatus, UpsertProgressDto,
};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

const PROGRESS_COLUMNS: &str = r#"id, user_id, book_id, status, current_page, total_pages,
                  notes, completed_date, created_at, updated_at"#;

// One record per (user, book). The page is validated against the book before
// any write; the scratch notes field is only touched when the caller sent it.
pub async fn upsert_progress(
    db: &Pool<Sqlite>,
    user_id: i64,
    update: &UpsertProgressDto,
) -> Result<Progress, ApiError> {
    let total_pages: i64 = sqlx::query_scalar("SELECT total_pages FROM books WHERE id = ?1")
        .bind(update.book_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".into()))?;

    if update.current_page < 0 {
        return Err(ApiError::Validation(
            "Current page must be a non-negative number".into(),
        ));
    }

    if update.current_page > total_pages {
        return Err(ApiError::Validation(
            "Current page cannot exceed total pages".into(),
        ));
    }

    let now = Utc::now();

    let progress = sqlx::query_as::<_, Progress>(&format!(
        r#"
        INSERT INTO reading_progress
            (user_id, book_id, status, current_page, total_pages, notes, created_at, updated_at)
        VALUES (?1, ?2, 'reading', ?3, ?4, ?5, ?6, ?6)
        ON CONFLICT(user_id, book_id) DO UPDATE SET
            current_page = excluded.current_page,
            notes = COALESCE(excluded.notes, notes),
            updated_at = excluded.updated_at
        RETURNING {PROGRESS_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(update.book_id)
    .bind(update.current_page)
    .bind(total_pages)
    .bind(update.notes.as_deref())
    .bind(now)
    .fetch_one(db)
    .await?;

    Ok(progress)
}

pub async fn my_progress(db: &Pool<Sqlite>, user_id: i64) -> Result<Vec<Progress>, ApiError> {
    let progress = sqlx::query_as::<_, Progress>(&format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM reading_progress
        WHERE user_id = ?1
        ORDER BY updated_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(progress)
}

pub async fn book_progress(db: &Pool<Sqlite>, book_id: i64) -> Result<Vec<Progress>, ApiError> {
    let progress = sqlx::query_as::<_, Progress>(&format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM reading_progress
        WHERE book_id = ?1
        ORDER BY updated_at DESC
        "#
    ))
    .bind(book_id)
    .fetch_all(db)
    .await?;

    Ok(progress)
}

pub async fn for_book(
    db: &Pool<Sqlite>,
    user_id: i64,
    book_id: i64,
) -> Result<Progress, ApiError> {
    let progress = sqlx::query_as::<_, Progress>(&format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM reading_progress
        WHERE user_id = ?1 AND book_id = ?2
        "#
    ))
    .bind(user_id)
    .bind(book_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Progress not found".into()))?;

    Ok(progress)
}

pub async fn get_progress(db: &Pool<Sqlite>, progress_id: i64) -> Result<Progress, ApiError> {
    let progress = sqlx::query_as::<_, Progress>(&format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM reading_progress
        WHERE id = ?1
        "#
    ))
    .bind(progress_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Progress not found".into()))?;

    Ok(progress)
}

/// Notes are append-only; earlier entries are never edited or removed.
pub async fn add_note(
    db: &Pool<Sqlite>,
    progress_id: i64,
    requester: i64,
    note: &AddNoteDto,
) -> Result<Vec<NoteEntry>, ApiError> {
    let progress = get_progress(db, progress_id).await?;

    if progress.user_id != requester {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    sqlx::query(
        "INSERT INTO progress_notes (progress_id, content, page, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(progress_id)
    .bind(&note.content)
    .bind(note.page)
    .bind(Utc::now())
    .execute(db)
    .await?;

    notes(db, progress_id).await
}

pub async fn notes(db: &Pool<Sqlite>, progress_id: i64) -> Result<Vec<NoteEntry>, ApiError> {
    let notes = sqlx::query_as::<_, NoteEntry>(
        r#"
        SELECT id, content, page, created_at
        FROM progress_notes
        WHERE progress_id = ?1
        ORDER BY id
        "#,
    )
    .bind(progress_id)
    .fetch_all(db)
    .await?;

    Ok(notes)
}

// Unlike a book's start/end dates, the completed date is restamped on every
// transition into completed. Tests pin this down.
pub async fn update_status(
    db: &Pool<Sqlite>,
    progress_id: i64,
    requester: i64,
    status: ProgressStatus,
) -> Result<Progress, ApiError> {
    let progress = get_progress(db, progress_id).await?;

    if progress.user_id != requester {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    let completed_date = if status == ProgressStatus::Completed {
        Some(Utc::now())
    } else {
        progress.completed_date
    };

    let updated = sqlx::query_as::<_, Progress>(&format!(
        r#"
        UPDATE reading_progress
        SET status = ?1, completed_date = ?2, updated_at = ?3
        WHERE id = ?4
        RETURNING {PROGRESS_COLUMNS}
        "#
    ))
    .bind(status)
    .bind(completed_date)
    .bind(Utc::now())
    .bind(progress_id)
    .fetch_one(db)
    .await?;

    Ok(updated)
}
