use crate::api::api_error::ApiError;
use crate::models::poll::{CreatePollDto, OptionTally, Poll, PollFilter, PollStatus};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

const POLL_COLUMNS: &str = "id, question, club_id, status, created_by, created_at";

pub async fn create_poll(
    db: &Pool<Sqlite>,
    created_by: i64,
    poll: &CreatePollDto,
) -> Result<Poll, ApiError> {
    let club: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clubs WHERE id = ?1")
        .bind(poll.club_id)
        .fetch_one(db)
        .await?;
    if club == 0 {
        return Err(ApiError::NotFound("Club not found".into()));
    }

    let mut tx = db.begin().await?;

    let created = sqlx::query_as::<_, Poll>(&format!(
        r#"
        INSERT INTO polls (question, club_id, status, created_by, created_at)
        VALUES (?1, ?2, 'active', ?3, ?4)
        RETURNING {POLL_COLUMNS}
        "#
    ))
    .bind(&poll.question)
    .bind(poll.club_id)
    .bind(created_by)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    // Each option string becomes an ordered row with an empty vote set.
    for (idx, text) in poll.options.iter().enumerate() {
        sqlx::query("INSERT INTO poll_options (poll_id, idx, text) VALUES (?1, ?2, ?3)")
            .bind(created.id)
            .bind(idx as i64)
            .bind(text)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(created)
}

pub async fn list_polls(db: &Pool<Sqlite>, filter: &PollFilter) -> Result<Vec<Poll>, ApiError> {
    let polls = sqlx::query_as::<_, Poll>(&format!(
        r#"
        SELECT {POLL_COLUMNS}
        FROM polls
        WHERE (?1 IS NULL OR club_id = ?1)
          AND (?2 IS NULL OR status = ?2)
        ORDER BY created_at DESC
        "#
    ))
    .bind(filter.club_id)
    .bind(filter.status.as_deref())
    .fetch_all(db)
    .await?;

    Ok(polls)
}

pub async fn get_poll(db: &Pool<Sqlite>, poll_id: i64) -> Result<Poll, ApiError> {
    let poll = sqlx::query_as::<_, Poll>(&format!(
        r#"
        SELECT {POLL_COLUMNS}
        FROM polls
        WHERE id = ?1
        "#
    ))
    .bind(poll_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Poll not found".into()))?;

    Ok(poll)
}

// The (poll_id, user_id) primary key holds the single-choice invariant:
// a re-vote moves the voter's one row to the new option, it never adds a
// second row. Repeating the same option leaves the tally unchanged.
pub async fn cast_vote(
    db: &Pool<Sqlite>,
    poll_id: i64,
    user_id: i64,
    option_index: i64,
) -> Result<(), ApiError> {
    let poll = get_poll(db, poll_id).await?;

    if poll.status == PollStatus::Closed {
        return Err(ApiError::Conflict("Poll is closed".into()));
    }

    let options: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM poll_options WHERE poll_id = ?1")
        .bind(poll_id)
        .fetch_one(db)
        .await?;

    if option_index < 0 || option_index >= options {
        return Err(ApiError::Validation("Invalid option index".into()));
    }

    sqlx::query(
        r#"
        INSERT INTO poll_votes (poll_id, user_id, option_idx, voted_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(poll_id, user_id) DO UPDATE SET
            option_idx = excluded.option_idx,
            voted_at = excluded.voted_at
        "#,
    )
    .bind(poll_id)
    .bind(user_id)
    .bind(option_index)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(())
}

/// Per-option tallies, counted at read time.
pub async fn results(db: &Pool<Sqlite>, poll_id: i64) -> Result<Vec<OptionTally>, ApiError> {
    let tallies = sqlx::query_as::<_, OptionTally>(
        r#"
        SELECT o.idx, o.text, COUNT(v.user_id) AS votes
        FROM poll_options o
        LEFT JOIN poll_votes v ON v.poll_id = o.poll_id AND v.option_idx = o.idx
        WHERE o.poll_id = ?1
        GROUP BY o.idx, o.text
        ORDER BY o.idx
        "#,
    )
    .bind(poll_id)
    .fetch_all(db)
    .await?;

    Ok(tallies)
}

/// Which option the user currently holds, if any.
pub async fn voter_option(
    db: &Pool<Sqlite>,
    poll_id: i64,
    user_id: i64,
) -> Result<Option<i64>, ApiError> {
    let option = sqlx::query_scalar(
        "SELECT option_idx FROM poll_votes WHERE poll_id = ?1 AND user_id = ?2",
    )
    .bind(poll_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(option)
}

pub async fn close_poll(db: &Pool<Sqlite>, poll_id: i64, requester: i64) -> Result<Poll, ApiError> {
    let poll = get_poll(db, poll_id).await?;

    if poll.created_by != requester {
        return Err(ApiError::Forbidden(
            "Only the poll creator can close it".into(),
        ));
    }

    let closed = sqlx::query_as::<_, Poll>(&format!(
        r#"
        UPDATE polls SET status = 'closed' WHERE id = ?1
        RETURNING {POLL_COLUMNS}
        "#
    ))
    .bind(poll_id)
    .fetch_one(db)
    .await?;

    Ok(closed)
}
