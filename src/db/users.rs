use crate::api::api_error::ApiError;
use crate::models::club::Club;
use crate::models::user::{UpdateProfileDto, User};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

pub async fn create_user(
    db: &Pool<Sqlite>,
    username: &str,
    email: &str,
    password_hash: &str,
    full_name: Option<&str>,
) -> Result<User, ApiError> {
    let existing: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2
        "#,
    )
    .bind(username)
    .bind(email)
    .fetch_one(db)
    .await?;

    if existing > 0 {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, full_name, bio, avatar, created_at)
        VALUES (?1, ?2, ?3, ?4, '', '', ?5)
        RETURNING id, username, email, password_hash, full_name, bio, avatar, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(Utc::now())
    .fetch_one(db)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(db: &Pool<Sqlite>, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, full_name, bio, avatar, created_at
        FROM users
        WHERE email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(db: &Pool<Sqlite>, user_id: i64) -> Result<User, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, full_name, bio, avatar, created_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(user)
}

// Absent fields keep their current value, same as the profile form sending
// only what changed. The avatar is stored as the URL the caller provides;
// hosting the image is not this layer's concern.
pub async fn update_profile(
    db: &Pool<Sqlite>,
    user_id: i64,
    patch: &UpdateProfileDto,
) -> Result<User, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET full_name = COALESCE(?1, full_name),
            bio = COALESCE(?2, bio),
            avatar = COALESCE(?3, avatar)
        WHERE id = ?4
        RETURNING id, username, email, password_hash, full_name, bio, avatar, created_at
        "#,
    )
    .bind(patch.full_name.as_deref())
    .bind(patch.bio.as_deref())
    .bind(patch.avatar.as_deref())
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(user)
}

/// The user's joined-clubs set, read from the membership table.
pub async fn joined_clubs(db: &Pool<Sqlite>, user_id: i64) -> Result<Vec<Club>, ApiError> {
    let clubs = sqlx::query_as::<_, Club>(
        r#"
        SELECT c.id, c.name, c.description, c.category, c.is_private, c.invite_code,
               c.admin_id, c.current_book, c.created_at
        FROM clubs c
        JOIN club_members m ON m.club_id = c.id
        WHERE m.user_id = ?1
        ORDER BY m.joined_at
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(clubs)
}
