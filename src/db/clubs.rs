use crate::api::api_error::ApiError;
use crate::db::books::book_exists;
use crate::models::book::Book;
use crate::models::club::{Club, ClubFilter, CreateClubDto, MemberEntry, UpdateClubDto};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

const CLUB_COLUMNS: &str = r#"id, name, description, category, is_private, invite_code,
               admin_id, current_book, created_at"#;

// The creator becomes admin and first member in one transaction, so a club
// is never visible without its admin in the member set.
pub async fn create_club(
    db: &Pool<Sqlite>,
    admin_id: i64,
    club: &CreateClubDto,
) -> Result<Club, ApiError> {
    if club.is_private
        && club
            .invite_code
            .as_deref()
            .map_or(true, |code| code.is_empty())
    {
        return Err(ApiError::Validation(
            "Invite code is required for private clubs".into(),
        ));
    }

    let mut tx = db.begin().await?;

    let created = sqlx::query_as::<_, Club>(&format!(
        r#"
        INSERT INTO clubs (name, description, category, is_private, invite_code, admin_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING {CLUB_COLUMNS}
        "#
    ))
    .bind(&club.name)
    .bind(club.description.as_deref().unwrap_or(""))
    .bind(club.category.as_deref().unwrap_or("general"))
    .bind(club.is_private)
    .bind(club.invite_code.as_deref())
    .bind(admin_id)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO club_members (club_id, user_id, joined_at) VALUES (?1, ?2, ?3)")
        .bind(created.id)
        .bind(admin_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(created)
}

pub async fn list_clubs(db: &Pool<Sqlite>, filter: &ClubFilter) -> Result<Vec<Club>, ApiError> {
    let is_private = match filter.kind.as_deref() {
        Some("private") => Some(true),
        Some("public") => Some(false),
        _ => None,
    };

    let clubs = sqlx::query_as::<_, Club>(&format!(
        r#"
        SELECT {CLUB_COLUMNS}
        FROM clubs
        WHERE (?1 IS NULL OR name LIKE '%' || ?1 || '%')
          AND (?2 IS NULL OR category = ?2)
          AND (?3 IS NULL OR is_private = ?3)
        ORDER BY created_at DESC
        "#
    ))
    .bind(filter.search.as_deref())
    .bind(filter.category.as_deref())
    .bind(is_private)
    .fetch_all(db)
    .await?;

    Ok(clubs)
}

pub async fn my_clubs(db: &Pool<Sqlite>, user_id: i64) -> Result<Vec<Club>, ApiError> {
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

pub async fn get_club(db: &Pool<Sqlite>, club_id: i64) -> Result<Club, ApiError> {
    let club = sqlx::query_as::<_, Club>(&format!(
        r#"
        SELECT {CLUB_COLUMNS}
        FROM clubs
        WHERE id = ?1
        "#
    ))
    .bind(club_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Club not found".into()))?;

    Ok(club)
}

pub async fn members(db: &Pool<Sqlite>, club_id: i64) -> Result<Vec<MemberEntry>, ApiError> {
    let members = sqlx::query_as::<_, MemberEntry>(
        r#"
        SELECT m.user_id, u.username, u.full_name, u.avatar, m.joined_at
        FROM club_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.club_id = ?1
        ORDER BY m.joined_at
        "#,
    )
    .bind(club_id)
    .fetch_all(db)
    .await?;

    Ok(members)
}

pub async fn is_member(db: &Pool<Sqlite>, club_id: i64, user_id: i64) -> Result<bool, ApiError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM club_members WHERE club_id = ?1 AND user_id = ?2")
            .bind(club_id)
            .bind(user_id)
            .fetch_one(db)
            .await?;

    Ok(count > 0)
}

pub async fn join_club(
    db: &Pool<Sqlite>,
    club_id: i64,
    user_id: i64,
    invite_code: Option<&str>,
) -> Result<Club, ApiError> {
    let club = get_club(db, club_id).await?;

    if is_member(db, club_id, user_id).await? {
        return Err(ApiError::Conflict("Already a member".into()));
    }

    // Exact string equality; a missing code never matches a private club.
    if club.is_private && club.invite_code.as_deref() != invite_code {
        return Err(ApiError::Forbidden("Invalid invite code".into()));
    }

    sqlx::query("INSERT INTO club_members (club_id, user_id, joined_at) VALUES (?1, ?2, ?3)")
        .bind(club_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(db)
        .await?;

    Ok(club)
}

// Removal is unconditional. When the admin leaves, the admin seat is not
// reassigned; the club remains with no admin in the member set.
pub async fn leave_club(db: &Pool<Sqlite>, club_id: i64, user_id: i64) -> Result<(), ApiError> {
    get_club(db, club_id).await?;

    sqlx::query("DELETE FROM club_members WHERE club_id = ?1 AND user_id = ?2")
        .bind(club_id)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn update_current_book(
    db: &Pool<Sqlite>,
    club_id: i64,
    book_id: i64,
    requester: i64,
) -> Result<Club, ApiError> {
    let club = get_club(db, club_id).await?;

    if club.admin_id != requester {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    if !book_exists(db, book_id).await? {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    let mut tx = db.begin().await?;

    let updated = sqlx::query_as::<_, Club>(&format!(
        r#"
        UPDATE clubs SET current_book = ?1 WHERE id = ?2
        RETURNING {CLUB_COLUMNS}
        "#
    ))
    .bind(book_id)
    .bind(club_id)
    .fetch_one(&mut *tx)
    .await?;

    // History keeps set semantics: a book re-chosen later is not duplicated.
    sqlx::query(
        r#"
        INSERT INTO club_books (club_id, book_id, added_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(club_id, book_id) DO NOTHING
        "#,
    )
    .bind(club_id)
    .bind(book_id)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(updated)
}

pub async fn book_history(db: &Pool<Sqlite>, club_id: i64) -> Result<Vec<Book>, ApiError> {
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT b.id, b.title, b.author, b.description, b.isbn, b.cover_image,
               b.total_pages, b.proposed_by, b.status, b.start_date, b.end_date, b.created_at
        FROM books b
        JOIN club_books cb ON cb.book_id = b.id
        WHERE cb.club_id = ?1
        ORDER BY cb.added_at
        "#,
    )
    .bind(club_id)
    .fetch_all(db)
    .await?;

    Ok(books)
}

pub async fn update_club(
    db: &Pool<Sqlite>,
    club_id: i64,
    requester: i64,
    patch: &UpdateClubDto,
) -> Result<Club, ApiError> {
    let club = get_club(db, club_id).await?;

    if club.admin_id != requester {
        return Err(ApiError::Forbidden(
            "Not authorized to update this club".into(),
        ));
    }

    let updated = sqlx::query_as::<_, Club>(&format!(
        r#"
        UPDATE clubs
        SET name = COALESCE(?1, name),
            description = COALESCE(?2, description),
            category = COALESCE(?3, category),
            is_private = COALESCE(?4, is_private),
            invite_code = COALESCE(?5, invite_code)
        WHERE id = ?6
        RETURNING {CLUB_COLUMNS}
        "#
    ))
    .bind(patch.name.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.category.as_deref())
    .bind(patch.is_private)
    .bind(patch.invite_code.as_deref())
    .bind(club_id)
    .fetch_one(db)
    .await?;

    Ok(updated)
}
