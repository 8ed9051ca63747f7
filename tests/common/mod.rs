#![allow(dead_code)]

use bookclub_server::db;
use bookclub_server::models::book::CreateBookDto;
use bookclub_server::models::club::CreateClubDto;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

// Single connection so the in-memory database is shared across queries.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Err creating in-memory pool");

    db::MIGRATOR.run(&pool).await.expect("Err running migrations");

    pool
}

pub async fn seed_user(db: &SqlitePool, username: &str) -> i64 {
    db::users::create_user(
        db,
        username,
        &format!("{username}@example.com"),
        "not-a-real-hash",
        None,
    )
    .await
    .expect("Err seeding user")
    .id
}

pub async fn seed_book(db: &SqlitePool, proposer: i64, total_pages: i64) -> i64 {
    db::books::propose_book(
        db,
        proposer,
        &CreateBookDto {
            title: "The Dispossessed".into(),
            author: "Ursula K. Le Guin".into(),
            description: None,
            isbn: None,
            cover_image: None,
            total_pages,
        },
    )
    .await
    .expect("Err seeding book")
    .id
}

pub async fn seed_club(
    db: &SqlitePool,
    admin: i64,
    is_private: bool,
    invite_code: Option<&str>,
) -> i64 {
    db::clubs::create_club(
        db,
        admin,
        &CreateClubDto {
            name: "Night Readers".into(),
            description: None,
            category: None,
            is_private,
            invite_code: invite_code.map(str::to_owned),
        },
    )
    .await
    .expect("Err seeding club")
    .id
}
