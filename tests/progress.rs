mod common;

use bookclub_server::api::api_error::ApiError;
use bookclub_server::db::progress;
use bookclub_server::models::progress::{AddNoteDto, ProgressStatus, UpsertProgressDto};
use common::{seed_book, seed_user, test_pool};
use std::time::Duration;

fn upsert_dto(book_id: i64, current_page: i64) -> UpsertProgressDto {
    UpsertProgressDto {
        book_id,
        current_page,
        notes: None,
    }
}

#[tokio::test]
async fn page_is_validated_against_the_book() {
    let db = test_pool().await;
    let user = seed_user(&db, "amira").await;
    let book = seed_book(&db, user, 300).await;

    let err = progress::upsert_progress(&db, user, &upsert_dto(book, 301))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = progress::upsert_progress(&db, user, &upsert_dto(book, -1))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // Boundary pages are fine.
    progress::upsert_progress(&db, user, &upsert_dto(book, 0))
        .await
        .unwrap();
    let saved = progress::upsert_progress(&db, user, &upsert_dto(book, 300))
        .await
        .unwrap();
    assert_eq!(saved.current_page, 300);
}

#[tokio::test]
async fn missing_book_is_not_found() {
    let db = test_pool().await;
    let user = seed_user(&db, "amira").await;

    let err = progress::upsert_progress(&db, user, &upsert_dto(999, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// One record per (user, book): repeated upserts update the same row.
#[tokio::test]
async fn upsert_keeps_one_record_per_user_and_book() {
    let db = test_pool().await;
    let user = seed_user(&db, "amira").await;
    let book = seed_book(&db, user, 300).await;

    let first = progress::upsert_progress(&db, user, &upsert_dto(book, 50))
        .await
        .unwrap();
    let second = progress::upsert_progress(&db, user, &upsert_dto(book, 120))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.current_page, 120);
    assert_eq!(progress::my_progress(&db, user).await.unwrap().len(), 1);

    let read_back = progress::for_book(&db, user, book).await.unwrap();
    assert_eq!(read_back.current_page, 120);
}

#[tokio::test]
async fn scratch_notes_survive_upserts_without_notes() {
    let db = test_pool().await;
    let user = seed_user(&db, "amira").await;
    let book = seed_book(&db, user, 300).await;

    progress::upsert_progress(
        &db,
        user,
        &UpsertProgressDto {
            book_id: book,
            current_page: 50,
            notes: Some("slow start".into()),
        },
    )
    .await
    .unwrap();

    let updated = progress::upsert_progress(&db, user, &upsert_dto(book, 80))
        .await
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("slow start"));

    let replaced = progress::upsert_progress(
        &db,
        user,
        &UpsertProgressDto {
            book_id: book,
            current_page: 90,
            notes: Some("picking up".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(replaced.notes.as_deref(), Some("picking up"));
}

#[tokio::test]
async fn notes_are_append_only_and_owner_gated() {
    let db = test_pool().await;
    let owner = seed_user(&db, "amira").await;
    let other = seed_user(&db, "ben").await;
    let book = seed_book(&db, owner, 300).await;

    let record = progress::upsert_progress(&db, owner, &upsert_dto(book, 50))
        .await
        .unwrap();

    let note = AddNoteDto {
        content: "Chapter three twist".into(),
        page: 48,
    };

    let err = progress::add_note(&db, record.id, other, &note)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    progress::add_note(&db, record.id, owner, &note).await.unwrap();
    let notes = progress::add_note(
        &db,
        record.id,
        owner,
        &AddNoteDto {
            content: "Called it".into(),
            page: 60,
        },
    )
    .await
    .unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].content, "Chapter three twist");
    assert_eq!(notes[1].page, 60);
}

// Unlike a book's start/end dates, the completed date is restamped on every
// transition into completed.
#[tokio::test]
async fn completed_date_is_overwritten_on_each_completion() {
    let db = test_pool().await;
    let user = seed_user(&db, "amira").await;
    let book = seed_book(&db, user, 300).await;

    let record = progress::upsert_progress(&db, user, &upsert_dto(book, 300))
        .await
        .unwrap();

    let done = progress::update_status(&db, record.id, user, ProgressStatus::Completed)
        .await
        .unwrap();
    let first_date = done.completed_date.expect("completed date set");

    let reread = progress::update_status(&db, record.id, user, ProgressStatus::Reading)
        .await
        .unwrap();
    assert_eq!(reread.completed_date, Some(first_date));

    tokio::time::sleep(Duration::from_millis(10)).await;

    let done_again = progress::update_status(&db, record.id, user, ProgressStatus::Completed)
        .await
        .unwrap();
    let second_date = done_again.completed_date.expect("completed date set");
    assert!(second_date > first_date);
}

#[tokio::test]
async fn status_update_is_owner_gated() {
    let db = test_pool().await;
    let owner = seed_user(&db, "amira").await;
    let other = seed_user(&db, "ben").await;
    let book = seed_book(&db, owner, 300).await;

    let record = progress::upsert_progress(&db, owner, &upsert_dto(book, 10))
        .await
        .unwrap();

    let err = progress::update_status(&db, record.id, other, ProgressStatus::OnHold)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let held = progress::update_status(&db, record.id, owner, ProgressStatus::OnHold)
        .await
        .unwrap();
    assert_eq!(held.status, ProgressStatus::OnHold);
    assert!(held.completed_date.is_none());
}
