mod common;

use bookclub_server::api::api_error::ApiError;
use bookclub_server::db::{discussions, meetings};
use bookclub_server::models::discussion::CreateDiscussionDto;
use bookclub_server::models::meeting::CreateMeetingDto;
use common::{seed_book, seed_club, seed_user, test_pool};

#[tokio::test]
async fn replies_append_in_order() {
    let db = test_pool().await;
    let author = seed_user(&db, "amira").await;
    let other = seed_user(&db, "ben").await;
    let book = seed_book(&db, author, 300).await;

    let discussion = discussions::create_discussion(
        &db,
        author,
        &CreateDiscussionDto {
            book_id: book,
            title: "That ending".into(),
            content: "Did anyone else see it coming?".into(),
        },
    )
    .await
    .unwrap();

    discussions::add_reply(&db, discussion.id, other, "Not at all").await.unwrap();
    let replies = discussions::add_reply(&db, discussion.id, author, "Same").await.unwrap();

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].content, "Not at all");
    assert_eq!(replies[1].username, "amira");
}

#[tokio::test]
async fn delete_is_author_only() {
    let db = test_pool().await;
    let author = seed_user(&db, "amira").await;
    let other = seed_user(&db, "ben").await;
    let book = seed_book(&db, author, 300).await;

    let discussion = discussions::create_discussion(
        &db,
        author,
        &CreateDiscussionDto {
            book_id: book,
            title: "That ending".into(),
            content: "Did anyone else see it coming?".into(),
        },
    )
    .await
    .unwrap();

    let err = discussions::delete_discussion(&db, discussion.id, other)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    discussions::delete_discussion(&db, discussion.id, author)
        .await
        .unwrap();
    let err = discussions::get_discussion(&db, discussion.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn rsvp_is_idempotent() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let member = seed_user(&db, "ben").await;
    let club = seed_club(&db, admin, false, None).await;

    let meeting = meetings::create_meeting(
        &db,
        &CreateMeetingDto {
            title: "October wrap-up".into(),
            club_id: club,
            meeting_date: None,
            time: Some("19:00".into()),
            description: None,
        },
    )
    .await
    .unwrap();

    meetings::rsvp(&db, meeting.id, member).await.unwrap();
    meetings::rsvp(&db, meeting.id, member).await.unwrap();

    let attendees = meetings::attendees(&db, meeting.id).await.unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0].username, "ben");
}

#[tokio::test]
async fn meeting_requires_existing_club() {
    let db = test_pool().await;

    let err = meetings::create_meeting(
        &db,
        &CreateMeetingDto {
            title: "Ghost meeting".into(),
            club_id: 999,
            meeting_date: None,
            time: None,
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
