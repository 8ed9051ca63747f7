mod common;

use bookclub_server::api::api_error::ApiError;
use bookclub_server::db::polls;
use bookclub_server::models::poll::{CreatePollDto, PollStatus};
use common::{seed_club, seed_user, test_pool};
use sqlx::SqlitePool;

async fn seed_poll(db: &SqlitePool, creator: i64, club_id: i64) -> i64 {
    polls::create_poll(
        db,
        creator,
        &CreatePollDto {
            question: "Next month's book?".into(),
            club_id,
            options: vec!["Dune".into(), "Solaris".into(), "Roadside Picnic".into()],
        },
    )
    .await
    .expect("Err seeding poll")
    .id
}

#[tokio::test]
async fn options_start_empty_and_ordered() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let club = seed_club(&db, admin, false, None).await;
    let poll = seed_poll(&db, admin, club).await;

    let options = polls::results(&db, poll).await.unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].text, "Dune");
    assert_eq!(options[2].text, "Roadside Picnic");
    assert!(options.iter().all(|o| o.votes == 0));
}

// A voter holds exactly one selection. Re-voting the same option changes
// nothing; voting another option moves the selection.
#[tokio::test]
async fn single_choice_invariant() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let voter = seed_user(&db, "ben").await;
    let club = seed_club(&db, admin, false, None).await;
    let poll = seed_poll(&db, admin, club).await;

    polls::cast_vote(&db, poll, voter, 1).await.unwrap();
    assert_eq!(polls::voter_option(&db, poll, voter).await.unwrap(), Some(1));

    polls::cast_vote(&db, poll, voter, 1).await.unwrap();
    let options = polls::results(&db, poll).await.unwrap();
    let total: i64 = options.iter().map(|o| o.votes).sum();
    assert_eq!(total, 1);

    polls::cast_vote(&db, poll, voter, 2).await.unwrap();
    let options = polls::results(&db, poll).await.unwrap();
    assert_eq!(options[1].votes, 0);
    assert_eq!(options[2].votes, 1);
    let total: i64 = options.iter().map(|o| o.votes).sum();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn option_index_is_strictly_validated() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let club = seed_club(&db, admin, false, None).await;
    let poll = seed_poll(&db, admin, club).await;

    let err = polls::cast_vote(&db, poll, admin, 3).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = polls::cast_vote(&db, poll, admin, -1).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn voting_on_missing_poll_is_not_found() {
    let db = test_pool().await;
    let voter = seed_user(&db, "ben").await;

    let err = polls::cast_vote(&db, 999, voter, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn closed_poll_rejects_votes() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let voter = seed_user(&db, "ben").await;
    let club = seed_club(&db, admin, false, None).await;
    let poll = seed_poll(&db, admin, club).await;

    // Only the creator may close.
    let err = polls::close_poll(&db, poll, voter).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let closed = polls::close_poll(&db, poll, admin).await.unwrap();
    assert_eq!(closed.status, PollStatus::Closed);

    let err = polls::cast_vote(&db, poll, voter, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn tallies_count_each_voter_once() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let ben = seed_user(&db, "ben").await;
    let cleo = seed_user(&db, "cleo").await;
    let club = seed_club(&db, admin, false, None).await;
    let poll = seed_poll(&db, admin, club).await;

    polls::cast_vote(&db, poll, admin, 0).await.unwrap();
    polls::cast_vote(&db, poll, ben, 0).await.unwrap();
    polls::cast_vote(&db, poll, cleo, 2).await.unwrap();

    let options = polls::results(&db, poll).await.unwrap();
    assert_eq!(options[0].votes, 2);
    assert_eq!(options[1].votes, 0);
    assert_eq!(options[2].votes, 1);
}
