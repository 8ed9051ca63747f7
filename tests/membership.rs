mod common;

use bookclub_server::api::api_error::ApiError;
use bookclub_server::db::clubs;
use bookclub_server::db::users::joined_clubs;
use bookclub_server::models::club::{CreateClubDto, UpdateClubDto};
use common::{seed_book, seed_club, seed_user, test_pool};

#[tokio::test]
async fn private_club_requires_invite_code() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;

    let err = clubs::create_club(
        &db,
        admin,
        &CreateClubDto {
            name: "Secret Society".into(),
            description: None,
            category: None,
            is_private: true,
            invite_code: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));

    // An empty string is as good as absent.
    let err = clubs::create_club(
        &db,
        admin,
        &CreateClubDto {
            name: "Secret Society".into(),
            description: None,
            category: None,
            is_private: true,
            invite_code: Some("".into()),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn creator_is_admin_and_first_member() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let club_id = seed_club(&db, admin, false, None).await;

    let club = clubs::get_club(&db, club_id).await.unwrap();
    assert_eq!(club.admin_id, admin);

    let members = clubs::members(&db, club_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, admin);

    let mine = joined_clubs(&db, admin).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, club_id);
}

#[tokio::test]
async fn invite_code_gating() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let joiner = seed_user(&db, "ben").await;
    let club_id = seed_club(&db, admin, true, Some("XYZ")).await;

    let err = clubs::join_club(&db, club_id, joiner, Some("ABC"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    // No code at all never matches a private club either.
    let err = clubs::join_club(&db, club_id, joiner, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    clubs::join_club(&db, club_id, joiner, Some("XYZ"))
        .await
        .unwrap();

    let members = clubs::members(&db, club_id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn duplicate_join_is_conflict() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let joiner = seed_user(&db, "ben").await;
    let club_id = seed_club(&db, admin, false, None).await;

    clubs::join_club(&db, club_id, joiner, None).await.unwrap();
    let err = clubs::join_club(&db, club_id, joiner, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let err = clubs::join_club(&db, club_id, admin, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn leave_then_rejoin_restores_membership() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let joiner = seed_user(&db, "ben").await;
    let club_id = seed_club(&db, admin, false, None).await;

    clubs::join_club(&db, club_id, joiner, None).await.unwrap();
    clubs::leave_club(&db, club_id, joiner).await.unwrap();

    assert!(!clubs::is_member(&db, club_id, joiner).await.unwrap());
    assert!(joined_clubs(&db, joiner).await.unwrap().is_empty());

    clubs::join_club(&db, club_id, joiner, None).await.unwrap();
    assert!(clubs::is_member(&db, club_id, joiner).await.unwrap());
}

#[tokio::test]
async fn join_missing_club_is_not_found() {
    let db = test_pool().await;
    let joiner = seed_user(&db, "ben").await;

    let err = clubs::join_club(&db, 999, joiner, None).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// The admin seat is not reassigned. The club survives without an admin and
// stays usable for the remaining members.
#[tokio::test]
async fn admin_leaving_leaves_club_adminless() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let joiner = seed_user(&db, "ben").await;
    let late = seed_user(&db, "cleo").await;
    let club_id = seed_club(&db, admin, false, None).await;

    clubs::join_club(&db, club_id, joiner, None).await.unwrap();
    clubs::leave_club(&db, club_id, admin).await.unwrap();

    let club = clubs::get_club(&db, club_id).await.unwrap();
    assert_eq!(club.admin_id, admin);
    assert!(!clubs::is_member(&db, club_id, admin).await.unwrap());

    clubs::join_club(&db, club_id, late, None).await.unwrap();
    let members = clubs::members(&db, club_id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn current_book_is_admin_only_and_history_is_a_set() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let joiner = seed_user(&db, "ben").await;
    let club_id = seed_club(&db, admin, false, None).await;
    let first = seed_book(&db, admin, 300).await;
    let second = seed_book(&db, admin, 250).await;

    clubs::join_club(&db, club_id, joiner, None).await.unwrap();

    let err = clubs::update_current_book(&db, club_id, first, joiner)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    clubs::update_current_book(&db, club_id, first, admin)
        .await
        .unwrap();
    clubs::update_current_book(&db, club_id, second, admin)
        .await
        .unwrap();
    // Re-choosing a previous book must not duplicate it in the history.
    let club = clubs::update_current_book(&db, club_id, first, admin)
        .await
        .unwrap();

    assert_eq!(club.current_book, Some(first));
    let history = clubs::book_history(&db, club_id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn update_club_is_admin_only() {
    let db = test_pool().await;
    let admin = seed_user(&db, "amira").await;
    let joiner = seed_user(&db, "ben").await;
    let club_id = seed_club(&db, admin, false, None).await;

    clubs::join_club(&db, club_id, joiner, None).await.unwrap();

    let patch = UpdateClubDto {
        name: Some("Day Readers".into()),
        description: None,
        category: Some("mystery".into()),
        is_private: None,
        invite_code: None,
    };

    let err = clubs::update_club(&db, club_id, joiner, &patch)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let club = clubs::update_club(&db, club_id, admin, &patch).await.unwrap();
    assert_eq!(club.name, "Day Readers");
    assert_eq!(club.category, "mystery");
    // Untouched fields keep their values.
    assert!(!club.is_private);
}
