mod common;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bookclub_server::AppState;
use bookclub_server::api::api_error::ApiError;
use bookclub_server::api::users::{login, register};
use bookclub_server::config::Config;
use bookclub_server::models::user::{LoginDto, RegisterDto};
use common::test_pool;
use sqlx::SqlitePool;
use std::sync::Arc;

fn test_state(db_pool: SqlitePool) -> AppState {
    AppState {
        db_pool,
        config: Arc::new(Config {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
        }),
    }
}

fn register_dto(password: &str) -> RegisterDto {
    RegisterDto {
        username: "amira".into(),
        email: "amira@example.com".into(),
        password: password.into(),
        full_name: Some("Amira K".into()),
    }
}

#[tokio::test]
async fn register_requires_all_fields() {
    let state = test_state(test_pool().await);

    let err = register(
        State(state),
        Json(RegisterDto {
            username: "amira".into(),
            email: "amira@example.com".into(),
            password: "".into(),
            full_name: None,
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn register_login_round_trip() {
    let state = test_state(test_pool().await);

    let response = register(State(state.clone()), Json(register_dto("hunter2")))
        .await
        .unwrap()
        .into_response();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same username or email again is a conflict.
    let err = register(State(state.clone()), Json(register_dto("hunter2")))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let response = login(
        State(state.clone()),
        Json(LoginDto {
            email: "amira@example.com".into(),
            password: "hunter2".into(),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let err = login(
        State(state.clone()),
        Json(LoginDto {
            email: "amira@example.com".into(),
            password: "wrong".into(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    let err = login(
        State(state),
        Json(LoginDto {
            email: "nobody@example.com".into(),
            password: "hunter2".into(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}
