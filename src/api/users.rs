use crate::api::api_error::ApiError;
use crate::api::auth_extractor::AuthUser;
use crate::db::users::{create_user, get_user_by_email, get_user_by_id, joined_clubs};
use crate::models::user::{Claims, LoginDto, RegisterDto, UpdateProfileDto, User};
use crate::{AppState, db};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Please provide all required fields".into(),
        ));
    }

    let db = &state.db_pool;

    let password_hash = hash_password(&payload.password)?;
    let user = create_user(
        db,
        &payload.username,
        &payload.email,
        &password_hash,
        payload.full_name.as_deref(),
    )
    .await?;

    let token = issue_jwt(&user, state.config.jwt_secret.as_bytes())?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("User {} created successfully", user.username),
            "token": token,
            "user": user,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginDto>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = &state.db_pool;

    let user = get_user_by_email(db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized("Invalid email or password".into()))?;

    let token = issue_jwt(&user, state.config.jwt_secret.as_bytes())?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user,
    })))
}

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let user = get_user_by_id(db, claims.sub).await?;
    let clubs = joined_clubs(db, claims.sub).await?;

    Ok(Json(json!({
        "data": user,
        "joined_clubs": clubs,
    })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, ApiError> {
    let db = &state.db_pool;

    let user = db::users::update_profile(db, claims.sub, &payload).await?;
    let clubs = joined_clubs(db, claims.sub).await?;

    Ok(Json(json!({
        "message": "Profile updated",
        "data": user,
        "joined_clubs": clubs,
    })))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Hashing failed: {e}")))?;

    Ok(hash.to_string())
}

fn issue_jwt(user: &User, jwt_secret: &[u8]) -> Result<String, ApiError> {
    let now = Utc::now();
    let exp = now + Duration::hours(24); // token valid for 24 hours

    let claims = Claims {
        sub: user.id,
        role: "user".to_owned(),
        username: user.username.clone(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret),
    )
    .map_err(|e| ApiError::Internal(format!("Token issue failed: {e}")))?;

    Ok(token)
}
