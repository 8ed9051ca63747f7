pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

use crate::config::Config;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<Config>,
}

pub async fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::routes().await)
        .with_state(state)
}
