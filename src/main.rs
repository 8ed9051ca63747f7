use bookclub_server::services::startup::{init_tracing, shutdown_signal};
use bookclub_server::{AppState, app, config::Config, db};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Arc::new(Config::from_env()?);
    let db_pool = db::init_db_pool(&config.database_url)
        .await
        .expect("Err connecting to database");

    let state = AppState {
        db_pool,
        config: Arc::clone(&config),
    };

    let app = app(state).await.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let listener = TcpListener::bind(format!("{}:{}", &config.host, &config.port)).await?;

    tracing::debug!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
