use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, prelude::*};

pub fn init_tracing() {
    let file_appender = rolling::daily("logs", "bookclub.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_filter = EnvFilter::new("info");

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_thread_ids(true)
        .with_timer(UtcTime::rfc_3339())
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(non_blocking_file)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // The appender guard must outlive the subscriber.
    std::mem::forget(_guard);
}

pub async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::warn!("shutdown signal received");
}
