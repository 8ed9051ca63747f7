pub mod books;
pub mod clubs;
pub mod discussions;
pub mod meetings;
pub mod polls;
pub mod progress;
pub mod quotes;
pub mod users;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error as SqlxError, SqlitePool};
use std::str::FromStr;

pub type DbPool = SqlitePool;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

pub async fn init_db_pool(db_url: &str) -> Result<DbPool, SqlxError> {
    let connection_options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connection_options)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}
