use std::str::FromStr;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::log::LevelFilter;

pub async fn create_pool(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let url = if db_path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{db_path}")
    };

    let connect_options = SqliteConnectOptions::from_str(&url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .log_slow_statements(LevelFilter::Warn, Duration::from_secs(60));

    // A single connection keeps writers serialized (and keeps an in-memory
    // database from being dropped between pool checkouts in tests).
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
}
