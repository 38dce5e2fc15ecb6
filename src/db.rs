use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::info;

use crate::config::AnalyticsConfig;
use crate::error::Result;

pub type DbPool = SqlitePool;

/// How long a writer waits on another connection's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared handle for every entry point: the pool plus the loaded config
pub struct AppState {
  pub db: DbPool,
  pub config: AnalyticsConfig,
}

impl AppState {
  pub fn new(db: DbPool, config: AnalyticsConfig) -> Self {
    Self { db, config }
  }

  /// Load config from the environment, connect and migrate
  pub async fn from_env() -> Result<Self> {
    let config = AnalyticsConfig::from_env()?;
    let db = initialize_db(&config).await?;
    Ok(Self::new(db, config))
  }
}

/// WAL lets readers run beside the single writer; the busy timeout makes
/// concurrent writers queue instead of failing with SQLITE_BUSY
pub fn connect_options(config: &AnalyticsConfig) -> Result<SqliteConnectOptions> {
  let options = SqliteConnectOptions::from_str(&config.database_url)?
    .journal_mode(SqliteJournalMode::Wal)
    .busy_timeout(BUSY_TIMEOUT);
  Ok(options)
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &AnalyticsConfig) -> Result<DbPool> {
  info!("Initializing database at: {}", config.database_url);

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect_with(connect_options(config)?)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}

/// Start a transaction holding the write lock from its first statement.
///
/// A deferred transaction that reads and then writes cannot wait for the lock
/// (SQLite fails the upgrade immediately), so every recompute begins here.
pub async fn begin_write(pool: &DbPool) -> Result<Transaction<'static, Sqlite>> {
  let tx = pool.begin_with("BEGIN IMMEDIATE").await?;
  Ok(tx)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_connect_options_accept_default_url() {
    assert!(connect_options(&AnalyticsConfig::default()).is_ok());
  }

  #[tokio::test]
  async fn test_file_db_uses_wal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = AnalyticsConfig {
      database_url: format!("sqlite://{}?mode=rwc", dir.path().join("wal.db").display()),
      ..AnalyticsConfig::default()
    };

    let pool = initialize_db(&config).await.expect("file db");
    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
      .fetch_one(&pool)
      .await
      .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");

    pool.close().await;
  }
}
