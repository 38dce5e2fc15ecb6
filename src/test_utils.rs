//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Raw training store seeding (the collaborator side of the engine)
//! - Helper assertions

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::db::AppState;
use crate::models::SetLog;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// In-memory state with default config
pub async fn setup_test_state() -> AppState {
  AppState::new(setup_test_db().await, AnalyticsConfig::default())
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

pub fn new_id() -> String {
  Uuid::new_v4().to_string()
}

pub fn date(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad test date")
}

/// ---------------------------------------------------------------------------
/// Raw Store Seeding
/// ---------------------------------------------------------------------------

pub async fn seed_athlete(pool: &SqlitePool, org_id: &str, display_name: &str) -> String {
  let id = new_id();
  sqlx::query("INSERT INTO athletes (id, org_id, display_name) VALUES (?1, ?2, ?3)")
    .bind(&id)
    .bind(org_id)
    .bind(display_name)
    .execute(pool)
    .await
    .expect("Failed to seed athlete");
  id
}

pub async fn seed_session(
  pool: &SqlitePool,
  org_id: &str,
  athlete_id: &str,
  session_date: &str,
  completion_pct: f64,
) -> String {
  let id = new_id();
  sqlx::query(
    r#"
    INSERT INTO sessions (id, org_id, athlete_id, session_date, completion_pct, training_location_id)
    VALUES (?1, ?2, ?3, ?4, ?5, NULL)
    "#,
  )
  .bind(&id)
  .bind(org_id)
  .bind(athlete_id)
  .bind(date(session_date))
  .bind(completion_pct)
  .execute(pool)
  .await
  .expect("Failed to seed session");
  id
}

pub async fn seed_set(pool: &SqlitePool, session_id: &str, set: SetLog) {
  sqlx::query(
    "INSERT INTO set_logs (session_id, reps, load_kg, duration_s, rpe) VALUES (?1, ?2, ?3, ?4, ?5)",
  )
  .bind(session_id)
  .bind(set.reps)
  .bind(set.load_kg)
  .bind(set.duration_s)
  .bind(set.rpe)
  .execute(pool)
  .await
  .expect("Failed to seed set log");
}

/// Seed a set with just reps and load
pub async fn seed_loaded_set(pool: &SqlitePool, session_id: &str, reps: i64, load_kg: f64) {
  seed_set(
    pool,
    session_id,
    SetLog {
      reps: Some(reps),
      load_kg: Some(load_kg),
      ..SetLog::default()
    },
  )
  .await;
}

pub async fn delete_session(pool: &SqlitePool, session_id: &str) {
  sqlx::query("DELETE FROM set_logs WHERE session_id = ?1")
    .bind(session_id)
    .execute(pool)
    .await
    .expect("Failed to delete set logs");
  sqlx::query("DELETE FROM sessions WHERE id = ?1")
    .bind(session_id)
    .execute(pool)
    .await
    .expect("Failed to delete session");
}

pub async fn seed_workout(pool: &SqlitePool, org_id: &str, name: &str, workout_type: &str) -> String {
  let id = new_id();
  sqlx::query("INSERT INTO workouts (id, org_id, name, workout_type) VALUES (?1, ?2, ?3, ?4)")
    .bind(&id)
    .bind(org_id)
    .bind(name)
    .bind(workout_type)
    .execute(pool)
    .await
    .expect("Failed to seed workout");
  id
}

pub async fn seed_workout_log(
  pool: &SqlitePool,
  session_id: &str,
  workout_id: &str,
  result_primary: Option<f64>,
) -> String {
  let id = new_id();
  sqlx::query(
    "INSERT INTO workout_logs (id, session_id, workout_id, result_primary) VALUES (?1, ?2, ?3, ?4)",
  )
  .bind(&id)
  .bind(session_id)
  .bind(workout_id)
  .bind(result_primary)
  .execute(pool)
  .await
  .expect("Failed to seed workout log");
  id
}

pub async fn seed_round(pool: &SqlitePool, workout_log_id: &str, duration_s: Option<i64>) {
  sqlx::query("INSERT INTO workout_round_logs (workout_log_id, duration_s) VALUES (?1, ?2)")
    .bind(workout_log_id)
    .bind(duration_s)
    .execute(pool)
    .await
    .expect("Failed to seed round log");
}

pub async fn seed_entry(pool: &SqlitePool, workout_log_id: &str, reps: Option<i64>) {
  sqlx::query("INSERT INTO workout_log_entries (workout_log_id, reps) VALUES (?1, ?2)")
    .bind(workout_log_id)
    .bind(reps)
    .execute(pool)
    .await
    .expect("Failed to seed log entry");
}

/// Write a rollup row directly, bypassing the recompute path
pub async fn seed_rollup_day(
  pool: &SqlitePool,
  org_id: &str,
  athlete_id: &str,
  day: NaiveDate,
  day_volume_kg: f64,
) {
  sqlx::query(
    r#"
    INSERT INTO athlete_day_rollups (athlete_id, day, org_id, day_volume_kg, day_time_s, computed_at)
    VALUES (?1, ?2, ?3, ?4, 0, ?5)
    "#,
  )
  .bind(athlete_id)
  .bind(day)
  .bind(org_id)
  .bind(day_volume_kg)
  .bind(Utc::now())
  .execute(pool)
  .await
  .expect("Failed to seed rollup day");
}

/// Readiness values as the wellness collaborator would write them
pub async fn seed_readiness(pool: &SqlitePool, athlete_id: &str, day: NaiveDate, hrv_ms: f64, sleep_h: f64) {
  sqlx::query("UPDATE athlete_day_rollups SET hrv_ms = ?1, sleep_h = ?2 WHERE athlete_id = ?3 AND day = ?4")
    .bind(hrv_ms)
    .bind(sleep_h)
    .bind(athlete_id)
    .bind(day)
    .execute(pool)
    .await
    .expect("Failed to seed readiness");
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('session_facts', 'workout_facts', 'athlete_day_rollups', 'sessions', 'set_logs')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 5, "Expected 5 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_session_with_sets() {
    let pool = setup_test_db().await;
    let org = new_id();
    let athlete = seed_athlete(&pool, &org, "Ada").await;

    let session = seed_session(&pool, &org, &athlete, "2024-01-10", 100.0).await;
    seed_loaded_set(&pool, &session, 5, 50.0).await;
    seed_loaded_set(&pool, &session, 5, 50.0).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM set_logs WHERE session_id = ?1")
      .bind(&session)
      .fetch_one(&pool)
      .await
      .expect("Failed to count set logs");

    assert_eq!(count, 2);

    teardown_test_db(pool).await;
  }
}
