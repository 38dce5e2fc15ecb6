//! Workout fact upserter
//!
//! Workout facts do not feed the day rollup: day volume and time are defined
//! on session totals only, so a session holding several workout logs plus
//! free sets is not counted twice.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::RecomputeOutcome;
use crate::aggregate::WorkoutTotals;
use crate::db::begin_write;
use crate::error::Result;
use crate::models::{WorkoutFact, WorkoutLog, WorkoutLogEntry, WorkoutRoundLog};

/// Recompute the fact row for one workout log from its rounds and entries
pub async fn recompute_workout_fact(pool: &SqlitePool, workout_log_id: &str) -> Result<RecomputeOutcome> {
  let mut tx = begin_write(pool).await?;

  let log: Option<WorkoutLog> = sqlx::query_as(
    r#"
    SELECT wl.id, wl.session_id, wl.workout_id, wl.result_primary,
           s.org_id, s.athlete_id, s.session_date, w.workout_type
    FROM workout_logs wl
    JOIN sessions s ON s.id = wl.session_id
    JOIN workouts w ON w.id = wl.workout_id
    WHERE wl.id = ?1
    "#,
  )
  .bind(workout_log_id)
  .fetch_optional(&mut *tx)
  .await?;

  // Parent session or workout definition gone counts as missing too
  let Some(log) = log else {
    tx.rollback().await?;
    warn!(workout_log_id, "Workout log not found, skipping fact recompute");
    return Ok(RecomputeOutcome::SourceMissing);
  };

  let rounds: Vec<WorkoutRoundLog> =
    sqlx::query_as("SELECT duration_s FROM workout_round_logs WHERE workout_log_id = ?1")
      .bind(workout_log_id)
      .fetch_all(&mut *tx)
      .await?;

  let entries: Vec<WorkoutLogEntry> =
    sqlx::query_as("SELECT reps FROM workout_log_entries WHERE workout_log_id = ?1")
      .bind(workout_log_id)
      .fetch_all(&mut *tx)
      .await?;

  let totals = WorkoutTotals::compute(&rounds, &entries);

  sqlx::query(
    r#"
    INSERT INTO workout_facts (
      workout_log_id, org_id, athlete_id, workout_id, workout_type, session_date,
      result_primary, duration_s, work_density, computed_at
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
    ON CONFLICT(workout_log_id) DO UPDATE SET
      org_id = excluded.org_id,
      athlete_id = excluded.athlete_id,
      workout_id = excluded.workout_id,
      workout_type = excluded.workout_type,
      session_date = excluded.session_date,
      result_primary = excluded.result_primary,
      duration_s = excluded.duration_s,
      work_density = excluded.work_density,
      computed_at = excluded.computed_at
    "#,
  )
  .bind(&log.id)
  .bind(&log.org_id)
  .bind(&log.athlete_id)
  .bind(&log.workout_id)
  .bind(&log.workout_type)
  .bind(log.session_date)
  .bind(log.result_primary)
  .bind(totals.duration_s)
  .bind(totals.work_density)
  .bind(Utc::now())
  .execute(&mut *tx)
  .await?;

  tx.commit().await?;

  debug!(workout_log_id, rounds = rounds.len(), reps = totals.total_reps, "Workout fact upserted");
  info!(workout_log_id, workout_type = %log.workout_type, "Workout fact recomputed");

  Ok(RecomputeOutcome::Updated)
}

/// Remove the fact of a deleted workout log, or recompute it if still present
pub async fn retire_workout_fact(pool: &SqlitePool, workout_log_id: &str) -> Result<RecomputeOutcome> {
  let outcome = recompute_workout_fact(pool, workout_log_id).await?;
  if outcome == RecomputeOutcome::Updated {
    return Ok(outcome);
  }

  let removed = sqlx::query("DELETE FROM workout_facts WHERE workout_log_id = ?1")
    .bind(workout_log_id)
    .execute(pool)
    .await?
    .rows_affected();

  if removed > 0 {
    info!(workout_log_id, "Workout fact retired");
    Ok(RecomputeOutcome::Retired)
  } else {
    Ok(RecomputeOutcome::SourceMissing)
  }
}

pub async fn load_workout_fact(pool: &SqlitePool, workout_log_id: &str) -> Result<Option<WorkoutFact>> {
  let fact = sqlx::query_as::<_, WorkoutFact>(
    r#"
    SELECT workout_log_id, org_id, athlete_id, workout_id, workout_type, session_date,
           result_primary, duration_s, work_density, computed_at
    FROM workout_facts
    WHERE workout_log_id = ?1
    "#,
  )
  .bind(workout_log_id)
  .fetch_optional(pool)
  .await?;

  Ok(fact)
}
