//! Session fact upserter

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::workout::recompute_workout_fact;
use super::RecomputeOutcome;
use crate::aggregate::SessionTotals;
use crate::db::begin_write;
use crate::error::Result;
use crate::models::{Session, SessionFact, SetLog};
use crate::rollup::recompute_athlete_day;

/// Recompute the fact row for one session from its current set logs.
///
/// A missing session is a no-op (`SourceMissing`), not an error. On success
/// the athlete/day rollup is refreshed inline before returning. If the
/// session moved to another day or athlete, the day it left is refreshed too,
/// and the facts of its workout logs are rebuilt so they carry the new
/// session date and owner.
pub async fn recompute_session_fact(
  pool: &SqlitePool,
  session_id: &str,
  ripple_forward: bool,
) -> Result<RecomputeOutcome> {
  let mut tx = begin_write(pool).await?;

  let session: Option<Session> = sqlx::query_as(
    r#"
    SELECT id, org_id, athlete_id, session_date, completion_pct, training_location_id
    FROM sessions
    WHERE id = ?1
    "#,
  )
  .bind(session_id)
  .fetch_optional(&mut *tx)
  .await?;

  let Some(session) = session else {
    tx.rollback().await?;
    warn!(session_id, "Session not found, skipping fact recompute");
    return Ok(RecomputeOutcome::SourceMissing);
  };

  let sets: Vec<SetLog> = sqlx::query_as(
    "SELECT reps, load_kg, duration_s, rpe FROM set_logs WHERE session_id = ?1",
  )
  .bind(session_id)
  .fetch_all(&mut *tx)
  .await?;

  let previous: Option<(String, String, NaiveDate)> = sqlx::query_as(
    "SELECT org_id, athlete_id, session_date FROM session_facts WHERE session_id = ?1",
  )
  .bind(session_id)
  .fetch_optional(&mut *tx)
  .await?;

  let totals = SessionTotals::compute(&sets);

  sqlx::query(
    r#"
    INSERT INTO session_facts (
      session_id, org_id, athlete_id, session_date, training_location_id,
      total_sets, total_volume_kg, total_duration_s, avg_rpe, completion_pct, computed_at
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT(session_id) DO UPDATE SET
      org_id = excluded.org_id,
      athlete_id = excluded.athlete_id,
      session_date = excluded.session_date,
      training_location_id = excluded.training_location_id,
      total_sets = excluded.total_sets,
      total_volume_kg = excluded.total_volume_kg,
      total_duration_s = excluded.total_duration_s,
      avg_rpe = excluded.avg_rpe,
      completion_pct = excluded.completion_pct,
      computed_at = excluded.computed_at
    "#,
  )
  .bind(&session.id)
  .bind(&session.org_id)
  .bind(&session.athlete_id)
  .bind(session.session_date)
  .bind(&session.training_location_id)
  .bind(totals.total_sets)
  .bind(totals.total_volume_kg)
  .bind(totals.total_duration_s)
  .bind(totals.avg_rpe)
  .bind(session.completion_pct)
  .bind(Utc::now())
  .execute(&mut *tx)
  .await?;

  tx.commit().await?;

  debug!(
    session_id,
    total_sets = totals.total_sets,
    total_volume_kg = totals.total_volume_kg,
    "Session fact upserted"
  );

  if let Some((org_id, athlete_id, day)) = previous {
    if org_id != session.org_id || athlete_id != session.athlete_id || day != session.session_date {
      recompute_athlete_day(pool, &org_id, day, Some(&athlete_id), ripple_forward).await?;
      resync_workout_facts(pool, session_id).await?;
    }
  }

  recompute_athlete_day(
    pool,
    &session.org_id,
    session.session_date,
    Some(&session.athlete_id),
    ripple_forward,
  )
  .await?;

  info!(session_id, day = %session.session_date, "Session fact recomputed");

  Ok(RecomputeOutcome::Updated)
}

/// Workout facts denormalize the session's date, org and athlete
async fn resync_workout_facts(pool: &SqlitePool, session_id: &str) -> Result<()> {
  let log_ids: Vec<String> = sqlx::query_scalar("SELECT id FROM workout_logs WHERE session_id = ?1")
    .bind(session_id)
    .fetch_all(pool)
    .await?;

  for log_id in &log_ids {
    recompute_workout_fact(pool, log_id).await?;
  }

  debug!(session_id, workout_logs = log_ids.len(), "Workout facts resynced after session move");
  Ok(())
}

/// Reconcile a session that may have been deleted.
///
/// Behaves like [`recompute_session_fact`] while the session exists. Once it is
/// gone, the stale fact is removed and the day it belonged to is refreshed.
pub async fn retire_session_fact(
  pool: &SqlitePool,
  session_id: &str,
  ripple_forward: bool,
) -> Result<RecomputeOutcome> {
  let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM sessions WHERE id = ?1")
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

  if exists.is_some() {
    return recompute_session_fact(pool, session_id, ripple_forward).await;
  }

  let removed: Option<(String, String, NaiveDate)> = sqlx::query_as(
    "DELETE FROM session_facts WHERE session_id = ?1 RETURNING org_id, athlete_id, session_date",
  )
  .bind(session_id)
  .fetch_optional(pool)
  .await?;

  match removed {
    Some((org_id, athlete_id, day)) => {
      recompute_athlete_day(pool, &org_id, day, Some(&athlete_id), ripple_forward).await?;
      info!(session_id, day = %day, "Session fact retired");
      Ok(RecomputeOutcome::Retired)
    }
    None => {
      warn!(session_id, "Session and fact both absent, nothing to retire");
      Ok(RecomputeOutcome::SourceMissing)
    }
  }
}

pub async fn load_session_fact(pool: &SqlitePool, session_id: &str) -> Result<Option<SessionFact>> {
  let fact = sqlx::query_as::<_, SessionFact>(
    r#"
    SELECT session_id, org_id, athlete_id, session_date, training_location_id,
           total_sets, total_volume_kg, total_duration_s, avg_rpe, completion_pct, computed_at
    FROM session_facts
    WHERE session_id = ?1
    "#,
  )
  .bind(session_id)
  .fetch_optional(pool)
  .await?;

  Ok(fact)
}
