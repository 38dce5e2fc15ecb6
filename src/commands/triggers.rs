//! Recompute triggers emitted by the logging collaborators

use serde::Serialize;
use tracing::info;

use crate::db::AppState;
use crate::error::Result;
use crate::facts::{self, RecomputeOutcome};
use crate::rollup;
use crate::validation::{parse_date, parse_id, parse_optional_id, DateRange};

/// Called after any write to a session or its set logs
pub async fn recompute_for_session(state: &AppState, session_id: &str) -> Result<RecomputeOutcome> {
  let session_id = parse_id("session_id", session_id)?;
  facts::recompute_session_fact(&state.db, &session_id, state.config.ripple_forward).await
}

/// Called after any write to a workout log, its rounds or its entries
pub async fn recompute_for_workout_log(state: &AppState, workout_log_id: &str) -> Result<RecomputeOutcome> {
  let workout_log_id = parse_id("workout_log_id", workout_log_id)?;
  facts::recompute_workout_fact(&state.db, &workout_log_id).await
}

/// Direct day recompute for repairs. Returns the number of athletes refreshed.
pub async fn recompute_daily(
  state: &AppState,
  org_id: &str,
  day: &str,
  athlete_id: Option<&str>,
) -> Result<usize> {
  let org_id = parse_id("org_id", org_id)?;
  let day = parse_date("day", day)?;
  let athlete_id = parse_optional_id("athlete_id", athlete_id)?;

  rollup::recompute_athlete_day(
    &state.db,
    &org_id,
    day,
    athlete_id.as_deref(),
    state.config.ripple_forward,
  )
  .await
}

/// Called by the collaborator that deletes a session
pub async fn retire_session(state: &AppState, session_id: &str) -> Result<RecomputeOutcome> {
  let session_id = parse_id("session_id", session_id)?;
  facts::retire_session_fact(&state.db, &session_id, state.config.ripple_forward).await
}

/// Called by the collaborator that deletes a workout log
pub async fn retire_workout_log(state: &AppState, workout_log_id: &str) -> Result<RecomputeOutcome> {
  let workout_log_id = parse_id("workout_log_id", workout_log_id)?;
  facts::retire_workout_fact(&state.db, &workout_log_id).await
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BackfillSummary {
  pub days: usize,
  pub athlete_days: usize,
}

/// Recompute every day of the range in ascending order so each day's rolling
/// windows read already-refreshed earlier days
pub async fn backfill_range(state: &AppState, org_id: &str, from: &str, to: &str) -> Result<BackfillSummary> {
  let org_id = parse_id("org_id", org_id)?;
  let range = DateRange::parse(from, to)?;

  let mut summary = BackfillSummary { days: 0, athlete_days: 0 };
  for day in range.days() {
    summary.athlete_days +=
      rollup::recompute_athlete_day(&state.db, &org_id, day, None, state.config.ripple_forward).await?;
    summary.days += 1;
  }

  info!(
    org_id = %org_id,
    from = %range.from,
    to = %range.to,
    athlete_days = summary.athlete_days,
    "Backfill complete"
  );

  Ok(summary)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::AnalyticsError;
  use crate::rollup::load_rollup;
  use crate::test_utils::*;

  #[tokio::test]
  async fn test_malformed_ids_rejected_before_storage() {
    let state = setup_test_state().await;
    // A closed pool would turn any storage access into a Database error
    state.db.close().await;

    let err = recompute_for_session(&state, "not-a-uuid").await.unwrap_err();
    assert!(err.is_validation());

    let err = recompute_daily(&state, &new_id(), "2024-1-10", None).await.unwrap_err();
    assert!(err.is_validation());

    let err = recompute_daily(&state, &new_id(), "2024-01-10", Some("athlete")).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::Validation(msg) if msg.contains("athlete_id")));

    let err = backfill_range(&state, &new_id(), "2024-01-10", "2024-01-01").await.unwrap_err();
    assert!(err.is_validation());
  }

  #[tokio::test]
  async fn test_uppercase_stored_ids_still_match() {
    let state = setup_test_state().await;
    let pool = &state.db;
    let org = new_id().to_uppercase();
    let athlete = seed_athlete(pool, &org, "Ada").await;
    let session = new_id().to_uppercase();

    sqlx::query(
      "INSERT INTO sessions (id, org_id, athlete_id, session_date, completion_pct) VALUES (?1, ?2, ?3, ?4, 100.0)",
    )
    .bind(&session)
    .bind(&org)
    .bind(&athlete)
    .bind(date("2024-01-10"))
    .execute(pool)
    .await
    .unwrap();
    seed_loaded_set(pool, &session, 5, 20.0).await;

    let outcome = recompute_for_session(&state, &format!(" {} ", session)).await.unwrap();
    assert_eq!(outcome, RecomputeOutcome::Updated);

    let rollup = load_rollup(pool, &athlete, date("2024-01-10")).await.unwrap().unwrap();
    assert_eq!(rollup.org_id, org);
    assert_eq!(rollup.day_volume_kg, 100.0);

    let summary = recompute_daily(&state, &org, "2024-01-10", None).await.unwrap();
    assert_eq!(summary, 1);
  }

  #[tokio::test]
  async fn test_storage_failure_propagates() {
    let state = setup_test_state().await;
    state.db.close().await;

    let err = recompute_for_session(&state, &new_id()).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::Database(_)));
  }

  #[tokio::test]
  async fn test_backfill_rebuilds_rollups_in_order() {
    let state = setup_test_state().await;
    let pool = &state.db;
    let org = new_id();
    let athlete = seed_athlete(pool, &org, "Ada").await;

    for day in ["2024-01-01", "2024-01-03"] {
      let session = seed_session(pool, &org, &athlete, day, 100.0).await;
      seed_loaded_set(pool, &session, 10, 10.0).await;
      recompute_for_session(&state, &session).await.unwrap();
    }

    // Simulate drift in the derived table
    sqlx::query("UPDATE athlete_day_rollups SET day_volume_kg = 0, rolling_7d_volume_kg = 0")
      .execute(pool)
      .await
      .unwrap();

    let summary = backfill_range(&state, &org, "2024-01-01", "2024-01-07").await.unwrap();
    assert_eq!(summary, BackfillSummary { days: 7, athlete_days: 2 });

    let day3 = load_rollup(pool, &athlete, date("2024-01-03")).await.unwrap().unwrap();
    assert_eq!(day3.day_volume_kg, 100.0);
    assert_eq!(day3.rolling_7d_volume_kg, 200.0);
  }

  #[tokio::test]
  async fn test_recompute_daily_single_athlete() {
    let state = setup_test_state().await;
    let pool = &state.db;
    let org = new_id();
    let athlete = seed_athlete(pool, &org, "Ada").await;
    let session = seed_session(pool, &org, &athlete, "2024-01-10", 100.0).await;
    seed_loaded_set(pool, &session, 2, 30.0).await;
    recompute_for_session(&state, &session).await.unwrap();

    let refreshed = recompute_daily(&state, &org, "2024-01-10", Some(&athlete)).await.unwrap();
    assert_eq!(refreshed, 1);

    let rollup = load_rollup(pool, &athlete, date("2024-01-10")).await.unwrap().unwrap();
    assert_eq!(rollup.day_volume_kg, 60.0);
  }
}
