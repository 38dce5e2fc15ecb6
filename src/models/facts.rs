use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-session aggregate, keyed 1:1 by session_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionFact {
  pub session_id: String,
  pub org_id: String,
  pub athlete_id: String,
  pub session_date: NaiveDate,
  pub training_location_id: Option<String>,
  pub total_sets: i64,
  pub total_volume_kg: f64,
  pub total_duration_s: i64,
  pub avg_rpe: Option<f64>,
  pub completion_pct: f64,
  pub computed_at: DateTime<Utc>,
}

/// Per-workout-log aggregate, keyed 1:1 by workout_log_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutFact {
  pub workout_log_id: String,
  pub org_id: String,
  pub athlete_id: String,
  pub workout_id: String,
  pub workout_type: String,
  pub session_date: NaiveDate,
  pub result_primary: Option<f64>,
  /// None when the log has no rounds
  pub duration_s: Option<i64>,
  /// Entry reps per second of round time
  pub work_density: Option<f64>,
  pub computed_at: DateTime<Utc>,
}

/// One row per (athlete, day)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AthleteDayRollup {
  pub athlete_id: String,
  pub day: NaiveDate,
  pub org_id: String,
  pub day_volume_kg: f64,
  pub day_time_s: i64,
  pub rolling_7d_volume_kg: f64,
  pub rolling_28d_volume_kg: f64,
  // Owned by the wellness collaborator
  pub hrv_ms: Option<f64>,
  pub sleep_h: Option<f64>,
  pub wellness_score: Option<f64>,
  pub computed_at: DateTime<Utc>,
}
