use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workout log joined with its parent session and static workout definition
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutLog {
  pub id: String,
  pub session_id: String,
  pub workout_id: String,
  pub result_primary: Option<f64>,
  // Resolved through joins
  pub org_id: String,
  pub athlete_id: String,
  pub session_date: NaiveDate,
  pub workout_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutRoundLog {
  pub duration_s: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutLogEntry {
  pub reps: Option<i64>,
}
