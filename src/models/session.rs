use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Session header as written by the planning collaborator
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
  pub id: String,
  pub org_id: String,
  pub athlete_id: String,
  pub session_date: NaiveDate,
  /// 0-100
  pub completion_pct: f64,
  pub training_location_id: Option<String>,
}

/// One logged set. Any measurement may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SetLog {
  pub reps: Option<i64>,
  pub load_kg: Option<f64>,
  pub duration_s: Option<i64>,
  pub rpe: Option<f64>,
}
