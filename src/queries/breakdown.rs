use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::aggregate::{continuous_percentile, mean};
use crate::error::Result;
use crate::validation::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutTypeStats {
  pub workout_type: String,
  pub count: i64,
  /// Interpolated median of result_primary
  pub median_result: Option<f64>,
  pub avg_duration_s: Option<f64>,
  pub avg_work_density: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
struct BreakdownRow {
  workout_type: String,
  result_primary: Option<f64>,
  duration_s: Option<i64>,
  work_density: Option<f64>,
}

#[derive(Default)]
struct TypeSamples {
  count: i64,
  results: Vec<f64>,
  durations: Vec<f64>,
  densities: Vec<f64>,
}

/// Per workout type statistics for workouts logged in range, sorted by type.
/// SQLite has no PERCENTILE_CONT so the grouping happens here.
pub async fn get_workout_breakdown(
  pool: &SqlitePool,
  org_id: &str,
  range: &DateRange,
) -> Result<Vec<WorkoutTypeStats>> {
  let rows = sqlx::query_as::<_, BreakdownRow>(
    r#"
    SELECT workout_type, result_primary, duration_s, work_density
    FROM workout_facts
    WHERE org_id = ?1 AND session_date BETWEEN ?2 AND ?3
    "#,
  )
  .bind(org_id)
  .bind(range.from)
  .bind(range.to)
  .fetch_all(pool)
  .await?;

  let mut by_type: BTreeMap<String, TypeSamples> = BTreeMap::new();
  for row in rows {
    let samples = by_type.entry(row.workout_type).or_default();
    samples.count += 1;
    samples.results.extend(row.result_primary);
    samples.durations.extend(row.duration_s.map(|d| d as f64));
    samples.densities.extend(row.work_density);
  }

  Ok(
    by_type
      .into_iter()
      .map(|(workout_type, s)| WorkoutTypeStats {
        workout_type,
        count: s.count,
        median_result: continuous_percentile(&s.results, 0.5),
        avg_duration_s: mean(&s.durations),
        avg_work_density: mean(&s.densities),
      })
      .collect(),
  )
}
