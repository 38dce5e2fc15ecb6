use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::validation::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TrendPoint {
  pub athlete_id: String,
  pub day: NaiveDate,
  pub day_volume_kg: f64,
  pub day_time_s: i64,
  pub rolling_7d_volume_kg: f64,
  pub rolling_28d_volume_kg: f64,
  pub hrv_ms: Option<f64>,
  pub sleep_h: Option<f64>,
  pub wellness_score: Option<f64>,
}

/// Daily series ordered by day. Without an athlete every athlete's rows are
/// returned as separate points, not summed.
pub async fn get_athlete_trend(
  pool: &SqlitePool,
  org_id: &str,
  athlete_id: Option<&str>,
  range: &DateRange,
) -> Result<Vec<TrendPoint>> {
  let points = sqlx::query_as::<_, TrendPoint>(
    r#"
    SELECT athlete_id, day, day_volume_kg, day_time_s,
           rolling_7d_volume_kg, rolling_28d_volume_kg,
           hrv_ms, sleep_h, wellness_score
    FROM athlete_day_rollups
    WHERE org_id = ?1
      AND day BETWEEN ?2 AND ?3
      AND (?4 IS NULL OR athlete_id = ?4)
    ORDER BY day ASC, athlete_id ASC
    "#,
  )
  .bind(org_id)
  .bind(range.from)
  .bind(range.to)
  .bind(athlete_id)
  .fetch_all(pool)
  .await?;

  Ok(points)
}
