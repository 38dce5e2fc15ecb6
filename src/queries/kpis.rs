use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::validation::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DashboardKpis {
  pub total_sessions: i64,
  /// Sessions at 100% completion
  pub completed_sessions: i64,
  pub total_sets: i64,
  pub total_volume_kg: f64,
  pub total_duration_s: i64,
  /// None when the range holds no sessions
  pub avg_rpe: Option<f64>,
  pub avg_completion_pct: Option<f64>,
}

pub async fn get_dashboard_kpis(pool: &SqlitePool, org_id: &str, range: &DateRange) -> Result<DashboardKpis> {
  let kpis = sqlx::query_as::<_, DashboardKpis>(
    r#"
    SELECT
      COUNT(*) AS total_sessions,
      CAST(COALESCE(SUM(CASE WHEN completion_pct = 100 THEN 1 ELSE 0 END), 0) AS INTEGER) AS completed_sessions,
      CAST(COALESCE(SUM(total_sets), 0) AS INTEGER) AS total_sets,
      CAST(COALESCE(SUM(total_volume_kg), 0) AS REAL) AS total_volume_kg,
      CAST(COALESCE(SUM(total_duration_s), 0) AS INTEGER) AS total_duration_s,
      AVG(avg_rpe) AS avg_rpe,
      AVG(completion_pct) AS avg_completion_pct
    FROM session_facts
    WHERE org_id = ?1 AND session_date BETWEEN ?2 AND ?3
    "#,
  )
  .bind(org_id)
  .bind(range.from)
  .bind(range.to)
  .fetch_one(pool)
  .await?;

  debug!(org_id, from = %range.from, to = %range.to, sessions = kpis.total_sessions, "Dashboard KPIs loaded");
  Ok(kpis)
}
