use serde::Serialize;
use sqlx::SqlitePool;

use super::Page;
use crate::error::Result;
use crate::validation::{DateRange, Pagination};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct LeaderboardRow {
  pub athlete_id: String,
  /// Display-only join, None if the athlete row is gone
  pub display_name: Option<String>,
  pub session_count: i64,
  pub total_volume_kg: f64,
  pub total_duration_s: i64,
}

/// Athletes ranked by summed volume, ties broken by athlete id.
/// `total` counts every distinct athlete in range, not just this page.
pub async fn get_leaderboard(
  pool: &SqlitePool,
  org_id: &str,
  range: &DateRange,
  page: Pagination,
) -> Result<Page<LeaderboardRow>> {
  let items = sqlx::query_as::<_, LeaderboardRow>(
    r#"
    SELECT
      f.athlete_id,
      a.display_name,
      COUNT(*) AS session_count,
      CAST(COALESCE(SUM(f.total_volume_kg), 0) AS REAL) AS total_volume_kg,
      CAST(COALESCE(SUM(f.total_duration_s), 0) AS INTEGER) AS total_duration_s
    FROM session_facts f
    LEFT JOIN athletes a ON a.id = f.athlete_id
    WHERE f.org_id = ?1 AND f.session_date BETWEEN ?2 AND ?3
    GROUP BY f.athlete_id, a.display_name
    ORDER BY total_volume_kg DESC, f.athlete_id ASC
    LIMIT ?4 OFFSET ?5
    "#,
  )
  .bind(org_id)
  .bind(range.from)
  .bind(range.to)
  .bind(page.limit)
  .bind(page.offset)
  .fetch_all(pool)
  .await?;

  let total: i64 = sqlx::query_scalar(
    r#"
    SELECT COUNT(DISTINCT athlete_id)
    FROM session_facts
    WHERE org_id = ?1 AND session_date BETWEEN ?2 AND ?3
    "#,
  )
  .bind(org_id)
  .bind(range.from)
  .bind(range.to)
  .fetch_one(pool)
  .await?;

  Ok(Page {
    items,
    total,
    limit: page.limit,
    offset: page.offset,
  })
}
