use sqlx::SqlitePool;

use super::Page;
use crate::error::Result;
use crate::models::SessionFact;
use crate::validation::{DateRange, Pagination};

/// Raw session facts, newest first
pub async fn get_sessions(
  pool: &SqlitePool,
  org_id: &str,
  range: &DateRange,
  page: Pagination,
) -> Result<Page<SessionFact>> {
  let items = sqlx::query_as::<_, SessionFact>(
    r#"
    SELECT session_id, org_id, athlete_id, session_date, training_location_id,
           total_sets, total_volume_kg, total_duration_s, avg_rpe, completion_pct, computed_at
    FROM session_facts
    WHERE org_id = ?1 AND session_date BETWEEN ?2 AND ?3
    ORDER BY session_date DESC, session_id ASC
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
    "SELECT COUNT(*) FROM session_facts WHERE org_id = ?1 AND session_date BETWEEN ?2 AND ?3",
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
