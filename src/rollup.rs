//! Athlete-Day Rollup Recomputer
//!
//! One row per (athlete, day) holding:
//! - day totals summed from that athlete's session facts
//! - trailing 7-day and 28-day volume windows ending at the day (inclusive)
//!
//! Windows are recomputed from neighbouring rollup rows, never kept as
//! running counters. After day D changes, the windows of later rows up to
//! D + 27 are refreshed as well so historical backfills ripple forward.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::begin_write;
use crate::error::Result;
use crate::models::AthleteDayRollup;

pub const SHORT_WINDOW_DAYS: i64 = 7;
pub const LONG_WINDOW_DAYS: i64 = 28;

// ---------------------------------------------------------------------------
// Recompute
// ---------------------------------------------------------------------------

/// Recompute the rollup for `day`, for one athlete or for every athlete with
/// data on that day. Returns the number of athlete rows refreshed.
pub async fn recompute_athlete_day(
    pool: &SqlitePool,
    org_id: &str,
    day: NaiveDate,
    athlete_id: Option<&str>,
    ripple_forward: bool,
) -> Result<usize> {
    let athletes: Vec<String> = match athlete_id {
        Some(id) => vec![id.to_string()],
        None => athletes_for_day(pool, org_id, day).await?,
    };

    for athlete in &athletes {
        recompute_one(pool, org_id, athlete, day, ripple_forward).await?;
    }

    if athlete_id.is_none() {
        info!(org_id, day = %day, athletes = athletes.len(), "Bulk day rollup recomputed");
    }

    Ok(athletes.len())
}

/// Athletes with a session fact on the day, plus those with an existing
/// rollup row so days whose sessions disappeared are zeroed out
async fn athletes_for_day(pool: &SqlitePool, org_id: &str, day: NaiveDate) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT athlete_id FROM session_facts WHERE org_id = ?1 AND session_date = ?2
        UNION
        SELECT athlete_id FROM athlete_day_rollups WHERE org_id = ?1 AND day = ?2
        ORDER BY athlete_id
        "#,
    )
    .bind(org_id)
    .bind(day)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

async fn recompute_one(
    pool: &SqlitePool,
    org_id: &str,
    athlete_id: &str,
    day: NaiveDate,
    ripple_forward: bool,
) -> Result<()> {
    let mut tx = begin_write(pool).await?;

    // Readiness columns are not in the conflict update and survive untouched
    sqlx::query(
        r#"
        INSERT INTO athlete_day_rollups (athlete_id, day, org_id, day_volume_kg, day_time_s, computed_at)
        SELECT ?1, ?2, ?3,
               CAST(COALESCE(SUM(total_volume_kg), 0) AS REAL),
               CAST(COALESCE(SUM(total_duration_s), 0) AS INTEGER),
               ?4
        FROM session_facts
        WHERE org_id = ?3 AND athlete_id = ?1 AND session_date = ?2
        ON CONFLICT(athlete_id, day) DO UPDATE SET
            org_id = excluded.org_id,
            day_volume_kg = excluded.day_volume_kg,
            day_time_s = excluded.day_time_s,
            computed_at = excluded.computed_at
        "#,
    )
    .bind(athlete_id)
    .bind(day)
    .bind(org_id)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    let through = if ripple_forward {
        day + Duration::days(LONG_WINDOW_DAYS - 1)
    } else {
        day
    };
    let refreshed = update_windows(&mut tx, org_id, athlete_id, day, through).await?;

    tx.commit().await?;

    debug!(athlete_id, day = %day, refreshed, "Athlete day rollup recomputed");
    Ok(())
}

/// Refresh the rolling windows of every existing rollup row in `from..=to`
pub async fn refresh_rolling_windows(
    pool: &SqlitePool,
    org_id: &str,
    athlete_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<u64> {
    let mut tx = begin_write(pool).await?;
    let refreshed = update_windows(&mut tx, org_id, athlete_id, from, to).await?;
    tx.commit().await?;
    Ok(refreshed)
}

async fn update_windows(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    org_id: &str,
    athlete_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<u64> {
    let short_offset = format!("-{} days", SHORT_WINDOW_DAYS - 1);
    let long_offset = format!("-{} days", LONG_WINDOW_DAYS - 1);

    let result = sqlx::query(
        r#"
        UPDATE athlete_day_rollups
        SET rolling_7d_volume_kg = (
                SELECT CAST(COALESCE(SUM(w.day_volume_kg), 0) AS REAL)
                FROM athlete_day_rollups w
                WHERE w.org_id = athlete_day_rollups.org_id
                  AND w.athlete_id = athlete_day_rollups.athlete_id
                  AND w.day BETWEEN date(athlete_day_rollups.day, ?5) AND athlete_day_rollups.day
            ),
            rolling_28d_volume_kg = (
                SELECT CAST(COALESCE(SUM(w.day_volume_kg), 0) AS REAL)
                FROM athlete_day_rollups w
                WHERE w.org_id = athlete_day_rollups.org_id
                  AND w.athlete_id = athlete_day_rollups.athlete_id
                  AND w.day BETWEEN date(athlete_day_rollups.day, ?6) AND athlete_day_rollups.day
            )
        WHERE org_id = ?1 AND athlete_id = ?2 AND day BETWEEN ?3 AND ?4
        "#,
    )
    .bind(org_id)
    .bind(athlete_id)
    .bind(from)
    .bind(to)
    .bind(short_offset)
    .bind(long_offset)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Database Reads
// ---------------------------------------------------------------------------

pub async fn load_rollup(
    pool: &SqlitePool,
    athlete_id: &str,
    day: NaiveDate,
) -> Result<Option<AthleteDayRollup>> {
    let row = sqlx::query_as::<_, AthleteDayRollup>(
        r#"
        SELECT athlete_id, day, org_id, day_volume_kg, day_time_s,
               rolling_7d_volume_kg, rolling_28d_volume_kg,
               hrv_ms, sleep_h, wellness_score, computed_at
        FROM athlete_day_rollups
        WHERE athlete_id = ?1 AND day = ?2
        "#,
    )
    .bind(athlete_id)
    .bind(day)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
