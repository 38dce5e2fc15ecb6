//! Dashboard query entry points: validate, then read

use crate::db::AppState;
use crate::error::Result;
use crate::models::SessionFact;
use crate::queries::{self, DashboardKpis, LeaderboardRow, Page, TrendPoint, WorkoutTypeStats};
use crate::validation::{parse_id, parse_optional_id, DateRange, Pagination};

pub async fn get_dashboard_kpis(state: &AppState, org_id: &str, from: &str, to: &str) -> Result<DashboardKpis> {
  let org_id = parse_id("org_id", org_id)?;
  let range = DateRange::parse(from, to)?;
  queries::get_dashboard_kpis(&state.db, &org_id, &range).await
}

pub async fn get_athlete_trend(
  state: &AppState,
  org_id: &str,
  athlete_id: Option<&str>,
  from: &str,
  to: &str,
) -> Result<Vec<TrendPoint>> {
  let org_id = parse_id("org_id", org_id)?;
  let athlete_id = parse_optional_id("athlete_id", athlete_id)?;
  let range = DateRange::parse(from, to)?;
  queries::get_athlete_trend(&state.db, &org_id, athlete_id.as_deref(), &range).await
}

pub async fn get_leaderboard(
  state: &AppState,
  org_id: &str,
  from: &str,
  to: &str,
  limit: Option<i64>,
  offset: Option<i64>,
) -> Result<Page<LeaderboardRow>> {
  let org_id = parse_id("org_id", org_id)?;
  let range = DateRange::parse(from, to)?;
  let page = Pagination::resolve(limit, offset, &state.config)?;
  queries::get_leaderboard(&state.db, &org_id, &range, page).await
}

pub async fn get_workout_breakdown(
  state: &AppState,
  org_id: &str,
  from: &str,
  to: &str,
) -> Result<Vec<WorkoutTypeStats>> {
  let org_id = parse_id("org_id", org_id)?;
  let range = DateRange::parse(from, to)?;
  queries::get_workout_breakdown(&state.db, &org_id, &range).await
}

pub async fn get_sessions(
  state: &AppState,
  org_id: &str,
  from: &str,
  to: &str,
  limit: Option<i64>,
  offset: Option<i64>,
) -> Result<Page<SessionFact>> {
  let org_id = parse_id("org_id", org_id)?;
  let range = DateRange::parse(from, to)?;
  let page = Pagination::resolve(limit, offset, &state.config)?;
  queries::get_sessions(&state.db, &org_id, &range, page).await
}
