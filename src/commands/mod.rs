//! Entry points for collaborators. Inputs arrive as raw strings and are
//! validated here before anything reaches storage.

pub mod queries;
pub mod triggers;

pub use queries::{get_athlete_trend, get_dashboard_kpis, get_leaderboard, get_sessions, get_workout_breakdown};
pub use triggers::{
  backfill_range, recompute_daily, recompute_for_session, recompute_for_workout_log, retire_session,
  retire_workout_log, BackfillSummary,
};
