//! Read-only query layer over the fact and rollup tables
//!
//! All ranges are inclusive on both ends. Sums and counts default to zero on
//! empty input, averages and percentiles to `None`.

pub mod breakdown;
pub mod kpis;
pub mod leaderboard;
pub mod sessions;
pub mod trend;

use serde::Serialize;

pub use breakdown::{get_workout_breakdown, WorkoutTypeStats};
pub use kpis::{get_dashboard_kpis, DashboardKpis};
pub use leaderboard::{get_leaderboard, LeaderboardRow};
pub use sessions::get_sessions;
pub use trend::{get_athlete_trend, TrendPoint};

/// One page of rows plus the size of the whole filtered set
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: i64,
  pub limit: i64,
  pub offset: i64,
}
