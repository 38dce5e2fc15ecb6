//! Deterministic aggregation layer for fact records
//!
//! Every derived number the engine stores is computed here from the full set
//! of current source rows. The upserters only load rows and persist results.

use serde::{Deserialize, Serialize};

use crate::models::{SetLog, WorkoutLogEntry, WorkoutRoundLog};

/// ---------------------------------------------------------------------------
/// Session Totals
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionTotals {
  pub total_sets: i64,
  /// Sum of reps * load over sets where both are present
  pub total_volume_kg: f64,
  pub total_duration_s: i64,
  /// Mean of the sets that recorded an RPE
  pub avg_rpe: Option<f64>,
}

impl SessionTotals {
  pub fn compute(sets: &[SetLog]) -> Self {
    let total_volume_kg = sets
      .iter()
      .map(|s| s.reps.unwrap_or(0) as f64 * s.load_kg.unwrap_or(0.0))
      .sum();

    let total_duration_s = sets.iter().filter_map(|s| s.duration_s).sum();

    let rpes: Vec<f64> = sets.iter().filter_map(|s| s.rpe).collect();

    Self {
      total_sets: sets.len() as i64,
      total_volume_kg,
      total_duration_s,
      avg_rpe: mean(&rpes),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout Totals
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkoutTotals {
  /// None when there are no rounds
  pub duration_s: Option<i64>,
  pub total_reps: i64,
  /// Reps per second, only for a positive duration
  pub work_density: Option<f64>,
}

impl WorkoutTotals {
  pub fn compute(rounds: &[WorkoutRoundLog], entries: &[WorkoutLogEntry]) -> Self {
    let duration_s = if rounds.is_empty() {
      None
    } else {
      Some(rounds.iter().filter_map(|r| r.duration_s).sum::<i64>())
    };

    let total_reps: i64 = entries.iter().filter_map(|e| e.reps).sum();

    let work_density = match duration_s {
      Some(secs) if secs > 0 => Some(total_reps as f64 / secs as f64),
      _ => None,
    };

    Self {
      duration_s,
      total_reps,
      work_density,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Statistics Helpers
/// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    None
  } else {
    Some(values.iter().sum::<f64>() / values.len() as f64)
  }
}

/// Linearly interpolated percentile (continuous rank), `p` in [0, 1]
pub fn continuous_percentile(values: &[f64], p: f64) -> Option<f64> {
  if values.is_empty() {
    return None;
  }

  let mut sorted = values.to_vec();
  sorted.sort_by(|a, b| a.total_cmp(b));

  let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
  let lower = rank.floor() as usize;
  let upper = rank.ceil() as usize;
  let frac = rank - lower as f64;

  Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
