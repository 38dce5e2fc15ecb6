//! Fact upserters
//!
//! Each recompute reads the current source rows, aggregates them with
//! `crate::aggregate` and replaces the fact row in one upsert statement.
//! Facts are never patched incrementally.

pub mod session;
pub mod workout;

use serde::Serialize;

pub use session::{load_session_fact, recompute_session_fact, retire_session_fact};
pub use workout::{load_workout_fact, recompute_workout_fact, retire_workout_fact};

/// What a recompute did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeOutcome {
  /// Fact row inserted or fully replaced
  Updated,
  /// Source row is gone, nothing was written
  SourceMissing,
  /// Source row is gone and its stale fact was removed
  Retired,
}
