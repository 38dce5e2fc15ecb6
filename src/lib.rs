//! Analytics materialization engine for training data
//!
//! Derived fact rows are recomputed from the raw training store on trigger:
//! - session facts and workout facts, one row per source
//! - athlete-day rollups with trailing 7/28-day volume windows
//! - a read-only query layer for dashboards, trends and leaderboards

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod facts;
pub mod models;
pub mod queries;
pub mod rollup;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use config::AnalyticsConfig;
pub use db::{initialize_db, AppState, DbPool};
pub use error::{AnalyticsError, Result};
pub use facts::RecomputeOutcome;
