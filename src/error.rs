use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "message")]
pub enum AnalyticsError {
  /// Rejected before any storage access
  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Database error: {0}")]
  Database(String),

  #[error("Configuration error: {0}")]
  Config(String),
}

impl AnalyticsError {
  pub fn validation(msg: impl Into<String>) -> Self {
    AnalyticsError::Validation(msg.into())
  }

  pub fn is_validation(&self) -> bool {
    matches!(self, AnalyticsError::Validation(_))
  }
}

// Storage failures are propagated as-is, the caller owns retry policy
impl From<sqlx::Error> for AnalyticsError {
  fn from(e: sqlx::Error) -> Self {
    AnalyticsError::Database(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for AnalyticsError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    AnalyticsError::Database(format!("Migration failed: {}", e))
  }
}
