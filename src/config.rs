//! Engine configuration loaded from the environment (and an optional `.env`)

use std::env;
use std::str::FromStr;

use crate::error::{AnalyticsError, Result};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://training-analytics.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PAGE_LIMIT: i64 = 50;
const MAX_PAGE_LIMIT: i64 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
  pub database_url: String,
  pub max_connections: u32,
  /// Limit applied when a paginated query omits one
  pub default_page_limit: i64,
  /// Largest limit a paginated query may ask for
  pub max_page_limit: i64,
  /// Refresh later rolling windows after recomputing a historical day
  pub ripple_forward: bool,
}

impl Default for AnalyticsConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      max_connections: DEFAULT_MAX_CONNECTIONS,
      default_page_limit: DEFAULT_PAGE_LIMIT,
      max_page_limit: MAX_PAGE_LIMIT,
      ripple_forward: true,
    }
  }
}

impl AnalyticsConfig {
  /// Load from `ANALYTICS_*` variables; unset keys keep their defaults
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();
    let config = Self {
      database_url: env::var("ANALYTICS_DATABASE_URL").unwrap_or(defaults.database_url),
      max_connections: parse_var("ANALYTICS_MAX_CONNECTIONS", defaults.max_connections)?,
      default_page_limit: parse_var("ANALYTICS_DEFAULT_PAGE_LIMIT", defaults.default_page_limit)?,
      max_page_limit: parse_var("ANALYTICS_MAX_PAGE_LIMIT", defaults.max_page_limit)?,
      ripple_forward: parse_var("ANALYTICS_RIPPLE_FORWARD", defaults.ripple_forward)?,
    };

    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.max_connections == 0 {
      return Err(AnalyticsError::Config(
        "ANALYTICS_MAX_CONNECTIONS must be at least 1".into(),
      ));
    }
    if self.max_page_limit < 1 {
      return Err(AnalyticsError::Config(
        "ANALYTICS_MAX_PAGE_LIMIT must be at least 1".into(),
      ));
    }
    if self.default_page_limit < 1 || self.default_page_limit > self.max_page_limit {
      return Err(AnalyticsError::Config(format!(
        "ANALYTICS_DEFAULT_PAGE_LIMIT must be between 1 and {}",
        self.max_page_limit
      )));
    }
    Ok(())
  }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|_| AnalyticsError::Config(format!("Invalid value for {}: {:?}", key, raw))),
    Err(_) => Ok(default),
  }
}
