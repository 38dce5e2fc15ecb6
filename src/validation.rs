//! Input validation for every entry point
//!
//! All checks run before storage is touched. Nothing here corrects input:
//! a malformed identifier, date or page bound is a `Validation` error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate an identifier field and return it trimmed.
///
/// Ids are compared as stored TEXT, so the caller's casing is kept as is.
pub fn parse_id(field: &str, raw: &str) -> Result<String> {
  let trimmed = raw.trim();
  Uuid::parse_str(trimmed)
    .map(|_| trimmed.to_string())
    .map_err(|_| AnalyticsError::validation(format!("{} is not a valid identifier: {:?}", field, raw)))
}

pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<String>> {
  raw.map(|r| parse_id(field, r)).transpose()
}

/// Strict `YYYY-MM-DD`
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
  // chrono accepts single-digit months/days, the wire format does not
  let well_formed = raw.len() == 10
    && raw
      .char_indices()
      .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

  if !well_formed {
    return Err(AnalyticsError::validation(format!(
      "{} must be a YYYY-MM-DD date: {:?}",
      field, raw
    )));
  }

  NaiveDate::parse_from_str(raw, DATE_FORMAT)
    .map_err(|_| AnalyticsError::validation(format!("{} is not a calendar date: {:?}", field, raw)))
}

/// ---------------------------------------------------------------------------
/// Date Range
/// ---------------------------------------------------------------------------

/// Inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub from: NaiveDate,
  pub to: NaiveDate,
}

impl DateRange {
  pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
    if from > to {
      return Err(AnalyticsError::validation(format!(
        "date range is inverted: {} is after {}",
        from, to
      )));
    }
    Ok(Self { from, to })
  }

  pub fn parse(from: &str, to: &str) -> Result<Self> {
    Self::new(parse_date("from", from)?, parse_date("to", to)?)
  }

  pub fn contains(&self, day: NaiveDate) -> bool {
    self.from <= day && day <= self.to
  }

  /// Every day in the range, ascending
  pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
    let to = self.to;
    self.from.iter_days().take_while(move |d| *d <= to)
  }
}

/// ---------------------------------------------------------------------------
/// Pagination
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  pub limit: i64,
  pub offset: i64,
}

impl Pagination {
  /// Omitted limit falls back to the configured default
  pub fn resolve(limit: Option<i64>, offset: Option<i64>, config: &AnalyticsConfig) -> Result<Self> {
    let limit = limit.unwrap_or(config.default_page_limit);
    let offset = offset.unwrap_or(0);

    if limit < 1 || limit > config.max_page_limit {
      return Err(AnalyticsError::validation(format!(
        "limit must be between 1 and {}, got {}",
        config.max_page_limit, limit
      )));
    }
    if offset < 0 {
      return Err(AnalyticsError::validation(format!(
        "offset must not be negative, got {}",
        offset
      )));
    }

    Ok(Self { limit, offset })
  }
}
