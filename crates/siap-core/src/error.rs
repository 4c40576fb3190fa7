//! Error types for `siap-core`.

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a submitted [`ClaimDraft`](crate::submission::ClaimDraft) is
/// rejected before it reaches storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid date in {field}: {value:?} (expected YYYY-MM-DD)")]
  InvalidDate { field: &'static str, value: String },

  #[error("return date {returned} is before departure date {departed}")]
  InvalidDateRange {
    departed: NaiveDate,
    returned: NaiveDate,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
