//! Error type for `siap-store-sqlite`.

use siap_core::{claim::ClaimNumber, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The randomly generated claim number is already in use.
  #[error("claim number {0} is already taken")]
  DuplicateClaimNumber(ClaimNumber),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn is_duplicate_claim_number(&self) -> bool { matches!(self, Self::DuplicateClaimNumber(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
