//! The `ClaimStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `siap-store-sqlite`).
//! Higher layers (`siap-api`, `siap-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use rand_core::RngCore;

use crate::{
  activity::ActivityLogEntry,
  claim::{Claim, ClaimDetail, ClaimId, ClaimNumber},
  stats::DashboardStats,
  submission::NewClaim,
};

/// Number of claim numbers tried by [`submit_with_fresh_number`] before the
/// submission is given up.
pub const CLAIM_NUMBER_ATTEMPTS: usize = 5;

/// Error type of a [`ClaimStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// Whether the submission failed only because its claim number is taken.
  fn is_duplicate_claim_number(&self) -> bool;
}

/// Abstraction over a claim store backend.
///
/// Claims and their child records are written once, by
/// [`submit_claim`](Self::submit_claim), and never updated or deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ClaimStore: Send + Sync {
  type Error: StoreError;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist `claim` under `claim_number`, together with all of its child
  /// records and one activity-log entry, and return the new claim's id.
  ///
  /// Either everything is written or nothing is. A `claim_number` that is
  /// already taken fails the whole submission with an error for which
  /// [`StoreError::is_duplicate_claim_number`] holds.
  fn submit_claim(
    &self,
    claim_number: ClaimNumber,
    claim: NewClaim,
  ) -> impl Future<Output = Result<ClaimId, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every claim, newest first.
  fn list_claims(
    &self,
  ) -> impl Future<Output = Result<Vec<Claim>, Self::Error>> + Send + '_;

  /// One claim with its child records. Returns `None` if not found.
  fn get_claim(
    &self,
    id: ClaimId,
  ) -> impl Future<Output = Result<Option<ClaimDetail>, Self::Error>> + Send + '_;

  /// The dashboard scalars, computed in a single read.
  fn dashboard_stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;

  /// The most recent `limit` audit entries, newest first.
  fn activity_log(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ActivityLogEntry>, Self::Error>> + Send + '_;
}

/// Submit `claim` under a random claim number for `year`, drawing a new
/// number whenever the previous one is already taken.
///
/// Gives up after `attempts` numbers and returns the last error.
pub async fn submit_with_fresh_number<S, R>(
  store: &S,
  year: i32,
  rng: &mut R,
  claim: NewClaim,
  attempts: usize,
) -> Result<ClaimId, S::Error>
where
  S: ClaimStore + ?Sized,
  R: RngCore + Send + ?Sized,
{
  let mut attempt = 1;
  loop {
    let claim_number = ClaimNumber::generate(year, rng);
    match store.submit_claim(claim_number.clone(), claim.clone()).await {
      Err(e) if e.is_duplicate_claim_number() && attempt < attempts => {
        tracing::warn!(%claim_number, attempt, "claim number already taken, drawing another");
        attempt += 1;
      }
      result => return result,
    }
  }
}
