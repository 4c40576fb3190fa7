//! Handlers for `/claims` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/claims` | Every claim, newest first |
//! | `POST` | `/claims` | Body: [`ClaimDraft`]; returns `{success, id}` |
//! | `GET`  | `/claims/:id` | Claim with its child records; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use chrono::{Datelike as _, Local};
use rand_core::OsRng;
use siap_core::{
  claim::{Claim, ClaimDetail, ClaimId},
  store::{CLAIM_NUMBER_ATTEMPTS, ClaimStore, submit_with_fresh_number},
  submission::{ClaimDraft, SubmissionReceipt},
};

use crate::error::{ApiError, messages};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /claims`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Claim>>, ApiError>
where
  S: ClaimStore,
{
  let claims = store
    .list_claims()
    .await
    .map_err(ApiError::store(messages::LIST_FAILED))?;
  Ok(Json(claims))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /claims/:id`
///
/// An id that is not an integer is refused with 400.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ClaimDetail>, ApiError>
where
  S: ClaimStore,
{
  let Path(id) = id.map_err(|e| ApiError::Rejected {
    message: messages::LIST_FAILED,
    detail:  e.body_text(),
  })?;

  let detail = store
    .get_claim(ClaimId(id))
    .await
    .map_err(ApiError::store(messages::LIST_FAILED))?
    .ok_or(ApiError::NotFound { message: messages::CLAIM_NOT_FOUND })?;
  Ok(Json(detail))
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// `POST /claims`: validates the draft, assigns a claim number and writes
/// the claim with all of its child records in one transaction. A taken claim
/// number is replaced by a fresh one a bounded number of times.
///
/// A draft that fails validation is refused with 400 and never reaches the
/// store.
pub async fn submit<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<ClaimDraft>, JsonRejection>,
) -> Result<Json<SubmissionReceipt>, ApiError>
where
  S: ClaimStore,
{
  let Json(draft) = body.map_err(|e| ApiError::Rejected {
    message: messages::SUBMIT_FAILED,
    detail:  e.body_text(),
  })?;

  let claim = draft.validate().map_err(|e| ApiError::Rejected {
    message: messages::SUBMIT_FAILED,
    detail:  e.to_string(),
  })?;

  tracing::debug!(children = claim.child_count(), "submitting claim");

  let id = submit_with_fresh_number(
    store.as_ref(),
    Local::now().year(),
    &mut OsRng,
    claim,
    CLAIM_NUMBER_ATTEMPTS,
  )
  .await
  .map_err(ApiError::store(messages::SUBMIT_FAILED))?;

  tracing::info!(claim_id = %id, "claim created");
  Ok(Json(SubmissionReceipt { success: true, id }))
}
