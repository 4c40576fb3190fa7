//! Handler for `GET /activity-log`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use siap_core::{activity::ActivityLogEntry, store::ClaimStore};

use crate::error::{ApiError, messages};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(Debug, Deserialize, Default)]
pub struct LogParams {
  /// Number of entries to return; defaults to 50, capped at 500.
  pub limit: Option<usize>,
}

/// `GET /activity-log[?limit=<n>]`, newest entries first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<LogParams>, QueryRejection>,
) -> Result<Json<Vec<ActivityLogEntry>>, ApiError>
where
  S: ClaimStore,
{
  let Query(params) = params.map_err(|e| ApiError::Rejected {
    message: messages::LOG_FAILED,
    detail:  e.body_text(),
  })?;
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
  let entries = store
    .activity_log(limit)
    .await
    .map_err(ApiError::store(messages::LOG_FAILED))?;
  Ok(Json(entries))
}
