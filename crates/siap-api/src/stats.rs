//! Handler for `GET /stats`.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use siap_core::store::ClaimStore;

use crate::error::{ApiError, messages};

/// Clients may reuse a stats response for this long. Advisory only; the
/// server does not cache.
pub const CACHE_CONTROL: &str = "public, max-age=10";

/// `GET /stats`: the five dashboard scalars.
pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<impl IntoResponse, ApiError>
where
  S: ClaimStore,
{
  let stats = store
    .dashboard_stats()
    .await
    .map_err(ApiError::store(messages::STATS_FAILED))?;
  Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(stats)))
}
