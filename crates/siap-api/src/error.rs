//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Callers only ever see a short localized message and `success: false`.
//! The underlying cause is logged server-side before the response is built.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use siap_core::submission::FailureReply;
use thiserror::Error;

/// Messages shown to the user, in the form's language.
pub mod messages {
  pub const LIST_FAILED: &str = "Gagal mengambil data SPJ";
  pub const SUBMIT_FAILED: &str = "Gagal menyimpan data SPJ";
  pub const STATS_FAILED: &str = "Gagal memuat analitik dashboard";
  pub const CLAIM_NOT_FOUND: &str = "Data SPJ tidak ditemukan";
  pub const LOG_FAILED: &str = "Gagal mengambil log aktivitas";
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request was refused before reaching the store.
  #[error("{message}: {detail}")]
  Rejected {
    message: &'static str,
    detail:  String,
  },

  #[error("{message}")]
  NotFound { message: &'static str },

  #[error("{message}: {source}")]
  Store {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Adapter for `map_err` on store results.
  pub fn store<E>(message: &'static str) -> impl FnOnce(E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    move |e| Self::Store { message, source: Box::new(e) }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Rejected { .. } => StatusCode::BAD_REQUEST,
      ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
      ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn message(&self) -> &'static str {
    match self {
      ApiError::Rejected { message, .. }
      | ApiError::NotFound { message }
      | ApiError::Store { message, .. } => *message,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::Rejected { detail, .. } => tracing::warn!(%detail, "request rejected"),
      ApiError::NotFound { .. } => tracing::debug!("{self}"),
      ApiError::Store { source, .. } => tracing::error!(error = %source, "{}", self.message()),
    }

    let body = FailureReply { success: false, message: self.message().to_owned() };
    (self.status(), Json(body)).into_response()
  }
}
