//! JSON REST API for SIAP-SPJ.
//!
//! Exposes an axum [`Router`] backed by any [`siap_core::store::ClaimStore`].
//! Auth, TLS, static assets and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", siap_api::api_router(store.clone()))
//! ```

pub mod activity;
pub mod claims;
pub mod error;
pub mod stats;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use siap_core::store::ClaimStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ClaimStore + 'static,
{
  Router::new()
    // Claims
    .route("/claims", get(claims::list::<S>).post(claims::submit::<S>))
    .route("/claims/{id}", get(claims::get_one::<S>))
    // Dashboard
    .route("/stats", get(stats::handler::<S>))
    // Audit trail
    .route("/activity-log", get(activity::list::<S>))
    .route("/health", get(health))
    .with_state(store)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
