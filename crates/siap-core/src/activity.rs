//! The append-only audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claim::ClaimId;

/// Actor recorded for entries written by the service itself.
pub const SYSTEM_ACTOR: &str = "System";

/// An immutable audit record. One is appended for every created claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
  pub id:          i64,
  #[serde(rename = "user_name")]
  pub actor:       String,
  #[serde(rename = "aktivitas")]
  pub description: String,
  #[serde(rename = "timestamp")]
  pub recorded_at: DateTime<Utc>,
}

/// Description logged when a claim is created.
pub fn claim_created(id: ClaimId) -> String { format!("Created SPJ ID: {id}") }
