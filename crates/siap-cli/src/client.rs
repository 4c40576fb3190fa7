//! Async HTTP client wrapping the SIAP-SPJ JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use siap_core::{
  activity::ActivityLogEntry,
  claim::{Claim, ClaimDetail, ClaimId},
  stats::DashboardStats,
  submission::{FailureReply, SubmissionReceipt},
};

/// Connection settings for the API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the SIAP-SPJ REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── Claims ────────────────────────────────────────────────────────────────

  /// `GET /api/claims`
  pub async fn list_claims(&self) -> Result<Vec<Claim>> {
    let resp = self
      .client
      .get(self.url("/claims"))
      .send()
      .await
      .context("GET /claims failed")?;
    decode(resp, "GET /claims").await
  }

  /// `GET /api/claims/{id}`
  pub async fn get_claim(&self, id: ClaimId) -> Result<ClaimDetail> {
    let path = format!("/claims/{id}");
    let resp = self
      .client
      .get(self.url(&path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    decode(resp, &format!("GET {path}")).await
  }

  /// `POST /api/claims`
  ///
  /// The body is forwarded as-is; validation happens on the server.
  pub async fn submit_claim(&self, body: &serde_json::Value) -> Result<SubmissionReceipt> {
    let resp = self
      .client
      .post(self.url("/claims"))
      .json(body)
      .send()
      .await
      .context("POST /claims failed")?;
    decode(resp, "POST /claims").await
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<DashboardStats> {
    let resp = self
      .client
      .get(self.url("/stats"))
      .send()
      .await
      .context("GET /stats failed")?;
    decode(resp, "GET /stats").await
  }

  /// `GET /api/activity-log?limit=<n>`
  pub async fn activity_log(&self, limit: usize) -> Result<Vec<ActivityLogEntry>> {
    let resp = self
      .client
      .get(self.url("/activity-log"))
      .query(&[("limit", limit)])
      .send()
      .await
      .context("GET /activity-log failed")?;
    decode(resp, "GET /activity-log").await
  }
}

/// Deserialise a successful response, or turn a failure into an error that
/// carries the server's message when it sent one.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let reply = resp.json::<FailureReply>().await.ok();
    return Err(match reply {
      Some(r) => anyhow!("{what} → {status}: {}", r.message),
      None => anyhow!("{what} → {status}"),
    });
  }
  resp
    .json()
    .await
    .with_context(|| format!("deserialising response to {what}"))
}
