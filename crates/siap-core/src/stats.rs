//! Dashboard summary statistics.

use serde::{Deserialize, Serialize};

/// The five scalars shown on the dashboard cards.
///
/// Sums over no matching claims are zero, never absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  /// Total cost of claims funded from the state budget allotment.
  pub total_dipa:     f64,
  /// Total cost of claims funded from non-tax revenue.
  pub total_pnbp:     f64,
  /// Number of official-travel claims.
  pub count_perjadin: i64,
  /// Number of meeting claims.
  pub count_rapat:    i64,
  /// Total cost settled with the government credit card.
  pub kkp_usage:      f64,
}

impl DashboardStats {
  /// Share of DIPA and PNBP in their combined total, as percentages.
  /// Both are zero when nothing has been spent.
  pub fn funding_shares(&self) -> (f64, f64) {
    let total = self.total_dipa + self.total_pnbp;
    if total <= 0.0 {
      return (0.0, 0.0);
    }
    (self.total_dipa / total * 100.0, self.total_pnbp / total * 100.0)
  }
}
