//! Plain-text rendering of API responses.
//!
//! Every function returns a `String` so the output can be tested without a
//! terminal.

use std::fmt::Write as _;

use chrono::Local;
use siap_core::{
  activity::ActivityLogEntry,
  claim::{Claim, ClaimDetail},
  stats::DashboardStats,
};

const BAR_WIDTH: usize = 30;

// ─── Money ────────────────────────────────────────────────────────────────────

/// Format an amount as Indonesian rupiah, e.g. `Rp 1.250.000`.
///
/// Fractions are rounded to the nearest rupiah.
pub fn format_rupiah(amount: f64) -> String {
  let rounded = amount.round();
  let digits = format!("{:.0}", rounded.abs());

  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push('.');
    }
    grouped.push(ch);
  }

  if rounded < 0.0 { format!("-Rp {grouped}") } else { format!("Rp {grouped}") }
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

pub fn dashboard(stats: &DashboardStats) -> String {
  let mut out = String::new();
  let cards = [
    ("Total SPJ DIPA", format_rupiah(stats.total_dipa)),
    ("Total SPJ PNBP", format_rupiah(stats.total_pnbp)),
    ("Perjalanan Dinas", format!("{} kegiatan", stats.count_perjadin)),
    ("Rapat", format!("{} kegiatan", stats.count_rapat)),
    ("Penggunaan KKP", format_rupiah(stats.kkp_usage)),
  ];
  for (label, value) in cards {
    let _ = writeln!(out, "{label:<18} {value:>20}");
  }

  let (dipa, pnbp) = stats.funding_shares();
  let _ = writeln!(out);
  let _ = writeln!(out, "Komposisi anggaran");
  let _ = writeln!(out, "  DIPA {} {dipa:5.1}%", bar(dipa));
  let _ = writeln!(out, "  PNBP {} {pnbp:5.1}%", bar(pnbp));
  out
}

fn bar(percent: f64) -> String {
  let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
  let filled = filled.min(BAR_WIDTH);
  format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

// ─── Claims ───────────────────────────────────────────────────────────────────

pub fn claims_table(claims: &[Claim]) -> String {
  if claims.is_empty() {
    return "Belum ada data SPJ.\n".to_string();
  }

  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:>5}  {:<15}  {:<10}  {:<18}  {:<16}  {:>18}",
    "ID", "NO. SPJ", "SUMBER", "KEGIATAN", "DIBUAT", "TOTAL"
  );
  for c in claims {
    let _ = writeln!(
      out,
      "{:>5}  {:<15}  {:<10}  {:<18}  {:<16}  {:>18}",
      c.id.0,
      c.claim_number.as_str(),
      c.info.funding_source.as_str(),
      c.info.activity_type.as_str(),
      c.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
      format_rupiah(c.total_cost),
    );
  }
  out
}

pub fn claim_detail(detail: &ClaimDetail) -> String {
  let c = &detail.claim;
  let info = &c.info;
  let mut out = String::new();

  let _ = writeln!(out, "{} (id {})", c.claim_number, c.id);
  let _ = writeln!(out, "  No. SPT            {}", info.order_number);
  field(&mut out, "No. SPPD", info.travel_letter_number.as_deref());
  field(&mut out, "Kode MAK", info.budget_code.as_deref());
  let _ = writeln!(out, "  Sumber anggaran    {}", info.funding_source.as_str());
  let _ = writeln!(out, "  Jenis kegiatan     {}", info.activity_type.as_str());
  let _ = writeln!(out, "  Metode pembayaran  {}", info.payment_method.as_str());
  let _ = writeln!(
    out,
    "  Tanggal            {} s.d. {}",
    info.departure_date, info.return_date
  );
  field(&mut out, "Tujuan", info.destination.as_deref());
  field(&mut out, "Provinsi", info.province.as_deref());
  let _ = writeln!(out, "  Total biaya        {}", format_rupiah(c.total_cost));

  if !detail.team.is_empty() {
    let _ = writeln!(out, "\nTim ({})", detail.team.len());
    for m in &detail.team {
      let _ = writeln!(
        out,
        "  - {} {}",
        m.record.name.as_deref().unwrap_or("-"),
        m.record.position.as_deref().map(|p| format!("({p})")).unwrap_or_default()
      );
    }
  }

  if !detail.partners.is_empty() {
    let _ = writeln!(out, "\nPerusahaan ({})", detail.partners.len());
    for p in &detail.partners {
      let _ = writeln!(out, "  - {}", p.record.name.as_deref().unwrap_or("-"));
    }
  }

  if !detail.transport.is_empty() {
    let _ = writeln!(out, "\nTransportasi ({})", detail.transport.len());
    for t in &detail.transport {
      let _ = writeln!(
        out,
        "  - {:<12} {:<12} {:>16}",
        t.record.mode.as_deref().unwrap_or("-"),
        t.record.ticket_number.as_deref().unwrap_or("-"),
        format_rupiah(t.record.fare)
      );
    }
  }

  if !detail.lodging.is_empty() {
    let _ = writeln!(out, "\nPenginapan ({})", detail.lodging.len());
    for l in &detail.lodging {
      let nights = l.record.nights.map(|n| format!("{n} malam")).unwrap_or_default();
      let flat = if l.record.thirty_percent { " [30%]" } else { "" };
      let _ = writeln!(
        out,
        "  - {} {nights} {}{flat}",
        l.record.hotel_name.as_deref().unwrap_or("-"),
        format_rupiah(l.record.rate)
      );
    }
  }

  out
}

fn field(out: &mut String, label: &str, value: Option<&str>) {
  let _ = writeln!(out, "  {label:<18} {}", value.unwrap_or("-"));
}

// ─── Activity log ─────────────────────────────────────────────────────────────

pub fn activity_log(entries: &[ActivityLogEntry]) -> String {
  let mut out = String::new();
  for e in entries {
    let _ = writeln!(
      out,
      "{}  {:<8}  {}",
      e.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
      e.actor,
      e.description
    );
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone as _, Utc};
  use siap_core::claim::{
    ActivityType, ClaimId, ClaimInfo, ClaimNumber, CostComponents, DocumentRefs, FundingSource,
    LodgingDetail, PaymentMethod, Stored, TeamMember,
  };

  use super::*;

  fn sample_claim() -> Claim {
    let date = |d| NaiveDate::from_ymd_opt(2026, 4, d).unwrap();
    Claim {
      id:           ClaimId(7),
      claim_number: ClaimNumber::new(2026, 381),
      info:         ClaimInfo::new(
        "SPT-014/K3/2026",
        FundingSource::Dipa,
        ActivityType::OfficialTravel,
        PaymentMethod::Kkp,
        date(6),
        date(9),
      ),
      costs:        CostComponents::default(),
      total_cost:   3_420_000.0,
      documents:    DocumentRefs::default(),
      created_at:   Utc.with_ymd_and_hms(2026, 4, 10, 2, 30, 0).unwrap(),
    }
  }

  #[test]
  fn rupiah_grouping() {
    assert_eq!(format_rupiah(0.0), "Rp 0");
    assert_eq!(format_rupiah(950.0), "Rp 950");
    assert_eq!(format_rupiah(1_000.0), "Rp 1.000");
    assert_eq!(format_rupiah(1_000_000.0), "Rp 1.000.000");
    assert_eq!(format_rupiah(12_345_678.4), "Rp 12.345.678");
    assert_eq!(format_rupiah(-250_000.0), "-Rp 250.000");
  }

  #[test]
  fn dashboard_shows_cards_and_shares() {
    let stats = DashboardStats {
      total_dipa:     750_000.0,
      total_pnbp:     250_000.0,
      count_perjadin: 2,
      count_rapat:    1,
      kkp_usage:      500_000.0,
    };
    let out = dashboard(&stats);
    assert!(out.contains("Total SPJ DIPA"));
    assert!(out.contains("Rp 750.000"));
    assert!(out.contains("2 kegiatan"));
    assert!(out.contains("75.0%"));
    assert!(out.contains("25.0%"));
  }

  #[test]
  fn empty_dashboard_has_empty_bars() {
    let out = dashboard(&DashboardStats::default());
    assert!(out.contains(&"░".repeat(BAR_WIDTH)));
    assert!(!out.contains('█'));
  }

  #[test]
  fn claims_table_lists_each_claim() {
    let out = claims_table(&[sample_claim()]);
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("SPJ/2026/381"));
    assert!(out.contains("Perjalanan Dinas"));
    assert!(out.contains("Rp 3.420.000"));
    assert_eq!(claims_table(&[]), "Belum ada data SPJ.\n");
  }

  #[test]
  fn claim_detail_lists_children() {
    let claim = sample_claim();
    let detail = ClaimDetail {
      transport: Vec::new(),
      lodging:   vec![Stored {
        id:       1,
        claim_id: claim.id,
        record:   LodgingDetail {
          hotel_name:     Some("Hotel Gran Senyiur".into()),
          nights:         Some(3),
          rate:           650_000.0,
          thirty_percent: true,
        },
      }],
      team:      vec![Stored {
        id:       1,
        claim_id: claim.id,
        record:   TeamMember {
          name: Some("Budi Santoso".into()),
          position: Some("Pengawas K3".into()),
          ..TeamMember::default()
        },
      }],
      partners:  Vec::new(),
      claim,
    };

    let out = claim_detail(&detail);
    assert!(out.starts_with("SPJ/2026/381 (id 7)"));
    assert!(out.contains("No. SPPD           -"));
    assert!(out.contains("Budi Santoso (Pengawas K3)"));
    assert!(out.contains("3 malam Rp 650.000 [30%]"));
    assert!(!out.contains("Transportasi"));
  }
}
