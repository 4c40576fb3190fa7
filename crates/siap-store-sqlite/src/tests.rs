//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use siap_core::{
  activity::SYSTEM_ACTOR,
  claim::{
    ActivityType, ClaimId, ClaimInfo, ClaimNumber, DocumentRefs, FundingSource, LodgingDetail,
    PartnerOrganization, PaymentMethod, TeamMember, TransportDetail,
  },
  stats::DashboardStats,
  store::{ClaimStore, StoreError as _, submit_with_fresh_number},
  submission::NewClaim,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn claim(funding: FundingSource, activity: ActivityType, payment: PaymentMethod) -> NewClaim {
  NewClaim::new(ClaimInfo::new(
    "SPT-001/2026",
    funding,
    activity,
    payment,
    date(2026, 3, 2),
    date(2026, 3, 5),
  ))
}

fn dipa_travel() -> NewClaim {
  claim(FundingSource::Dipa, ActivityType::OfficialTravel, PaymentMethod::Cash)
}

fn transport(ticket: &str) -> TransportDetail {
  TransportDetail {
    mode:          Some("Pesawat".into()),
    ticket_number: Some(ticket.into()),
    carrier:       Some("Garuda".into()),
    fare:          1_250_000.0,
  }
}

fn lodging(hotel: &str) -> LodgingDetail {
  LodgingDetail {
    hotel_name:     Some(hotel.into()),
    nights:         Some(3),
    rate:           450_000.0,
    thirty_percent: false,
  }
}

fn member(name: &str) -> TeamMember {
  TeamMember {
    name:      Some(name.into()),
    position:  Some("Pengawas K3".into()),
    grade:     Some("III/b".into()),
    work_unit: None,
  }
}

fn partner(name: &str) -> PartnerOrganization { PartnerOrganization { name: Some(name.into()) } }

fn number(serial: u32) -> ClaimNumber { ClaimNumber::new(2026, serial) }

/// Yields a fixed sequence of serials.
struct SeqRng(Vec<u32>);

impl rand_core::RngCore for SeqRng {
  fn next_u32(&mut self) -> u32 { self.0.remove(0) }
  fn next_u64(&mut self) -> u64 { u64::from(self.next_u32()) }
  fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(0) }
  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_with_children_creates_all_rows() {
  let s = store().await;

  let mut input = dipa_travel();
  input.transport = vec![transport("GA-101"), transport("GA-102")];
  input.lodging = vec![lodging("Hotel Mesra")];
  input.team = vec![member("Budi"), member("Siti"), member("Andi")];
  input.partners = vec![partner("PT Maju"), partner("CV Jaya"), partner("PT Sentosa"), partner("PT Abadi")];

  let id = s.submit_claim(number(1), input).await.unwrap();

  let detail = s.get_claim(id).await.unwrap().expect("claim exists");
  assert_eq!(detail.claim.id, id);
  assert_eq!(detail.transport.len(), 2);
  assert_eq!(detail.lodging.len(), 1);
  assert_eq!(detail.team.len(), 3);
  assert_eq!(detail.partners.len(), 4);
  assert_eq!(detail.child_count(), 10);

  assert!(detail.transport.iter().all(|t| t.claim_id == id));
  assert!(detail.lodging.iter().all(|l| l.claim_id == id));
  assert!(detail.team.iter().all(|m| m.claim_id == id));
  assert!(detail.partners.iter().all(|p| p.claim_id == id));

  let log = s.activity_log(50).await.unwrap();
  assert_eq!(log.len(), 1);
  assert_eq!(log[0].actor, SYSTEM_ACTOR);
  assert_eq!(log[0].description, format!("Created SPJ ID: {id}"));
}

#[tokio::test]
async fn submit_without_children_succeeds() {
  let s = store().await;
  let id = s.submit_claim(number(7), dipa_travel()).await.unwrap();

  let detail = s.get_claim(id).await.unwrap().unwrap();
  assert_eq!(detail.child_count(), 0);
  assert_eq!(s.activity_log(50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn claim_fields_roundtrip() {
  let s = store().await;

  let mut input = claim(
    FundingSource::Pnbp,
    ActivityType::Other("Bimtek".into()),
    PaymentMethod::Kkp,
  );
  input.info.travel_letter_number = Some("SPPD-9".into());
  input.info.order_date = Some(date(2026, 2, 27));
  input.info.duration_days = Some(4);
  input.info.destination = Some("Balikpapan".into());
  input.info.representation = 150_000.0;
  input.costs.fuel = 200_000.0;
  input.costs.toll = 45_000.0;
  input.total_cost = 2_395_000.0;
  input.documents = DocumentRefs {
    travel_order: Some("uploads/spt.pdf".into()),
    receipt: Some("uploads/kwitansi.jpg".into()),
    ..DocumentRefs::default()
  };

  let id = s.submit_claim(number(42), input.clone()).await.unwrap();
  let stored = s.get_claim(id).await.unwrap().unwrap().claim;

  assert_eq!(stored.claim_number.as_str(), "SPJ/2026/42");
  assert_eq!(stored.info, input.info);
  assert_eq!(stored.costs, input.costs);
  assert_eq!(stored.total_cost, 2_395_000.0);
  assert_eq!(stored.documents, input.documents);
  assert_eq!(stored.info.payment_order_number, None);
}

#[tokio::test]
async fn lodging_flag_roundtrip() {
  let s = store().await;
  let mut input = dipa_travel();
  input.lodging = vec![LodgingDetail { thirty_percent: true, nights: None, ..lodging("Tanpa Kwitansi") }];

  let id = s.submit_claim(number(3), input).await.unwrap();
  let detail = s.get_claim(id).await.unwrap().unwrap();
  assert!(detail.lodging[0].record.thirty_percent);
  assert_eq!(detail.lodging[0].record.nights, None);
}

#[tokio::test]
async fn two_submissions_get_distinct_ids() {
  let s = store().await;
  let a = s.submit_claim(number(1), dipa_travel()).await.unwrap();
  let b = s.submit_claim(number(2), dipa_travel()).await.unwrap();
  assert_ne!(a, b);
}

#[tokio::test]
async fn duplicate_claim_number_fails_and_leaves_nothing_behind() {
  let s = store().await;
  s.submit_claim(number(5), dipa_travel()).await.unwrap();

  let mut second = dipa_travel();
  second.transport = vec![transport("GA-999")];
  second.team = vec![member("Rina")];

  let err = s.submit_claim(number(5), second).await.unwrap_err();
  assert!(err.is_duplicate_claim_number());
  assert!(
    matches!(&err, Error::DuplicateClaimNumber(n) if n.as_str() == "SPJ/2026/5"),
    "unexpected error: {err}"
  );

  assert_eq!(s.list_claims().await.unwrap().len(), 1);
  assert_eq!(s.activity_log(50).await.unwrap().len(), 1);
  // The rejected claim's transport and team rows were rolled back too.
  let first = s.get_claim(ClaimId(1)).await.unwrap().unwrap();
  assert_eq!(first.child_count(), 0);
}

/// Row counts of every table a submission writes to.
async fn table_counts(s: &SqliteStore) -> [i64; 6] {
  s.conn
    .call(|conn| {
      let mut counts = [0; 6];
      for (i, table) in [
        "claims",
        "transport_details",
        "lodging_details",
        "team_members",
        "partner_organizations",
        "activity_log",
      ]
      .iter()
      .enumerate()
      {
        counts[i] = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
      }
      Ok(counts)
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn failure_after_children_written_rolls_everything_back() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER refuse_partners BEFORE INSERT ON partner_organizations
         BEGIN SELECT RAISE(ABORT, 'partner rows refused'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  // Parent, transport, lodging and team rows are inserted before partners.
  let mut input = dipa_travel();
  input.transport = vec![transport("GA-101"), transport("GA-102")];
  input.lodging = vec![lodging("Hotel Mesra")];
  input.team = vec![member("Budi"), member("Siti")];
  input.partners = vec![partner("PT Maju")];

  let err = s.submit_claim(number(8), input).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)), "unexpected error: {err}");
  assert!(!err.is_duplicate_claim_number());

  assert_eq!(table_counts(&s).await, [0; 6]);
  assert!(s.list_claims().await.unwrap().is_empty());
  assert!(s.activity_log(50).await.unwrap().is_empty());

  // The connection is still usable once the trigger is gone.
  s.conn
    .call(|conn| {
      conn.execute_batch("DROP TRIGGER refuse_partners;")?;
      Ok(())
    })
    .await
    .unwrap();
  let mut retry = dipa_travel();
  retry.partners = vec![partner("PT Maju")];
  s.submit_claim(number(8), retry).await.unwrap();
  assert_eq!(table_counts(&s).await, [1, 0, 0, 0, 1, 1]);
}

#[tokio::test]
async fn taken_number_is_replaced_by_a_fresh_one() {
  let s = store().await;
  s.submit_claim(number(5), dipa_travel()).await.unwrap();

  let mut rng = SeqRng(vec![5, 5, 6]);
  let id = submit_with_fresh_number(&s, 2026, &mut rng, dipa_travel(), 5)
    .await
    .unwrap();

  let stored = s.get_claim(id).await.unwrap().unwrap().claim;
  assert_eq!(stored.claim_number.as_str(), "SPJ/2026/6");
  assert!(rng.0.is_empty());
  assert_eq!(s.list_claims().await.unwrap().len(), 2);
  assert_eq!(s.activity_log(50).await.unwrap().len(), 2);
}

#[tokio::test]
async fn fresh_number_attempts_are_bounded() {
  let s = store().await;
  s.submit_claim(number(5), dipa_travel()).await.unwrap();

  let mut rng = SeqRng(vec![5, 5, 6]);
  let err = submit_with_fresh_number(&s, 2026, &mut rng, dipa_travel(), 2)
    .await
    .unwrap_err();

  assert!(err.is_duplicate_claim_number(), "unexpected error: {err}");
  assert_eq!(rng.0, vec![6]);
  assert_eq!(s.list_claims().await.unwrap().len(), 1);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_claim_returns_none() {
  let s = store().await;
  assert!(s.get_claim(ClaimId(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn list_claims_newest_first() {
  let s = store().await;
  let first  = s.submit_claim(number(1), dipa_travel()).await.unwrap();
  let second = s.submit_claim(number(2), dipa_travel()).await.unwrap();
  let third  = s.submit_claim(number(3), dipa_travel()).await.unwrap();

  let claims = s.list_claims().await.unwrap();
  let ids: Vec<_> = claims.iter().map(|c| c.id).collect();
  assert_eq!(ids, vec![third, second, first]);
  assert!(claims.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn list_claims_empty() {
  let s = store().await;
  assert!(s.list_claims().await.unwrap().is_empty());
}

#[tokio::test]
async fn activity_log_respects_limit() {
  let s = store().await;
  for serial in 0..5 {
    s.submit_claim(number(serial), dipa_travel()).await.unwrap();
  }

  let log = s.activity_log(2).await.unwrap();
  assert_eq!(log.len(), 2);
  assert_eq!(log[0].description, "Created SPJ ID: 5");
  assert_eq!(log[1].description, "Created SPJ ID: 4");
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_on_empty_store_are_zero() {
  let s = store().await;
  assert_eq!(s.dashboard_stats().await.unwrap(), DashboardStats::default());
}

#[tokio::test]
async fn stats_single_dipa_claim() {
  let s = store().await;
  let mut input = dipa_travel();
  input.total_cost = 1_000_000.0;
  s.submit_claim(number(1), input).await.unwrap();

  let stats = s.dashboard_stats().await.unwrap();
  assert_eq!(stats.total_dipa, 1_000_000.0);
  assert_eq!(stats.total_pnbp, 0.0);
  assert_eq!(stats.count_perjadin, 1);
  assert_eq!(stats.count_rapat, 0);
  assert_eq!(stats.kkp_usage, 0.0);
}

#[tokio::test]
async fn stats_mixed_claims() {
  let s = store().await;

  let mut a = claim(FundingSource::Dipa, ActivityType::OfficialTravel, PaymentMethod::Kkp);
  a.total_cost = 1_000_000.0;
  let mut b = claim(FundingSource::Pnbp, ActivityType::Meeting, PaymentMethod::Kkp);
  b.total_cost = 250_000.0;
  let mut c = claim(FundingSource::Pnbp, ActivityType::Meeting, PaymentMethod::Cash);
  c.total_cost = 500_000.0;
  let mut d = claim(
    FundingSource::Other("BLU".into()),
    ActivityType::Other("Bimtek".into()),
    PaymentMethod::Other("LS".into()),
  );
  d.total_cost = 9_999_999.0;

  for (serial, input) in [a, b, c, d].into_iter().enumerate() {
    s.submit_claim(number(serial as u32), input).await.unwrap();
  }

  let stats = s.dashboard_stats().await.unwrap();
  assert_eq!(stats, DashboardStats {
    total_dipa:     1_000_000.0,
    total_pnbp:     750_000.0,
    count_perjadin: 1,
    count_rapat:    2,
    kkp_usage:      1_250_000.0,
  });
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn store_survives_reopen_on_disk() {
  let dir = std::env::temp_dir().join(format!("siap-store-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("reopen.db");
  let _ = std::fs::remove_file(&path);

  let s = SqliteStore::open(&path).await.unwrap();
  let id = s.submit_claim(number(11), dipa_travel()).await.unwrap();
  s.close().await.unwrap();

  let reopened = SqliteStore::open(&path).await.unwrap();
  let claims = reopened.list_claims().await.unwrap();
  assert_eq!(claims.len(), 1);
  assert_eq!(claims[0].id, id);
  reopened.close().await.unwrap();

  let _ = std::fs::remove_dir_all(&dir);
}
