//! [`SqliteStore`], the SQLite implementation of [`ClaimStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use siap_core::{
  activity::{self, ActivityLogEntry, SYSTEM_ACTOR},
  claim::{
    ActivityType, Claim, ClaimDetail, ClaimId, ClaimNumber, FundingSource, PaymentMethod,
  },
  stats::DashboardStats,
  store::ClaimStore,
  submission::NewClaim,
};

use crate::{
  Error, Result,
  encode::{
    CLAIM_COLUMNS, RawActivity, RawClaim, encode_date, encode_dt, lodging_from_row,
    partner_from_row, team_member_from_row, transport_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A claim store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All clones
/// share one background thread, so statements from concurrent requests are
/// serialised.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Any clone used afterwards fails with a
  /// database error.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Whether `err` is a violation of a `UNIQUE` constraint. The only unique
/// column written by this store is `claims.claim_number`.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── ClaimStore impl ─────────────────────────────────────────────────────────

impl ClaimStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn submit_claim(&self, claim_number: ClaimNumber, claim: NewClaim) -> Result<ClaimId> {
    let number_str = claim_number.as_str().to_owned();
    let now_str    = encode_dt(Utc::now());

    let result = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls back every statement below.
        let tx = conn.transaction()?;

        let info = &claim.info;
        let docs = &claim.documents;
        tx.execute(
          "INSERT INTO claims (
             claim_number, order_number, travel_letter_number,
             payment_order_number, drpp_number, budget_code, funding_source,
             activity_type, payment_method, transport_payment, lodging_payment,
             order_date, travel_letter_date, departure_date, return_date,
             duration_days, destination, province, organizational_unit,
             representation, fuel, toll, total_cost,
             file_travel_order, file_cost_breakdown, file_travel_letter,
             file_responsibility, file_receipt, file_activity_report,
             file_price_offer, created_at
           ) VALUES (
             :claim_number, :order_number, :travel_letter_number,
             :payment_order_number, :drpp_number, :budget_code, :funding_source,
             :activity_type, :payment_method, :transport_payment, :lodging_payment,
             :order_date, :travel_letter_date, :departure_date, :return_date,
             :duration_days, :destination, :province, :organizational_unit,
             :representation, :fuel, :toll, :total_cost,
             :file_travel_order, :file_cost_breakdown, :file_travel_letter,
             :file_responsibility, :file_receipt, :file_activity_report,
             :file_price_offer, :created_at
           )",
          rusqlite::named_params! {
            ":claim_number":         number_str,
            ":order_number":         info.order_number,
            ":travel_letter_number": info.travel_letter_number,
            ":payment_order_number": info.payment_order_number,
            ":drpp_number":          info.drpp_number,
            ":budget_code":          info.budget_code,
            ":funding_source":       info.funding_source.as_str(),
            ":activity_type":        info.activity_type.as_str(),
            ":payment_method":       info.payment_method.as_str(),
            ":transport_payment":    info.transport_payment,
            ":lodging_payment":      info.lodging_payment,
            ":order_date":           info.order_date.map(encode_date),
            ":travel_letter_date":   info.travel_letter_date.map(encode_date),
            ":departure_date":       encode_date(info.departure_date),
            ":return_date":          encode_date(info.return_date),
            ":duration_days":        info.duration_days,
            ":destination":          info.destination,
            ":province":             info.province,
            ":organizational_unit":  info.organizational_unit,
            ":representation":       info.representation,
            ":fuel":                 claim.costs.fuel,
            ":toll":                 claim.costs.toll,
            ":total_cost":           claim.total_cost,
            ":file_travel_order":    docs.travel_order,
            ":file_cost_breakdown":  docs.cost_breakdown,
            ":file_travel_letter":   docs.travel_letter,
            ":file_responsibility":  docs.responsibility,
            ":file_receipt":         docs.receipt,
            ":file_activity_report": docs.activity_report,
            ":file_price_offer":     docs.price_offer,
            ":created_at":           now_str,
          },
        )?;
        let claim_id = tx.last_insert_rowid();

        {
          let mut stmt = tx.prepare(
            "INSERT INTO transport_details (claim_id, mode, ticket_number, carrier, fare)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for t in &claim.transport {
            stmt.execute(rusqlite::params![claim_id, t.mode, t.ticket_number, t.carrier, t.fare])?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO lodging_details (claim_id, hotel_name, nights, rate, thirty_percent)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for l in &claim.lodging {
            stmt.execute(rusqlite::params![
              claim_id,
              l.hotel_name,
              l.nights,
              l.rate,
              l.thirty_percent,
            ])?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO team_members (claim_id, name, position, grade, work_unit)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for m in &claim.team {
            stmt.execute(rusqlite::params![claim_id, m.name, m.position, m.grade, m.work_unit])?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO partner_organizations (claim_id, name) VALUES (?1, ?2)",
          )?;
          for p in &claim.partners {
            stmt.execute(rusqlite::params![claim_id, p.name])?;
          }
        }

        tx.execute(
          "INSERT INTO activity_log (actor, description, recorded_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![
            SYSTEM_ACTOR,
            activity::claim_created(ClaimId(claim_id)),
            now_str,
          ],
        )?;

        tx.commit()?;
        Ok(claim_id)
      })
      .await;

    match result {
      Ok(id) => {
        tracing::debug!(claim_id = id, claim_number = %claim_number, "claim committed");
        Ok(ClaimId(id))
      }
      Err(e) if is_unique_violation(&e) => Err(Error::DuplicateClaimNumber(claim_number)),
      Err(e) => Err(e.into()),
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_claims(&self) -> Result<Vec<Claim>> {
    let raws: Vec<RawClaim> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CLAIM_COLUMNS} FROM claims ORDER BY created_at DESC, claim_id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawClaim::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClaim::into_claim).collect()
  }

  async fn get_claim(&self, id: ClaimId) -> Result<Option<ClaimDetail>> {
    let claim_id = id.0;

    let raw = self
      .conn
      .call(move |conn| {
        let claim = conn
          .query_row(
            &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = ?1"),
            rusqlite::params![claim_id],
            RawClaim::from_row,
          )
          .optional()?;

        let Some(claim) = claim else {
          return Ok(None);
        };

        let transport = conn
          .prepare(
            "SELECT detail_id, claim_id, mode, ticket_number, carrier, fare
             FROM transport_details WHERE claim_id = ?1 ORDER BY detail_id",
          )?
          .query_map(rusqlite::params![claim_id], transport_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let lodging = conn
          .prepare(
            "SELECT detail_id, claim_id, hotel_name, nights, rate, thirty_percent
             FROM lodging_details WHERE claim_id = ?1 ORDER BY detail_id",
          )?
          .query_map(rusqlite::params![claim_id], lodging_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let team = conn
          .prepare(
            "SELECT member_id, claim_id, name, position, grade, work_unit
             FROM team_members WHERE claim_id = ?1 ORDER BY member_id",
          )?
          .query_map(rusqlite::params![claim_id], team_member_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let partners = conn
          .prepare(
            "SELECT partner_id, claim_id, name
             FROM partner_organizations WHERE claim_id = ?1 ORDER BY partner_id",
          )?
          .query_map(rusqlite::params![claim_id], partner_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((claim, transport, lodging, team, partners)))
      })
      .await?;

    let Some((claim, transport, lodging, team, partners)) = raw else {
      return Ok(None);
    };

    Ok(Some(ClaimDetail {
      claim: claim.into_claim()?,
      transport,
      lodging,
      team,
      partners,
    }))
  }

  async fn dashboard_stats(&self) -> Result<DashboardStats> {
    let dipa      = FundingSource::Dipa.as_str().to_owned();
    let pnbp      = FundingSource::Pnbp.as_str().to_owned();
    let perjadin  = ActivityType::OfficialTravel.as_str().to_owned();
    let rapat     = ActivityType::Meeting.as_str().to_owned();
    let kkp       = PaymentMethod::Kkp.as_str().to_owned();

    let stats = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT
             COALESCE(SUM(CASE WHEN funding_source = ?1 THEN total_cost END), 0.0),
             COALESCE(SUM(CASE WHEN funding_source = ?2 THEN total_cost END), 0.0),
             COUNT(CASE WHEN activity_type = ?3 THEN 1 END),
             COUNT(CASE WHEN activity_type = ?4 THEN 1 END),
             COALESCE(SUM(CASE WHEN payment_method = ?5 THEN total_cost END), 0.0)
           FROM claims",
          rusqlite::params![dipa, pnbp, perjadin, rapat, kkp],
          |row| {
            Ok(DashboardStats {
              total_dipa:     row.get(0)?,
              total_pnbp:     row.get(1)?,
              count_perjadin: row.get(2)?,
              count_rapat:    row.get(3)?,
              kkp_usage:      row.get(4)?,
            })
          },
        )?)
      })
      .await?;

    Ok(stats)
  }

  async fn activity_log(&self, limit: usize) -> Result<Vec<ActivityLogEntry>> {
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, actor, description, recorded_at
           FROM activity_log
           ORDER BY recorded_at DESC, entry_id DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok(RawActivity {
              entry_id:    row.get(0)?,
              actor:       row.get(1)?,
              description: row.get(2)?,
              recorded_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_entry).collect()
  }
}
