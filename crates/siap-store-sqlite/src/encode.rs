//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with fixed microsecond
//! precision so they sort lexically. Calendar dates are `YYYY-MM-DD`.
//! Enumerations are stored as their wire labels.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use siap_core::{
  activity::ActivityLogEntry,
  claim::{
    Claim, ClaimId, ClaimInfo, ClaimNumber, CostComponents, DocumentRefs,
    LodgingDetail, PartnerOrganization, Stored, TeamMember, TransportDetail,
  },
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Claim rows ──────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that reads whole claims.
pub const CLAIM_COLUMNS: &str = "
  claim_id, claim_number, order_number, travel_letter_number,
  payment_order_number, drpp_number, budget_code, funding_source,
  activity_type, payment_method, transport_payment, lodging_payment,
  order_date, travel_letter_date, departure_date, return_date,
  duration_days, destination, province, organizational_unit,
  representation, fuel, toll, total_cost,
  file_travel_order, file_cost_breakdown, file_travel_letter,
  file_responsibility, file_receipt, file_activity_report, file_price_offer,
  created_at";

/// Raw values read directly from a `claims` row.
pub struct RawClaim {
  pub claim_id:             i64,
  pub claim_number:         String,
  pub order_number:         String,
  pub travel_letter_number: Option<String>,
  pub payment_order_number: Option<String>,
  pub drpp_number:          Option<String>,
  pub budget_code:          Option<String>,
  pub funding_source:       String,
  pub activity_type:        String,
  pub payment_method:       String,
  pub transport_payment:    Option<String>,
  pub lodging_payment:      Option<String>,
  pub order_date:           Option<String>,
  pub travel_letter_date:   Option<String>,
  pub departure_date:       String,
  pub return_date:          String,
  pub duration_days:        Option<i64>,
  pub destination:          Option<String>,
  pub province:             Option<String>,
  pub organizational_unit:  Option<String>,
  pub representation:       f64,
  pub fuel:                 f64,
  pub toll:                 f64,
  pub total_cost:           f64,
  pub documents:            DocumentRefs,
  pub created_at:           String,
}

impl RawClaim {
  /// Read a row selected with [`CLAIM_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      claim_id:             row.get("claim_id")?,
      claim_number:         row.get("claim_number")?,
      order_number:         row.get("order_number")?,
      travel_letter_number: row.get("travel_letter_number")?,
      payment_order_number: row.get("payment_order_number")?,
      drpp_number:          row.get("drpp_number")?,
      budget_code:          row.get("budget_code")?,
      funding_source:       row.get("funding_source")?,
      activity_type:        row.get("activity_type")?,
      payment_method:       row.get("payment_method")?,
      transport_payment:    row.get("transport_payment")?,
      lodging_payment:      row.get("lodging_payment")?,
      order_date:           row.get("order_date")?,
      travel_letter_date:   row.get("travel_letter_date")?,
      departure_date:       row.get("departure_date")?,
      return_date:          row.get("return_date")?,
      duration_days:        row.get("duration_days")?,
      destination:          row.get("destination")?,
      province:             row.get("province")?,
      organizational_unit:  row.get("organizational_unit")?,
      representation:       row.get("representation")?,
      fuel:                 row.get("fuel")?,
      toll:                 row.get("toll")?,
      total_cost:           row.get("total_cost")?,
      documents:            DocumentRefs {
        travel_order:    row.get("file_travel_order")?,
        cost_breakdown:  row.get("file_cost_breakdown")?,
        travel_letter:   row.get("file_travel_letter")?,
        responsibility:  row.get("file_responsibility")?,
        receipt:         row.get("file_receipt")?,
        activity_report: row.get("file_activity_report")?,
        price_offer:     row.get("file_price_offer")?,
      },
      created_at:           row.get("created_at")?,
    })
  }

  pub fn into_claim(self) -> Result<Claim> {
    let info = ClaimInfo {
      order_number:         self.order_number,
      travel_letter_number: self.travel_letter_number,
      payment_order_number: self.payment_order_number,
      drpp_number:          self.drpp_number,
      budget_code:          self.budget_code,
      funding_source:       self.funding_source.into(),
      activity_type:        self.activity_type.into(),
      payment_method:       self.payment_method.into(),
      transport_payment:    self.transport_payment,
      lodging_payment:      self.lodging_payment,
      order_date:           self.order_date.as_deref().map(decode_date).transpose()?,
      travel_letter_date:   self.travel_letter_date.as_deref().map(decode_date).transpose()?,
      departure_date:       decode_date(&self.departure_date)?,
      return_date:          decode_date(&self.return_date)?,
      duration_days:        self.duration_days,
      destination:          self.destination,
      province:             self.province,
      organizational_unit:  self.organizational_unit,
      representation:       self.representation,
    };

    Ok(Claim {
      id: ClaimId(self.claim_id),
      claim_number: ClaimNumber::from_stored(self.claim_number),
      info,
      costs: CostComponents { fuel: self.fuel, toll: self.toll },
      total_cost: self.total_cost,
      documents: self.documents,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

// ─── Child rows ──────────────────────────────────────────────────────────────

pub fn transport_from_row(row: &Row<'_>) -> rusqlite::Result<Stored<TransportDetail>> {
  Ok(Stored {
    id:       row.get(0)?,
    claim_id: ClaimId(row.get(1)?),
    record:   TransportDetail {
      mode:          row.get(2)?,
      ticket_number: row.get(3)?,
      carrier:       row.get(4)?,
      fare:          row.get(5)?,
    },
  })
}

pub fn lodging_from_row(row: &Row<'_>) -> rusqlite::Result<Stored<LodgingDetail>> {
  Ok(Stored {
    id:       row.get(0)?,
    claim_id: ClaimId(row.get(1)?),
    record:   LodgingDetail {
      hotel_name:     row.get(2)?,
      nights:         row.get(3)?,
      rate:           row.get(4)?,
      thirty_percent: row.get(5)?,
    },
  })
}

pub fn team_member_from_row(row: &Row<'_>) -> rusqlite::Result<Stored<TeamMember>> {
  Ok(Stored {
    id:       row.get(0)?,
    claim_id: ClaimId(row.get(1)?),
    record:   TeamMember {
      name:      row.get(2)?,
      position:  row.get(3)?,
      grade:     row.get(4)?,
      work_unit: row.get(5)?,
    },
  })
}

pub fn partner_from_row(row: &Row<'_>) -> rusqlite::Result<Stored<PartnerOrganization>> {
  Ok(Stored {
    id:       row.get(0)?,
    claim_id: ClaimId(row.get(1)?),
    record:   PartnerOrganization { name: row.get(2)? },
  })
}

// ─── Activity log rows ───────────────────────────────────────────────────────

/// Raw values read directly from an `activity_log` row.
pub struct RawActivity {
  pub entry_id:    i64,
  pub actor:       String,
  pub description: String,
  pub recorded_at: String,
}

impl RawActivity {
  pub fn into_entry(self) -> Result<ActivityLogEntry> {
    Ok(ActivityLogEntry {
      id:          self.entry_id,
      actor:       self.actor,
      description: self.description,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
