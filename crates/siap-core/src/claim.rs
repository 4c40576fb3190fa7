//! Claim types: the SPJ travel-expense report and its child record sets.
//!
//! Rust field names are English; the serde names are the wire names used by
//! the data-entry form and returned by the read endpoints.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};

use crate::lenient;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// The budget a claim's costs are charged against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FundingSource {
  /// State budget allotment.
  Dipa,
  /// Non-tax state revenue.
  Pnbp,
  /// Any other label entered on the form, preserved verbatim.
  Other(String),
}

impl FundingSource {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Dipa => "SPJ DIPA",
      Self::Pnbp => "SPJ PNBP",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for FundingSource {
  fn from(s: String) -> Self {
    match s.as_str() {
      "SPJ DIPA" => Self::Dipa,
      "SPJ PNBP" => Self::Pnbp,
      _ => Self::Other(s),
    }
  }
}

impl From<FundingSource> for String {
  fn from(f: FundingSource) -> Self {
    match f {
      FundingSource::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

/// What kind of trip or event the claim covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
  /// Official travel ("Perjalanan Dinas").
  OfficialTravel,
  /// A meeting ("Rapat").
  Meeting,
  Other(String),
}

impl ActivityType {
  pub fn as_str(&self) -> &str {
    match self {
      Self::OfficialTravel => "Perjalanan Dinas",
      Self::Meeting => "Rapat",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for ActivityType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Perjalanan Dinas" => Self::OfficialTravel,
      "Rapat" => Self::Meeting,
      _ => Self::Other(s),
    }
  }
}

impl From<ActivityType> for String {
  fn from(a: ActivityType) -> Self {
    match a {
      ActivityType::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

/// How the claim's costs were settled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
  /// Government credit card ("Kartu Kredit Pemerintah").
  Kkp,
  /// Cash ("Tunai").
  Cash,
  Other(String),
}

impl PaymentMethod {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Kkp => "KKP",
      Self::Cash => "Tunai",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for PaymentMethod {
  fn from(s: String) -> Self {
    match s.as_str() {
      "KKP" => Self::Kkp,
      "Tunai" => Self::Cash,
      _ => Self::Other(s),
    }
  }
}

impl From<PaymentMethod> for String {
  fn from(p: PaymentMethod) -> Self {
    match p {
      PaymentMethod::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned identity of a claim.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClaimId(pub i64);

impl fmt::Display for ClaimId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The human-readable claim number, `SPJ/<year>/<serial>`.
///
/// Generated numbers are not collision-free: the serial is drawn at random
/// from `0..10_000` and nothing checks it against existing claims. The store
/// enforces uniqueness and reports a collision as a failed submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimNumber(String);

impl ClaimNumber {
  /// Exclusive upper bound of the random serial.
  pub const SERIAL_RANGE: u32 = 10_000;

  pub fn new(year: i32, serial: u32) -> Self { Self(format!("SPJ/{year}/{serial}")) }

  /// Draw a random serial for `year`.
  pub fn generate<R: RngCore + ?Sized>(year: i32, rng: &mut R) -> Self {
    Self::new(year, rng.next_u32() % Self::SERIAL_RANGE)
  }

  /// Wrap a number read back from storage.
  pub fn from_stored(s: String) -> Self { Self(s) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ClaimNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Claim attributes ────────────────────────────────────────────────────────

/// The validated header of a claim: document numbers, classification, dates
/// and destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInfo {
  /// Supporting-order number (Surat Perintah Tugas). Required.
  #[serde(rename = "no_spt")]
  pub order_number:          String,
  /// Travel assignment letter number (SPPD).
  #[serde(rename = "no_sppd")]
  pub travel_letter_number:  Option<String>,
  /// Payment order number (SPM).
  #[serde(rename = "no_spm")]
  pub payment_order_number:  Option<String>,
  /// Direct-payment statement number (DRPP).
  #[serde(rename = "no_drpp")]
  pub drpp_number:           Option<String>,
  /// Budget account code (MAK).
  #[serde(rename = "kode_mak")]
  pub budget_code:           Option<String>,
  #[serde(rename = "sumber_anggaran")]
  pub funding_source:        FundingSource,
  #[serde(rename = "jenis_kegiatan")]
  pub activity_type:         ActivityType,
  #[serde(rename = "metode_pembayaran")]
  pub payment_method:        PaymentMethod,
  #[serde(rename = "metode_bayar_transport")]
  pub transport_payment:     Option<String>,
  #[serde(rename = "metode_bayar_hotel")]
  pub lodging_payment:       Option<String>,
  #[serde(rename = "tanggal_spt")]
  pub order_date:            Option<NaiveDate>,
  #[serde(rename = "tanggal_sppd")]
  pub travel_letter_date:    Option<NaiveDate>,
  #[serde(rename = "tanggal_berangkat")]
  pub departure_date:        NaiveDate,
  #[serde(rename = "tanggal_pulang")]
  pub return_date:           NaiveDate,
  /// Trip length in days as entered on the form.
  #[serde(rename = "lama_perjalanan")]
  pub duration_days:         Option<i64>,
  #[serde(rename = "tujuan")]
  pub destination:           Option<String>,
  #[serde(rename = "provinsi_tujuan")]
  pub province:              Option<String>,
  #[serde(rename = "unit_organisasi")]
  pub organizational_unit:   Option<String>,
  /// Representation allowance.
  #[serde(rename = "representasi")]
  pub representation:        f64,
}

impl ClaimInfo {
  /// A header with only the required attributes set.
  pub fn new(
    order_number: impl Into<String>,
    funding_source: FundingSource,
    activity_type: ActivityType,
    payment_method: PaymentMethod,
    departure_date: NaiveDate,
    return_date: NaiveDate,
  ) -> Self {
    Self {
      order_number: order_number.into(),
      travel_letter_number: None,
      payment_order_number: None,
      drpp_number: None,
      budget_code: None,
      funding_source,
      activity_type,
      payment_method,
      transport_payment: None,
      lodging_payment: None,
      order_date: None,
      travel_letter_date: None,
      departure_date,
      return_date,
      duration_days: None,
      destination: None,
      province: None,
      organizational_unit: None,
      representation: 0.0,
    }
  }
}

/// Per-category cost components submitted alongside the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostComponents {
  #[serde(rename = "bbm", default, deserialize_with = "lenient::amount_or_zero")]
  pub fuel: f64,
  #[serde(rename = "tol", default, deserialize_with = "lenient::amount_or_zero")]
  pub toll: f64,
}

/// References to the supporting documents. Each slot holds an opaque file
/// identifier produced by the upload widget; no content is stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRefs {
  /// Travel order (SPT).
  #[serde(rename = "file_spt", default)]
  pub travel_order:        Option<String>,
  /// Cost breakdown.
  #[serde(rename = "file_rincian", default)]
  pub cost_breakdown:      Option<String>,
  /// Travel assignment letter (SPPD).
  #[serde(rename = "file_sppd", default)]
  pub travel_letter:       Option<String>,
  /// Statement of absolute responsibility (SPTJM).
  #[serde(rename = "file_sptjm", default)]
  pub responsibility:      Option<String>,
  #[serde(rename = "file_kwitansi", default)]
  pub receipt:             Option<String>,
  #[serde(rename = "file_laporan_perjadin", default)]
  pub activity_report:     Option<String>,
  #[serde(rename = "file_surat_penawaran", default)]
  pub price_offer:         Option<String>,
}

impl DocumentRefs {
  /// Replace empty references with `None`.
  pub fn normalized(self) -> Self {
    Self {
      travel_order:    present(self.travel_order),
      cost_breakdown:  present(self.cost_breakdown),
      travel_letter:   present(self.travel_letter),
      responsibility:  present(self.responsibility),
      receipt:         present(self.receipt),
      activity_report: present(self.activity_report),
      price_offer:     present(self.price_offer),
    }
  }
}

// ─── Child records ───────────────────────────────────────────────────────────

/// A transport leg (flight, train, ship, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportDetail {
  #[serde(rename = "jenis", default)]
  pub mode:          Option<String>,
  #[serde(rename = "nomor_tiket", default)]
  pub ticket_number: Option<String>,
  /// Airline or operator.
  #[serde(rename = "maskapai", default)]
  pub carrier:       Option<String>,
  #[serde(rename = "tarif", default, deserialize_with = "lenient::amount_or_zero")]
  pub fare:          f64,
}

impl TransportDetail {
  pub fn normalized(self) -> Self {
    Self {
      mode: present(self.mode),
      ticket_number: present(self.ticket_number),
      carrier: present(self.carrier),
      fare: self.fare,
    }
  }
}

/// A hotel stay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LodgingDetail {
  #[serde(rename = "nama_hotel", default)]
  pub hotel_name:     Option<String>,
  #[serde(rename = "jumlah_hari", default, deserialize_with = "lenient::count")]
  pub nights:         Option<i64>,
  #[serde(rename = "tarif", default, deserialize_with = "lenient::amount_or_zero")]
  pub rate:           f64,
  /// Claimed at the 30 % flat rate (no hotel receipt).
  #[serde(rename = "is_30_percent", default, deserialize_with = "lenient::flag")]
  pub thirty_percent: bool,
}

impl LodgingDetail {
  pub fn normalized(self) -> Self {
    Self { hotel_name: present(self.hotel_name), ..self }
  }
}

/// A member of the travelling team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
  #[serde(rename = "nama", default)]
  pub name:      Option<String>,
  #[serde(rename = "jabatan", default)]
  pub position:  Option<String>,
  /// Civil-service grade.
  #[serde(rename = "golongan", default)]
  pub grade:     Option<String>,
  #[serde(rename = "unit_kerja", default)]
  pub work_unit: Option<String>,
}

impl TeamMember {
  pub fn normalized(self) -> Self {
    Self {
      name:      present(self.name),
      position:  present(self.position),
      grade:     present(self.grade),
      work_unit: present(self.work_unit),
    }
  }
}

/// A partner company or organisation involved in the activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerOrganization {
  #[serde(rename = "nama_perusahaan", default)]
  pub name: Option<String>,
}

impl PartnerOrganization {
  pub fn normalized(self) -> Self { Self { name: present(self.name) } }
}

/// A child record as read back from storage, tagged with its own id and the
/// owning claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
  pub id:       i64,
  #[serde(rename = "spj_id")]
  pub claim_id: ClaimId,
  #[serde(flatten)]
  pub record:   T,
}

// ─── Claim ───────────────────────────────────────────────────────────────────

/// A persisted claim. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
  pub id:           ClaimId,
  #[serde(rename = "no_spj")]
  pub claim_number: ClaimNumber,
  #[serde(flatten)]
  pub info:         ClaimInfo,
  #[serde(flatten)]
  pub costs:        CostComponents,
  #[serde(rename = "total_biaya")]
  pub total_cost:   f64,
  #[serde(flatten)]
  pub documents:    DocumentRefs,
  /// Server-assigned timestamp.
  pub created_at:   DateTime<Utc>,
}

/// A claim together with all of its child record sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDetail {
  #[serde(flatten)]
  pub claim:     Claim,
  #[serde(rename = "transportDetails")]
  pub transport: Vec<Stored<TransportDetail>>,
  #[serde(rename = "penginapanDetails")]
  pub lodging:   Vec<Stored<LodgingDetail>>,
  #[serde(rename = "tim")]
  pub team:      Vec<Stored<TeamMember>>,
  #[serde(rename = "perusahaan")]
  pub partners:  Vec<Stored<PartnerOrganization>>,
}

impl ClaimDetail {
  /// Total number of child rows across all four sets.
  pub fn child_count(&self) -> usize {
    self.transport.len() + self.lodging.len() + self.team.len() + self.partners.len()
  }
}

/// `None` for absent or blank strings.
pub(crate) fn present(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}
