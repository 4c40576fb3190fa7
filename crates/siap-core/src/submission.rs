//! Claim submission: the permissive draft posted by the form, and the
//! validated [`NewClaim`] handed to a [`ClaimStore`](crate::store::ClaimStore).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  claim::{
    ActivityType, ClaimId, ClaimInfo, CostComponents, DocumentRefs, FundingSource,
    LodgingDetail, PartnerOrganization, PaymentMethod, TeamMember, TransportDetail,
    present,
  },
  lenient,
};

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Header fields exactly as the form sends them. Everything is optional here;
/// [`ClaimDraft::validate`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicInfoDraft {
  pub no_spt:                 Option<String>,
  pub no_sppd:                Option<String>,
  pub no_spm:                 Option<String>,
  pub no_drpp:                Option<String>,
  pub kode_mak:               Option<String>,
  pub sumber_anggaran:        Option<String>,
  pub jenis_kegiatan:         Option<String>,
  pub metode_pembayaran:      Option<String>,
  pub metode_bayar_transport: Option<String>,
  pub metode_bayar_hotel:     Option<String>,
  pub tanggal_spt:            Option<String>,
  pub tanggal_sppd:           Option<String>,
  pub tanggal_berangkat:      Option<String>,
  pub tanggal_pulang:         Option<String>,
  #[serde(default, deserialize_with = "lenient::count")]
  pub lama_perjalanan:        Option<i64>,
  pub tujuan:                 Option<String>,
  pub provinsi_tujuan:        Option<String>,
  pub unit_organisasi:        Option<String>,
  #[serde(default, deserialize_with = "lenient::amount")]
  pub representasi:           Option<f64>,
}

/// The body of `POST /claims`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimDraft {
  #[serde(rename = "basicInfo", default)]
  pub basic_info: BasicInfoDraft,
  #[serde(rename = "transportDetails", default)]
  pub transport:  Option<Vec<TransportDetail>>,
  #[serde(rename = "penginapanDetails", default)]
  pub lodging:    Option<Vec<LodgingDetail>>,
  #[serde(rename = "tim", default)]
  pub team:       Option<Vec<TeamMember>>,
  #[serde(rename = "perusahaan", default)]
  pub partners:   Option<Vec<PartnerOrganization>>,
  #[serde(rename = "dokumen", default)]
  pub documents:  Option<DocumentRefs>,
  #[serde(rename = "komponen", default)]
  pub costs:      Option<CostComponents>,
  /// Total computed by the form; not recomputed here.
  #[serde(rename = "total_biaya", default, deserialize_with = "lenient::amount")]
  pub total_cost: Option<f64>,
}

impl ClaimDraft {
  /// Check required fields and dates, and normalise every optional value so
  /// that blanks become `None` and missing amounts become zero.
  pub fn validate(self) -> Result<NewClaim> {
    let b = self.basic_info;

    let order_number = required(b.no_spt, "no_spt")?;
    let funding_source = FundingSource::from(required(b.sumber_anggaran, "sumber_anggaran")?);
    let activity_type = ActivityType::from(required(b.jenis_kegiatan, "jenis_kegiatan")?);
    let payment_method =
      PaymentMethod::from(required(b.metode_pembayaran, "metode_pembayaran")?);

    let departure_date =
      parse_date(required(b.tanggal_berangkat, "tanggal_berangkat")?, "tanggal_berangkat")?;
    let return_date =
      parse_date(required(b.tanggal_pulang, "tanggal_pulang")?, "tanggal_pulang")?;
    if return_date < departure_date {
      return Err(Error::InvalidDateRange { departed: departure_date, returned: return_date });
    }

    let info = ClaimInfo {
      order_number,
      travel_letter_number: present(b.no_sppd),
      payment_order_number: present(b.no_spm),
      drpp_number: present(b.no_drpp),
      budget_code: present(b.kode_mak),
      funding_source,
      activity_type,
      payment_method,
      transport_payment: present(b.metode_bayar_transport),
      lodging_payment: present(b.metode_bayar_hotel),
      order_date: optional_date(b.tanggal_spt, "tanggal_spt")?,
      travel_letter_date: optional_date(b.tanggal_sppd, "tanggal_sppd")?,
      departure_date,
      return_date,
      duration_days: b.lama_perjalanan,
      destination: present(b.tujuan),
      province: present(b.provinsi_tujuan),
      organizational_unit: present(b.unit_organisasi),
      representation: b.representasi.unwrap_or(0.0),
    };

    Ok(NewClaim {
      info,
      costs: self.costs.unwrap_or_default(),
      documents: self.documents.unwrap_or_default().normalized(),
      total_cost: self.total_cost.unwrap_or(0.0),
      transport: normalize_all(self.transport, TransportDetail::normalized),
      lodging: normalize_all(self.lodging, LodgingDetail::normalized),
      team: normalize_all(self.team, TeamMember::normalized),
      partners: normalize_all(self.partners, PartnerOrganization::normalized),
    })
  }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
  present(value).ok_or(Error::MissingField(field))
}

fn parse_date(value: String, field: &'static str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate { field, value })
}

fn optional_date(value: Option<String>, field: &'static str) -> Result<Option<NaiveDate>> {
  present(value).map(|v| parse_date(v, field)).transpose()
}

fn normalize_all<T>(items: Option<Vec<T>>, f: fn(T) -> T) -> Vec<T> {
  items.unwrap_or_default().into_iter().map(f).collect()
}

// ─── NewClaim ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ClaimStore::submit_claim`]. The claim number,
/// id and `created_at` are assigned at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaim {
  pub info:       ClaimInfo,
  pub costs:      CostComponents,
  pub documents:  DocumentRefs,
  pub total_cost: f64,
  pub transport:  Vec<TransportDetail>,
  pub lodging:    Vec<LodgingDetail>,
  pub team:       Vec<TeamMember>,
  pub partners:   Vec<PartnerOrganization>,
}

impl NewClaim {
  /// A claim with no costs, documents or child records.
  pub fn new(info: ClaimInfo) -> Self {
    Self {
      info,
      costs: CostComponents::default(),
      documents: DocumentRefs::default(),
      total_cost: 0.0,
      transport: Vec::new(),
      lodging: Vec::new(),
      team: Vec::new(),
      partners: Vec::new(),
    }
  }

  /// Total number of child rows this claim will create.
  pub fn child_count(&self) -> usize {
    self.transport.len() + self.lodging.len() + self.team.len() + self.partners.len()
  }
}

// ─── Replies ─────────────────────────────────────────────────────────────────

/// Body returned by a successful `POST /claims`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
  pub success: bool,
  pub id:      ClaimId,
}

/// Body returned by any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReply {
  pub success: bool,
  pub message: String,
}
