//! Core data types for procurement listings, detail pages and award pages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::Category;

/// Authentication material scraped from a category entry page.
///
/// Created once per category per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub cookies: String,
}

/// A listing row that passed the finished-status filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub id: String,
    pub status_label: String,
}

/// Fields read from a tender or non-tender announcement page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    pub id: String,
    pub tipe_pengadaan: Category,
    pub kode_tender: Option<String>,
    pub tahun_anggaran: Option<String>,
    pub metode_pengadaan: Option<String>,
    pub jenis_kontrak: Option<String>,
    pub lokasi_pekerjaan: Vec<String>,
}

/// Fields read from a pencatatan announcement page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetail {
    pub id: String,
    pub tipe_pengadaan: Category,
    pub kode_tender: Option<String>,
    pub tahun_anggaran: Option<String>,
    pub metode_pengadaan: Option<String>,
    pub jenis_pengadaan: Option<String>,
}

/// Header-keyed data from an announcement page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailRecord {
    Contract(ContractDetail),
    Registration(RegistrationDetail),
}

/// Winner data for tender and non-tender items, mapped by cell position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAward {
    pub id: String,
    pub nama_tender: String,
    pub jenis_pengadaan: String,
    pub instansi: String,
    pub satuan: String,
    pub pagu: String,
    pub hps: String,
    pub nama_pemenang: String,
    pub alamat: String,
    pub npwp: String,
    pub harga_penawaran: String,
    pub harga_terkoreksi: String,
    pub harga_negosiasi: String,
}

/// One disbursement event under a pencatatan item.
///
/// Provider fields stay empty when no nested provider table follows the
/// event row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizationEntry {
    pub jenis_realisasi: String,
    pub nilai_realisasi: String,
    pub tanggal_realisasi: String,
    pub nama_penyedia: String,
    pub npwp: String,
    pub email: String,
    pub telp: String,
    pub alamat: String,
}

/// Winner data for pencatatan items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAward {
    pub id: String,
    pub nama_tender: String,
    pub jenis_pengadaan: String,
    pub instansi: String,
    pub satuan: String,
    pub pagu: String,
    pub hps: String,
    #[serde(rename = "namaPemenang")]
    pub realizations: Vec<RealizationEntry>,
}

/// Data resolved from one of the award pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AwardRecord {
    Contract(ContractAward),
    Registration(RegistrationAward),
}

/// Shallow merge of a detail record and an award record for one item.
///
/// Always carries `id` and `tipePengadaan`; award keys overwrite detail
/// keys on collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcurementRecord(Map<String, Value>);

impl ProcurementRecord {
    /// Merge whatever the detail and award steps produced for `item`.
    pub fn merge(
        category: Category,
        item: &CandidateItem,
        detail: Option<&DetailRecord>,
        award: Option<&AwardRecord>,
    ) -> Self {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::String(item.id.clone()));
        fields.insert(
            "tipePengadaan".into(),
            Value::String(category.as_str().to_string()),
        );

        for part in [
            detail.and_then(|d| serde_json::to_value(d).ok()),
            award.and_then(|a| serde_json::to_value(a).ok()),
        ]
        .into_iter()
        .flatten()
        {
            if let Value::Object(map) = part {
                fields.extend(map);
            }
        }

        Self(fields)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.0.get("tipePengadaan").and_then(Value::as_str)
    }

    /// Look up a merged field by its output key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// All errors that can occur while scraping.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("Missing organization name")]
    MissingOrganization,

    #[error("Authentication failed for {category}: {reason}")]
    Auth { category: Category, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Unexpected page structure: {0}")]
    Structure(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
