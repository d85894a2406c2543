//! Procurement categories and their portal layouts.
//!
//! Each category owns its URL templates, listing schema and header labels so
//! the extractors dispatch on it once instead of branching per field.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::ScrapeResult;

/// The three procurement categories, processed in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Open competitive tender (`lelang`).
    #[default]
    #[serde(rename = "tender")]
    Tender,
    /// Restricted procurement (`nontender`).
    #[serde(rename = "non-tender")]
    NonTender,
    /// Direct registration (`pencatatan`).
    #[serde(rename = "pencatatan")]
    Registration,
}

/// Header labels queried on an announcement page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailHeaders {
    pub code: &'static str,
    pub fiscal_year: &'static str,
    pub method: &'static str,
    /// `Jenis Kontrak` for contracts, `Jenis Pengadaan` for registrations.
    pub kind: &'static str,
}

pub const LOCATION_HEADER: &str = "Lokasi Pekerjaan";

impl Category {
    pub const ALL: [Category; 3] = [Category::Tender, Category::NonTender, Category::Registration];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tender => "tender",
            Category::NonTender => "non-tender",
            Category::Registration => "pencatatan",
        }
    }

    /// Page that embeds the authenticity token and sets the session cookie.
    pub fn entry_url(&self, base: &str) -> String {
        let path = match self {
            Category::Tender => "lelang",
            Category::NonTender => "nontender",
            Category::Registration => "pencatatan",
        };
        format!("{}/{path}", base.trim_end_matches('/'))
    }

    /// Listing endpoint filtered to one organization (`rekanan`).
    pub fn listing_url(&self, base: &str, organization: &str) -> ScrapeResult<String> {
        let path = match self {
            Category::Tender => "dt/lelang",
            Category::NonTender => "dt/pl",
            Category::Registration => "dt/nonspk",
        };
        let url = Url::parse_with_params(
            &format!("{}/{path}", base.trim_end_matches('/')),
            &[("rekanan", organization)],
        )?;
        Ok(url.to_string())
    }

    pub fn detail_url(&self, base: &str, id: &str) -> String {
        let base = base.trim_end_matches('/');
        match self {
            Category::Tender => format!("{base}/lelang/{id}/pengumumanlelang"),
            Category::NonTender => format!("{base}/nontender/{id}/pengumumanpl"),
            Category::Registration => format!("{base}/pencatatan/pengumumannonspk?id={id}"),
        }
    }

    /// Candidate award pages, one per workflow state the winner may live in.
    pub fn award_urls(&self, base: &str, id: &str) -> Vec<String> {
        let base = base.trim_end_matches('/');
        match self {
            Category::Tender => vec![
                format!("{base}/evaluasi/{id}/pemenangberkontrak"),
                format!("{base}/evaluasi/{id}/pemenang"),
                format!("{base}/evaluasitender/{id}/pemenang"),
            ],
            Category::NonTender => vec![format!("{base}/evaluasinontender/{id}/pemenang")],
            Category::Registration => {
                vec![format!("{base}/pencatatan/pengumumannonspkpemenang?id={id}")]
            }
        }
    }

    /// Status label of a concluded item in this category's listing.
    pub fn finished_status(&self) -> &'static str {
        match self {
            Category::Tender => "Tender Sudah Selesai",
            Category::NonTender | Category::Registration => "Paket Sudah Selesai",
        }
    }

    /// Listing column holding the status label.
    pub fn status_column(&self) -> usize {
        match self {
            Category::Tender | Category::NonTender => 3,
            Category::Registration => 8,
        }
    }

    pub fn detail_headers(&self) -> DetailHeaders {
        match self {
            Category::Tender => DetailHeaders {
                code: "Kode Tender",
                fiscal_year: "Tahun Anggaran",
                method: "Metode Pengadaan",
                kind: "Jenis Kontrak",
            },
            Category::NonTender => DetailHeaders {
                code: "Kode Paket",
                fiscal_year: "Tahun Anggaran",
                method: "Metode Pengadaan",
                kind: "Jenis Kontrak",
            },
            Category::Registration => DetailHeaders {
                code: "Kode Paket",
                fiscal_year: "Tahun Anggaran",
                method: "Metode Pengadaan",
                kind: "Jenis Pengadaan",
            },
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
