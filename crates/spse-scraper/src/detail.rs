//! Announcement page extraction by header lookup.

use crate::category::{Category, LOCATION_HEADER};
use crate::document::Document;
use crate::http_client::HttpClient;
use crate::retry::{Outcome, RetryPolicy};
use crate::types::{ContractDetail, DetailRecord, RegistrationDetail};

/// Read the category's header set from an announcement page body.
///
/// Missing rows become `None`; this never fails.
pub fn parse_detail(category: Category, id: &str, body: &str) -> DetailRecord {
    let doc = Document::parse(body);
    let headers = category.detail_headers();

    match category {
        Category::Tender | Category::NonTender => DetailRecord::Contract(ContractDetail {
            id: id.to_string(),
            tipe_pengadaan: category,
            kode_tender: doc.value_by_header(headers.code),
            tahun_anggaran: doc.value_by_header(headers.fiscal_year),
            metode_pengadaan: doc.value_by_header(headers.method),
            jenis_kontrak: doc.value_by_header(headers.kind),
            lokasi_pekerjaan: doc.list_by_header(LOCATION_HEADER),
        }),
        Category::Registration => DetailRecord::Registration(RegistrationDetail {
            id: id.to_string(),
            tipe_pengadaan: category,
            kode_tender: doc.value_by_header(headers.code),
            tahun_anggaran: doc.value_by_header(headers.fiscal_year),
            metode_pengadaan: doc.value_by_header(headers.method),
            jenis_pengadaan: doc.value_by_header(headers.kind),
        }),
    }
}

/// Fetch and parse one item's announcement page through the retry policy.
pub async fn extract(
    client: &HttpClient,
    retry: &RetryPolicy,
    category: Category,
    base_url: &str,
    id: &str,
    referer: &str,
) -> Outcome<DetailRecord> {
    let url = category.detail_url(base_url, id);
    let label = format!("detail {id}");

    retry
        .run(&label, || client.get_page(&url, referer))
        .await
        .map(|resp| parse_detail(category, id, &resp.body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(th, td)| format!("<tr><th>{th}</th><td>{td}</td></tr>"))
            .collect();
        format!(r#"<html><body><table class="table table-sm table-bordered">{body}</table></body></html>"#)
    }

    #[test]
    fn test_tender_fields() {
        let html = page(&[
            ("Kode Tender", "123"),
            ("Tahun Anggaran", "2024"),
            ("Metode Pengadaan", "Tender"),
            ("Lokasi Pekerjaan", "<ul><li>Kota Bandung</li><li> Kab. Garut </li></ul>"),
        ]);
        let DetailRecord::Contract(detail) = parse_detail(Category::Tender, "5", &html) else {
            panic!("expected contract detail");
        };
        assert_eq!(detail.kode_tender.as_deref(), Some("123"));
        assert_eq!(detail.tahun_anggaran.as_deref(), Some("2024"));
        assert_eq!(detail.metode_pengadaan.as_deref(), Some("Tender"));
        assert_eq!(detail.jenis_kontrak, None);
        assert_eq!(detail.lokasi_pekerjaan, vec!["Kota Bandung", "Kab. Garut"]);
    }

    #[test]
    fn test_non_tender_reads_kode_paket() {
        let html = page(&[("Kode Tender", "wrong"), ("Kode Paket", "777")]);
        let DetailRecord::Contract(detail) = parse_detail(Category::NonTender, "5", &html) else {
            panic!("expected contract detail");
        };
        assert_eq!(detail.kode_tender.as_deref(), Some("777"));
        assert_eq!(detail.tipe_pengadaan, Category::NonTender);
    }

    #[test]
    fn test_registration_fields() {
        let html = page(&[
            ("Kode Paket", "P-1"),
            ("Jenis Pengadaan", "Jasa Lainnya"),
            ("Jenis Kontrak", "Lumsum"),
        ]);
        let record = parse_detail(Category::Registration, "8", &html);
        let DetailRecord::Registration(detail) = &record else {
            panic!("expected registration detail");
        };
        assert_eq!(detail.kode_tender.as_deref(), Some("P-1"));
        assert_eq!(detail.jenis_pengadaan.as_deref(), Some("Jasa Lainnya"));

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("jenisKontrak").is_none());
        assert!(json.get("lokasiPekerjaan").is_none());
        assert_eq!(json["tipePengadaan"], "pencatatan");
    }

    #[test]
    fn test_empty_page_yields_nulls() {
        let DetailRecord::Contract(detail) = parse_detail(Category::Tender, "1", "") else {
            panic!("expected contract detail");
        };
        assert_eq!(detail.id, "1");
        assert_eq!(detail.kode_tender, None);
        assert!(detail.lokasi_pekerjaan.is_empty());
    }
}
