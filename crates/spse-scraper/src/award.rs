//! Award page resolution.
//!
//! An item's winner data lives on one of several pages depending on how far
//! its workflow got. Candidates are tried in order; the first page with the
//! expected cell layout wins. Pencatatan pages also carry a realization
//! table where each event row may be followed by a row holding a nested
//! provider table, which is folded into the event.

use scraper::ElementRef;

use crate::category::Category;
use crate::document::{direct_cells, direct_rows, first_data_row, nested_table, text_of, Document};
use crate::http_client::HttpClient;
use crate::retry::{Outcome, RetryPolicy};
use crate::types::{
    AwardRecord, ContractAward, RealizationEntry, RegistrationAward, ScrapeError, ScrapeResult,
};

/// Fewer cells than this means the page is in another workflow state.
pub const MIN_AWARD_CELLS: usize = 13;

/// Index of the realization table among all tables on a pencatatan page.
const REALIZATION_TABLE: usize = 1;

/// Parse an award page body.
///
/// Returns [`ScrapeError::Structure`] when the page does not have the
/// layout this category expects, which tells the caller to move on to the
/// next candidate URL.
pub fn parse_award(category: Category, id: &str, body: &str) -> ScrapeResult<AwardRecord> {
    let doc = Document::parse(body);
    let cells = doc.cell_texts();
    if cells.len() < MIN_AWARD_CELLS {
        return Err(ScrapeError::Structure(format!(
            "{} cells, need at least {MIN_AWARD_CELLS}",
            cells.len()
        )));
    }

    match category {
        Category::Tender | Category::NonTender => {
            Ok(AwardRecord::Contract(contract_award(id, &cells)))
        }
        Category::Registration => {
            let table = doc.table(REALIZATION_TABLE).ok_or_else(|| {
                ScrapeError::Structure("realization table not found".to_string())
            })?;
            Ok(AwardRecord::Registration(registration_award(
                id,
                &cells,
                parse_realizations(table),
            )))
        }
    }
}

/// Map the flat cell run of a tender/non-tender award page.
///
/// Cell 6 is an unused column in the portal layout and is never read.
pub fn contract_award(id: &str, cells: &[String]) -> ContractAward {
    let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
    ContractAward {
        id: id.to_string(),
        nama_tender: cell(0),
        jenis_pengadaan: cell(1),
        instansi: cell(2),
        satuan: cell(3),
        pagu: cell(4),
        hps: cell(5),
        nama_pemenang: cell(7),
        alamat: cell(8),
        npwp: cell(9),
        harga_penawaran: cell(10),
        harga_terkoreksi: cell(11),
        harga_negosiasi: cell(12),
    }
}

fn registration_award(
    id: &str,
    cells: &[String],
    realizations: Vec<RealizationEntry>,
) -> RegistrationAward {
    let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
    RegistrationAward {
        id: id.to_string(),
        nama_tender: cell(0),
        jenis_pengadaan: cell(1),
        instansi: cell(2),
        satuan: cell(3),
        pagu: cell(4),
        hps: cell(5),
        realizations,
    }
}

/// Walk the realization table, skipping its header row.
pub fn parse_realizations(table: ElementRef<'_>) -> Vec<RealizationEntry> {
    let rows = direct_rows(table);
    let mut entries = Vec::new();
    let mut at = 1;
    while at < rows.len() {
        match realization_at(&rows, at) {
            Some((entry, consumed)) => {
                entries.push(entry);
                at += consumed;
            }
            None => at += 1,
        }
    }
    entries
}

/// Parse the event row at `at`, folding in a provider row right after it.
///
/// Returns the entry and how many rows it consumed (1, or 2 when the next
/// row held the nested provider table).
fn realization_at(rows: &[ElementRef<'_>], at: usize) -> Option<(RealizationEntry, usize)> {
    let cells: Vec<String> = direct_cells(rows[at]).into_iter().map(text_of).collect();
    if cells.len() < 4 {
        return None;
    }

    let mut entry = RealizationEntry {
        jenis_realisasi: cells[1].clone(),
        nilai_realisasi: cells[2].clone(),
        tanggal_realisasi: cells[3].clone(),
        ..Default::default()
    };

    let Some(provider_table) = rows.get(at + 1).and_then(|row| nested_table(*row)) else {
        return Some((entry, 1));
    };

    let provider: Vec<String> = first_data_row(provider_table)
        .map(|row| direct_cells(row).into_iter().map(text_of).collect())
        .unwrap_or_default();
    let field = |i: usize| provider.get(i).cloned().unwrap_or_default();
    entry.nama_penyedia = field(1);
    entry.npwp = field(2);
    entry.email = field(3);
    entry.telp = field(4);
    entry.alamat = field(5);

    Some((entry, 2))
}

/// Try each candidate award page in order and return the first valid one.
pub async fn resolve(
    client: &HttpClient,
    retry: &RetryPolicy,
    category: Category,
    base_url: &str,
    id: &str,
) -> Outcome<AwardRecord> {
    let referer = category.detail_url(base_url, id);

    for url in category.award_urls(base_url, id) {
        let fetched = retry
            .run(&url, || client.get_page(&url, &referer))
            .await;

        match fetched {
            Outcome::Found(resp) => match parse_award(category, id, &resp.body) {
                Ok(record) => return Outcome::Found(record),
                Err(e) => tracing::debug!("skipping {url}: {e}"),
            },
            Outcome::Fallback { reason } => tracing::warn!("giving up on {url}: {reason}"),
        }
    }

    tracing::error!("no award page found for {category} item {id}");
    Outcome::fallback(format!("no award page found for {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_page(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<html><body><table><tr>{tds}</tr></table></body></html>")
    }

    const LETTERS: [&str; 13] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M"];

    #[test]
    fn test_contract_mapping_skips_cell_six() {
        let AwardRecord::Contract(award) =
            parse_award(Category::Tender, "9", &flat_page(&LETTERS)).unwrap()
        else {
            panic!("expected contract award");
        };
        assert_eq!(award.nama_tender, "A");
        assert_eq!(award.jenis_pengadaan, "B");
        assert_eq!(award.instansi, "C");
        assert_eq!(award.satuan, "D");
        assert_eq!(award.pagu, "E");
        assert_eq!(award.hps, "F");
        assert_eq!(award.nama_pemenang, "H");
        assert_eq!(award.alamat, "I");
        assert_eq!(award.npwp, "J");
        assert_eq!(award.harga_penawaran, "K");
        assert_eq!(award.harga_terkoreksi, "L");
        assert_eq!(award.harga_negosiasi, "M");

        let json = serde_json::to_value(AwardRecord::Contract(award)).unwrap();
        let values: Vec<&str> = json
            .as_object()
            .unwrap()
            .values()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(!values.contains(&"G"));
    }

    #[test]
    fn test_too_few_cells_is_structural() {
        let err = parse_award(Category::NonTender, "9", &flat_page(&LETTERS[..12])).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    const REGISTRATION_PAGE: &str = r#"
        <html><body>
        <table class="table">
          <tr><th>Nama Paket</th><td>Pengadaan ATK</td></tr>
          <tr><th>Jenis Pengadaan</th><td>Pengadaan Barang</td></tr>
          <tr><th>Instansi</th><td>Pemprov Jabar</td></tr>
          <tr><th>Satuan Kerja</th><td>Dinas Pendidikan</td></tr>
          <tr><th>Pagu</th><td>Rp 10.000.000</td></tr>
          <tr><th>HPS</th><td>Rp 9.500.000</td></tr>
        </table>
        <table class="table">
          <tr><th>No</th><th>Jenis</th><th>Nilai</th><th>Tanggal</th></tr>
          <tr><td>1</td><td>Kuitansi</td><td>Rp 4.000.000</td><td>01 Mar 2024</td></tr>
          <tr><td colspan="4">
            <table>
              <tr><th>No</th><th>Nama</th><th>NPWP</th><th>Email</th><th>Telp</th><th>Alamat</th></tr>
              <tr><td>1</td><td>CV Maju</td><td>01.234</td><td>cv@maju.id</td><td>0221</td><td>Bandung</td></tr>
            </table>
          </td></tr>
          <tr><td>2</td><td>Kuitansi</td><td>Rp 5.000.000</td><td>02 Apr 2024</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_registration_fusion() {
        let AwardRecord::Registration(award) =
            parse_award(Category::Registration, "31", REGISTRATION_PAGE).unwrap()
        else {
            panic!("expected registration award");
        };
        assert_eq!(award.nama_tender, "Pengadaan ATK");
        assert_eq!(award.hps, "Rp 9.500.000");
        assert_eq!(award.realizations.len(), 2);

        let first = &award.realizations[0];
        assert_eq!(first.jenis_realisasi, "Kuitansi");
        assert_eq!(first.nilai_realisasi, "Rp 4.000.000");
        assert_eq!(first.tanggal_realisasi, "01 Mar 2024");
        assert_eq!(first.nama_penyedia, "CV Maju");
        assert_eq!(first.npwp, "01.234");
        assert_eq!(first.email, "cv@maju.id");
        assert_eq!(first.telp, "0221");
        assert_eq!(first.alamat, "Bandung");

        let second = &award.realizations[1];
        assert_eq!(second.tanggal_realisasi, "02 Apr 2024");
        assert_eq!(second.nama_penyedia, "");
    }

    #[test]
    fn test_nested_table_without_data_row() {
        let html = r#"
            <table><tr><td>0</td></tr></table>
            <table>
              <tr><th>No</th></tr>
              <tr><td>1</td><td>Transfer</td><td>Rp 1</td><td>03 Mei 2024</td></tr>
              <tr><td><table><tr><th>Nama</th></tr></table></td></tr>
              <tr><td>2</td><td>Transfer</td><td>Rp 2</td><td>04 Mei 2024</td></tr>
            </table>
        "#;
        let doc = Document::parse(html);
        let entries = parse_realizations(doc.table(1).unwrap());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].nama_penyedia, "");
        assert_eq!(entries[1].nilai_realisasi, "Rp 2");
    }

    #[test]
    fn test_registration_without_second_table() {
        let err = parse_award(Category::Registration, "1", &flat_page(&LETTERS)).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }
}
