//! Queryable HTML tree over the `scraper` crate.
//!
//! The portal renders everything as bordered tables: announcement pages are
//! `<th>`/`<td>` pairs, award pages are flat cell runs with an optional
//! nested table per realization row.

use scraper::{ElementRef, Html, Selector};

const DETAIL_ROWS: &str = "table.table.table-sm.table-bordered tr";

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// A parsed portal page.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Trimmed text of the `<td>` in the first bordered-table row whose
    /// `<th>` text equals `header` after trimming.
    pub fn value_by_header(&self, header: &str) -> Option<String> {
        let td = selector("td");
        self.header_row(header)
            .and_then(|row| row.select(&td).next())
            .map(text_of)
    }

    /// Trimmed text of every `<li>` under the row headed `header`.
    pub fn list_by_header(&self, header: &str) -> Vec<String> {
        let li = selector("li");
        self.header_row(header)
            .map(|row| row.select(&li).map(text_of).collect())
            .unwrap_or_default()
    }

    fn header_row(&self, header: &str) -> Option<ElementRef<'_>> {
        let rows = selector(DETAIL_ROWS);
        let th = selector("th");
        self.html.select(&rows).find(|row| {
            row.select(&th)
                .next()
                .is_some_and(|cell| text_of(cell) == header)
        })
    }

    /// Trimmed text of every `<td>` on the page, in document order.
    pub fn cell_texts(&self) -> Vec<String> {
        let td = selector("td");
        self.html.select(&td).map(text_of).collect()
    }

    /// The `index`-th `<table>` in document order, nested tables included.
    pub fn table(&self, index: usize) -> Option<ElementRef<'_>> {
        let table = selector("table");
        self.html.select(&table).nth(index)
    }
}

/// Element text with surrounding whitespace removed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Rows that belong to `table` itself, skipping rows of nested tables.
pub fn direct_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// `<td>` and `<th>` children of a row.
pub fn direct_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// First table nested anywhere inside `element`.
pub fn nested_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let table = selector("table");
    element.select(&table).next()
}

/// First row of `table` (at any depth) that holds a data cell.
pub fn first_data_row(table: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let tr = selector("tr");
    let td = selector("td");
    table.select(&tr).find(|row| row.select(&td).next().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"
        <html><body>
        <table class="table table-sm table-bordered">
          <tr><th> Kode Tender </th><td>  123 </td></tr>
          <tr><th>Tahun Anggaran</th><td>APBD 2024</td></tr>
          <tr><th>Lokasi Pekerjaan</th><td><ul>
            <li> Kota Bandung - Bandung (Kota) </li>
            <li>Kab. Bogor</li>
          </ul></td></tr>
        </table>
        <table class="table"><tr><th>Metode Pengadaan</th><td>ignored</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_value_by_header_trims() {
        let doc = Document::parse(DETAIL);
        assert_eq!(doc.value_by_header("Kode Tender").as_deref(), Some("123"));
        assert_eq!(
            doc.value_by_header("Tahun Anggaran").as_deref(),
            Some("APBD 2024")
        );
    }

    #[test]
    fn test_value_by_header_absent_or_unbordered() {
        let doc = Document::parse(DETAIL);
        assert_eq!(doc.value_by_header("Jenis Kontrak"), None);
        assert_eq!(doc.value_by_header("Metode Pengadaan"), None);
    }

    #[test]
    fn test_list_by_header() {
        let doc = Document::parse(DETAIL);
        assert_eq!(
            doc.list_by_header("Lokasi Pekerjaan"),
            vec!["Kota Bandung - Bandung (Kota)", "Kab. Bogor"]
        );
        assert!(doc.list_by_header("Kode Paket").is_empty());
    }

    #[test]
    fn test_direct_rows_skip_nested() {
        let html = r#"
            <table id="outer">
              <tr><td>a</td></tr>
              <tr><td><table><tr><td>inner</td></tr><tr><td>inner2</td></tr></table></td></tr>
              <tr><th>h</th><td>b</td></tr>
            </table>
        "#;
        let doc = Document::parse(html);
        let outer = doc.table(0).unwrap();
        let rows = direct_rows(outer);
        assert_eq!(rows.len(), 3);
        assert_eq!(direct_cells(rows[2]).len(), 2);
        let inner = nested_table(rows[1]).unwrap();
        assert_eq!(text_of(first_data_row(inner).unwrap()), "inner");
    }

    #[test]
    fn test_cell_texts_document_order() {
        let doc = Document::parse("<table><tr><td> x </td><td>y</td></tr></table>");
        assert_eq!(doc.cell_texts(), vec!["x", "y"]);
    }
}
