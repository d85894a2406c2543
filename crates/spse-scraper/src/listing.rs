//! Listing retrieval and finished-status filtering.

use serde::Deserialize;
use serde_json::Value;

use crate::category::Category;
use crate::http_client::HttpClient;
use crate::types::{CandidateItem, ScrapeResult, Session};

/// DataTables payload returned by the listing endpoints.
#[derive(Debug, Deserialize)]
struct ListingPayload {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

/// Form body for a single-page listing query.
pub fn query_form(token: &str, page_length: u32) -> Vec<(&'static str, String)> {
    vec![
        ("draw", "1".to_string()),
        ("start", "0".to_string()),
        ("length", page_length.to_string()),
        ("search[value]", String::new()),
        ("search[regex]", "false".to_string()),
        ("authenticityToken", token.to_string()),
    ]
}

fn cell_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Keep rows whose status column holds the category's finished literal.
///
/// Rows that are not arrays never match.
pub fn filter_finished(category: Category, rows: &[Value]) -> Vec<CandidateItem> {
    let column = category.status_column();
    let finished = category.finished_status();

    rows.iter()
        .filter_map(Value::as_array)
        .filter(|row| row.get(column).and_then(Value::as_str) == Some(finished))
        .filter_map(|row| {
            Some(CandidateItem {
                id: row.first().and_then(cell_string)?,
                status_label: finished.to_string(),
            })
        })
        .collect()
}

/// Parse a listing response body and filter it.
pub fn parse_listing(category: Category, body: &str) -> ScrapeResult<Vec<CandidateItem>> {
    let payload: ListingPayload = serde_json::from_str(body)?;
    Ok(filter_finished(category, &payload.data.unwrap_or_default()))
}

/// Query one listing page. No retry; an error skips the category.
pub async fn fetch(
    client: &HttpClient,
    category: Category,
    base_url: &str,
    listing_url: &str,
    session: &Session,
    page_length: u32,
) -> ScrapeResult<Vec<CandidateItem>> {
    let referer = category.entry_url(base_url);
    let form = query_form(&session.token, page_length);
    let resp = client
        .post_form(listing_url, &form, &referer, &session.cookies)
        .await?;
    parse_listing(category, &resp.body)
}
