//! Authenticity token and session cookie acquisition.

use std::sync::OnceLock;

use regex::Regex;

use crate::category::Category;
use crate::http_client::HttpClient;
use crate::types::{ScrapeError, ScrapeResult, Session};

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"d\.authenticityToken\s*=\s*['"]([^'"]+)['"]"#).expect("token regex is valid")
    })
}

/// Pull the `d.authenticityToken = '...'` value out of an entry page.
pub fn extract_token(body: &str) -> Option<String> {
    token_regex()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Reduce `set-cookie` values to a `cookie` request header.
///
/// Each value is split on commas and only the `name=value` part before the
/// first semicolon is kept. Fragments without `=` (the tail of an
/// `Expires=Wed, 21 Oct ...` date) are dropped.
pub fn cookie_header(set_cookie: &[&str]) -> String {
    set_cookie
        .iter()
        .flat_map(|value| value.split(','))
        .filter_map(|part| part.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fetch a category's entry page once and build its [`Session`].
///
/// Not retried: any failure here skips the whole category.
pub async fn acquire(
    client: &HttpClient,
    category: Category,
    base_url: &str,
) -> ScrapeResult<Session> {
    let url = category.entry_url(base_url);
    let auth_error = |reason: String| ScrapeError::Auth { category, reason };

    let resp = client
        .get(&url)
        .await
        .map_err(|e| auth_error(format!("entry page {url}: {e}")))?;

    let token = extract_token(&resp.body)
        .ok_or_else(|| auth_error("authenticity token not found".to_string()))?;
    let cookies = cookie_header(&resp.header_values("set-cookie"));
    if cookies.is_empty() {
        return Err(auth_error("no session cookie set".to_string()));
    }

    tracing::debug!("session acquired for {category}");
    Ok(Session { token, cookies })
}
