//! Async HTTP client wrapping reqwest.
//!
//! Every portal call goes through here so the XHR-style headers the portal
//! expects are set in one place. Non-2xx statuses come back as errors.

use std::time::Duration;

use crate::config::ScraperConfig;
use crate::types::{ScrapeError, ScrapeResult};

const ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Response from a portal request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// All response headers, one entry per value.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Every value of a header, in response order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// HTTP client for the portal.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Plain GET, used for entry pages.
    pub async fn get(&self, url: &str) -> ScrapeResult<HttpResponse> {
        let r = self.client.get(url).send().await?;
        Self::read(url, r).await
    }

    /// GET with the XHR headers and a referer, used for detail and award pages.
    pub async fn get_page(&self, url: &str, referer: &str) -> ScrapeResult<HttpResponse> {
        let r = self
            .client
            .get(url)
            .header("accept", ACCEPT)
            .header("content-type", FORM_CONTENT_TYPE)
            .header("x-requested-with", "XMLHttpRequest")
            .header("referer", referer)
            .send()
            .await?;
        Self::read(url, r).await
    }

    /// POST form data (url-encoded) with a session cookie.
    pub async fn post_form(
        &self,
        url: &str,
        form_fields: &[(&str, String)],
        referer: &str,
        cookies: &str,
    ) -> ScrapeResult<HttpResponse> {
        let r = self
            .client
            .post(url)
            .header("accept", ACCEPT)
            .header("x-requested-with", "XMLHttpRequest")
            .header("referer", referer)
            .header("cookie", cookies)
            .form(form_fields)
            .send()
            .await?;
        Self::read(url, r).await
    }

    async fn read(url: &str, r: reqwest::Response) -> ScrapeResult<HttpResponse> {
        let status = r.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let headers: Vec<(String, String)> = r
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = r.text().await?;

        Ok(HttpResponse {
            headers,
            body,
        })
    }
}
