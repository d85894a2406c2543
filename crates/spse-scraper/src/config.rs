//! Scraper settings and environment resolution.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://spse.inaproc.id/jabarprov";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Runtime settings for a scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Portal root, e.g. `https://spse.inaproc.id/jabarprov`.
    pub base_url: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub timeout_ms: u64,
    /// Rows requested from a listing endpoint in its single page.
    pub page_length: u32,
    pub user_agent: String,
    /// Where persisted results are written.
    pub output_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_attempts: 3,
            retry_delay_ms: 1000,
            timeout_ms: 30_000,
            page_length: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ScraperConfig {
    /// Defaults overridden by `SPSE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ScraperConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            base_url: lookup("SPSE_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            max_attempts: parsed("SPSE_MAX_ATTEMPTS")
                .filter(|n| *n > 0)
                .map(|n| n as u32)
                .unwrap_or(defaults.max_attempts),
            retry_delay_ms: parsed("SPSE_RETRY_DELAY_MS").unwrap_or(defaults.retry_delay_ms),
            timeout_ms: parsed("SPSE_TIMEOUT_MS").unwrap_or(defaults.timeout_ms),
            page_length: parsed("SPSE_PAGE_LENGTH")
                .map(|n| n as u32)
                .unwrap_or(defaults.page_length),
            user_agent: defaults.user_agent,
            output_dir: lookup("SPSE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_delay(mut self, delay_ms: u64) -> Self {
        self.retry_delay_ms = delay_ms;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::from_lookup(|_| None);
        assert_eq!(config, ScraperConfig::default());
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_env_overrides() {
        let config = ScraperConfig::from_lookup(lookup_from(&[
            ("SPSE_BASE_URL", "http://127.0.0.1:9000/lpse"),
            ("SPSE_MAX_ATTEMPTS", "5"),
            ("SPSE_RETRY_DELAY_MS", "250"),
            ("SPSE_OUTPUT_DIR", "/tmp/out"),
        ]));
        assert_eq!(config.base_url, "http://127.0.0.1:9000/lpse");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay_ms, 250);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ScraperConfig::from_lookup(lookup_from(&[
            ("SPSE_MAX_ATTEMPTS", "0"),
            ("SPSE_TIMEOUT_MS", "soon"),
            ("SPSE_BASE_URL", "  "),
        ]));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
