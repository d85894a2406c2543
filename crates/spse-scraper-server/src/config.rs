//! Configuration loading and resolution.

use std::path::PathBuf;

use spse_scraper::ScraperConfig;

const DEFAULT_PORT: u16 = 3001;

/// Resolve the listen address: explicit flag, then `PORT`, then the default.
pub fn resolve_listen_addr(explicit: Option<&str>) -> String {
    resolve_listen_addr_with(explicit, std::env::var("PORT").ok().as_deref())
}

fn resolve_listen_addr_with(explicit: Option<&str>, port_env: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    let port = port_env
        .and_then(|p| p.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    format!("0.0.0.0:{port}")
}

/// Scraper settings from `SPSE_*` env vars with CLI overrides on top.
pub fn scraper_config(base_url: Option<String>, output_dir: Option<PathBuf>) -> ScraperConfig {
    let mut config = ScraperConfig::from_env();
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_precedence() {
        assert_eq!(
            resolve_listen_addr_with(Some("127.0.0.1:8080"), Some("9000")),
            "127.0.0.1:8080"
        );
        assert_eq!(resolve_listen_addr_with(None, Some("9000")), "0.0.0.0:9000");
        assert_eq!(resolve_listen_addr_with(None, Some("http")), "0.0.0.0:3001");
        assert_eq!(resolve_listen_addr_with(None, None), "0.0.0.0:3001");
    }

    #[test]
    fn test_overrides_applied() {
        let config = scraper_config(
            Some("http://localhost:1234/lpse".to_string()),
            Some(PathBuf::from("results")),
        );
        assert_eq!(config.base_url, "http://localhost:1234/lpse");
        assert_eq!(config.output_dir, PathBuf::from("results"));
    }
}
