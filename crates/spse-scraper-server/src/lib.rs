//! CLI and HTTP front-end for the SPSE scraper.

pub mod api;
pub mod config;

pub use api::{router, serve};
pub use config::{resolve_listen_addr, scraper_config};
