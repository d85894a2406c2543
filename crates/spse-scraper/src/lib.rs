//! SPSE scraper — award records for tender, non-tender and pencatatan
//! procurement items of one organization.

pub mod award;
pub mod category;
pub mod config;
pub mod detail;
pub mod document;
pub mod http_client;
pub mod listing;
pub mod retry;
pub mod runner;
pub mod session;
pub mod storage;
pub mod types;

pub use category::Category;
pub use config::ScraperConfig;
pub use retry::{Outcome, RetryPolicy};
pub use runner::Scraper;
pub use storage::ResultWriter;
pub use types::*;
