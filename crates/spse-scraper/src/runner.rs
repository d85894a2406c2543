//! Run orchestration: categories in order, items in listing order.

use crate::award;
use crate::category::Category;
use crate::config::ScraperConfig;
use crate::detail;
use crate::http_client::HttpClient;
use crate::listing;
use crate::retry::RetryPolicy;
use crate::session;
use crate::storage::ResultWriter;
use crate::types::{CandidateItem, ProcurementRecord, ScrapeError, ScrapeResult};

/// Drives a full scrape for one organization.
#[derive(Clone)]
pub struct Scraper {
    client: HttpClient,
    retry: RetryPolicy,
    config: ScraperConfig,
}

impl Scraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            client: HttpClient::new(&config),
            retry: RetryPolicy::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrape every category for `organization`.
    ///
    /// Only an empty organization name is an error. The name is used as
    /// given, whitespace included. Categories that fail authentication or
    /// listing are skipped, and items whose pages cannot be read still
    /// produce a record with whatever was found.
    pub async fn run(
        &self,
        organization: &str,
        persist: bool,
    ) -> ScrapeResult<Vec<ProcurementRecord>> {
        if organization.is_empty() {
            return Err(ScrapeError::MissingOrganization);
        }

        let mut results = Vec::new();
        for category in Category::ALL {
            tracing::info!("scraping {category} for \"{organization}\"");
            match self.scrape_category(category, organization).await {
                Ok(records) => results.extend(records),
                Err(e) => tracing::error!("skipping {category}: {e}"),
            }
        }

        if persist {
            let writer = ResultWriter::new(&self.config.output_dir);
            if let Err(e) = writer.write(organization, &results) {
                tracing::error!("failed to save results for \"{organization}\": {e}");
            }
        }

        Ok(results)
    }

    /// Scrape one category. An error means the category was skipped.
    pub async fn scrape_category(
        &self,
        category: Category,
        organization: &str,
    ) -> ScrapeResult<Vec<ProcurementRecord>> {
        let base_url = self.config.base_url.as_str();
        let session = session::acquire(&self.client, category, base_url).await?;
        let listing_url = category.listing_url(base_url, organization)?;

        let items = listing::fetch(
            &self.client,
            category,
            base_url,
            &listing_url,
            &session,
            self.config.page_length,
        )
        .await?;
        tracing::info!("found {} finished entries for {category}", items.len());

        let mut records = Vec::with_capacity(items.len());
        for item in &items {
            records.push(self.scrape_item(category, item, &listing_url).await);
        }
        Ok(records)
    }

    /// Detail then award for one item, merged with award fields on top.
    pub async fn scrape_item(
        &self,
        category: Category,
        item: &CandidateItem,
        listing_url: &str,
    ) -> ProcurementRecord {
        let base_url = self.config.base_url.as_str();
        tracing::debug!("processing {category} item {}", item.id);

        let detail = detail::extract(
            &self.client,
            &self.retry,
            category,
            base_url,
            &item.id,
            listing_url,
        )
        .await;
        let award = award::resolve(&self.client, &self.retry, category, base_url, &item.id).await;

        ProcurementRecord::merge(category, item, detail.as_found(), award.as_found())
    }
}
