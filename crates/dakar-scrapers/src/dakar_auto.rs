use crate::extract::ListingExtractor;
use crate::fetch::{HttpFetcher, PageFetchError, PageFetcher};
use crate::{ScrapeConfig, ScrapeQuery, Scraper};
use async_trait::async_trait;
use dakar_core::{Category, Result, VehicleRecord};
use std::sync::Arc;
use tracing::info;

/// Scraper for the dakar-auto.com classifieds feeds.
pub struct DakarAutoScraper {
    fetcher: Arc<dyn PageFetcher>,
    cars: ListingExtractor,
    motorcycles: ListingExtractor,
    rentals: ListingExtractor,
    concurrency: usize,
}

impl DakarAutoScraper {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config.timeout)?);
        Self::with_fetcher(fetcher, config.concurrency)
    }

    /// Builds a scraper over any page source, e.g. a stub in tests.
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, concurrency: usize) -> Result<Self> {
        Ok(Self {
            fetcher,
            cars: ListingExtractor::new(Category::Cars)?,
            motorcycles: ListingExtractor::new(Category::Motorcycles)?,
            rentals: ListingExtractor::new(Category::Rentals)?,
            concurrency: concurrency.max(1),
        })
    }

    fn extractor(&self, category: Category) -> &ListingExtractor {
        match category {
            Category::Cars => &self.cars,
            Category::Motorcycles => &self.motorcycles,
            Category::Rentals => &self.rentals,
        }
    }
}

#[async_trait]
impl Scraper for DakarAutoScraper {
    fn supported_categories(&self) -> Vec<Category> {
        Category::ALL.to_vec()
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    async fn scrape_page(&self, query: &ScrapeQuery) -> std::result::Result<Vec<VehicleRecord>, PageFetchError> {
        let page = self
            .fetcher
            .fetch(query.category, &query.feed_url, query.page)
            .await?;

        let records = self.extractor(query.category).extract(&page.markup);
        info!(
            "Page {} of {}: {} listings extracted",
            page.page,
            query.category,
            records.len()
        );
        Ok(records)
    }
}
