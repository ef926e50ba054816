pub mod dakar_auto;
pub mod extract;
pub mod fetch;
pub mod profile;

use async_trait::async_trait;
use dakar_core::{Category, Result, ResultTable, VehicleRecord};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

pub use dakar_auto::DakarAutoScraper;
pub use extract::{ContainerParseError, ListingExtractor};
pub use fetch::{page_url, FetchFailure, HttpFetcher, ListingPage, PageFetchError, PageFetcher};

/// Enum representing the supported listing sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScraperType {
    /// dakar-auto.com - Senegalese vehicle classifieds
    DakarAuto,
}

/// Settings shared by every page request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Upper bound for one page request, connect to last byte.
    pub timeout: Duration,
    /// Pages fetched at once. Results are still assembled in page order.
    pub concurrency: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeQuery {
    pub category: Category,
    pub feed_url: Url,
    pub page: u32,
}

impl ScrapeQuery {
    /// Query for the first page of a category's default feed.
    pub fn new(category: Category) -> Result<Self> {
        Ok(Self::with_feed_url(category, Url::parse(category.default_feed_url())?))
    }

    pub fn with_feed_url(category: Category, feed_url: Url) -> Self {
        Self {
            category,
            feed_url,
            page: 1,
        }
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn page_url(&self) -> Url {
        page_url(&self.feed_url, self.page)
    }
}

/// Outcome of a multi-page run: the records that were extracted and the
/// pages that could not be fetched.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub table: ResultTable,
    pub failures: Vec<PageFetchError>,
    pub pages_requested: u32,
}

impl RunReport {
    pub fn pages_succeeded(&self) -> u32 {
        self.pages_requested - self.failures.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Trait for scraping vehicle listings from a classifieds source
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Fetch and extract a single page of listings
    async fn scrape_page(&self, query: &ScrapeQuery) -> std::result::Result<Vec<VehicleRecord>, PageFetchError>;

    /// Get all categories supported by this scraper
    fn supported_categories(&self) -> Vec<Category>;

    /// Number of pages fetched at once during a run
    fn concurrency(&self) -> usize {
        1
    }

    /// Scrape `max_pages` pages starting at the query's page.
    ///
    /// A page that fails to fetch is logged, recorded in the report and
    /// skipped; records are assembled in page order regardless of the
    /// order pages complete in.
    async fn scrape_listing(&self, query: ScrapeQuery, max_pages: u32) -> RunReport {
        let category = query.category;
        let queries: Vec<ScrapeQuery> = (0..max_pages)
            .map(|offset| ScrapeQuery {
                page: query.page + offset,
                ..query.clone()
            })
            .collect();

        info!(
            "Scraping {} pages of {} from {} ({} at a time)",
            max_pages,
            category,
            query.feed_url,
            self.concurrency()
        );

        // Results come back in page order whatever the completion order
        let pages: Vec<_> = queries.iter().map(|q| self.scrape_page(q)).collect();
        let results: Vec<_> = stream::iter(pages)
            .buffered(self.concurrency().max(1))
            .collect()
            .await;

        // Failed pages are reported, never fatal
        let mut table = ResultTable::new(category);
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(records) => table.extend(records),
                Err(e) => {
                    warn!("Skipping {}", e);
                    failures.push(e);
                }
            }
        }

        info!(
            "Collected {} {} listings ({} of {} pages failed)",
            table.len(),
            category,
            failures.len(),
            max_pages
        );

        RunReport {
            table,
            failures,
            pages_requested: max_pages,
        }
    }

    /// Scrape every supported category from its default feed
    async fn scrape_all_categories(&self, max_pages: u32) -> Result<Vec<RunReport>> {
        let mut reports = Vec::new();
        for category in self.supported_categories() {
            let query = ScrapeQuery::new(category)?;
            reports.push(self.scrape_listing(query, max_pages).await);
        }
        Ok(reports)
    }
}

/// Factory for creating scraper instances
pub struct ScraperFactory;

impl ScraperFactory {
    /// Create a new scraper instance based on the specified type
    pub fn create_scraper(scraper_type: ScraperType, config: &ScrapeConfig) -> Result<Arc<dyn Scraper>> {
        match scraper_type {
            ScraperType::DakarAuto => Ok(Arc::new(DakarAutoScraper::new(config)?)),
        }
    }
}
