use async_trait::async_trait;
use dakar_core::{Category, DakarError};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Raw markup of one feed page. Lives only until it has been extracted.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub category: Category,
    pub page: u32,
    pub url: Url,
    pub markup: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
}

/// A page that could not be retrieved. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page {page} ({url}): {failure}")]
pub struct PageFetchError {
    pub page: u32,
    pub url: String,
    pub failure: FetchFailure,
}

/// Address of page `page` of a feed: the feed URL with `page={page}` set.
pub fn page_url(feed_url: &Url, page: u32) -> Url {
    // Keep every query pair except an existing page
    let kept: Vec<(String, String)> = feed_url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = feed_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page.to_string());
    url
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, category: Category, feed_url: &Url, page: u32) -> Result<ListingPage, PageFetchError>;
}

/// Plain GET over reqwest. Timeouts and non-2xx statuses are page failures.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> dakar_core::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DakarError::Http)?;
        Ok(Self { client })
    }

    fn failure(err: reqwest::Error) -> FetchFailure {
        if err.is_timeout() {
            FetchFailure::Timeout
        } else {
            FetchFailure::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, category: Category, feed_url: &Url, page: u32) -> Result<ListingPage, PageFetchError> {
        let url = page_url(feed_url, page);
        let page_error = |failure| PageFetchError {
            page,
            url: url.to_string(),
            failure,
        };

        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| page_error(Self::failure(e)))?;

        // Check if the request was successful
        let status = response.status();
        if !status.is_success() {
            return Err(page_error(FetchFailure::Status(status.as_u16())));
        }

        let markup = response
            .text()
            .await
            .map_err(|e| page_error(Self::failure(e)))?;

        Ok(ListingPage {
            category,
            page,
            url,
            markup,
        })
    }
}
