use crate::fixtures::{car_page, StubFetcher};
use dakar_core::Category;
use dakar_scrapers::{DakarAutoScraper, FetchFailure, ScrapeQuery, Scraper};
use std::collections::HashMap;
use std::sync::Arc;

fn five_pages() -> HashMap<u32, String> {
    (1..=5).map(|page| (page, car_page(page, 3))).collect()
}

fn prices(report: &dakar_scrapers::RunReport) -> Vec<String> {
    report.table.iter().map(|r| r.price.clone()).collect()
}

#[tokio::test]
async fn test_run_collects_pages_in_order() {
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(StubFetcher::new(five_pages())), 1).unwrap();
    let report = scraper
        .scrape_listing(ScrapeQuery::new(Category::Cars).unwrap(), 5)
        .await;

    assert!(report.failures.is_empty());
    assert_eq!(report.pages_succeeded(), 5);
    assert_eq!(report.table.category, Category::Cars);
    assert_eq!(report.table.len(), 15);
    assert_eq!(&prices(&report)[..4], &["1000", "1001", "1002", "2000"]);
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let fetcher = StubFetcher::new(five_pages()).failing(&[2]);
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(fetcher), 1).unwrap();
    let report = scraper
        .scrape_listing(ScrapeQuery::new(Category::Cars).unwrap(), 5)
        .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].page, 2);
    assert_eq!(report.failures[0].failure, FetchFailure::Status(503));
    assert!(report.failures[0].url.ends_with("page=2"));

    let expected: Vec<String> = [1, 3, 4, 5]
        .iter()
        .flat_map(|page| (0..3).map(move |i| format!("{}00{}", page, i)))
        .collect();
    assert_eq!(prices(&report), expected);
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential_order() {
    let sequential = DakarAutoScraper::with_fetcher(Arc::new(StubFetcher::new(five_pages())), 1).unwrap();
    let concurrent = DakarAutoScraper::with_fetcher(
        Arc::new(StubFetcher::new(five_pages()).slow_first_pages().failing(&[4])),
        4,
    )
    .unwrap();

    let query = ScrapeQuery::new(Category::Cars).unwrap();
    let expected = sequential.scrape_listing(query.clone(), 5).await;
    let report = concurrent.scrape_listing(query, 5).await;

    let expected_prices: Vec<String> = prices(&expected)
        .into_iter()
        .filter(|p| !p.starts_with('4'))
        .collect();
    assert_eq!(prices(&report), expected_prices);
    assert_eq!(report.failures.len(), 1);
}

#[tokio::test]
async fn test_all_pages_failing_yields_empty_report() {
    let fetcher = StubFetcher::new(HashMap::new()).failing(&[1, 2, 3]);
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(fetcher), 2).unwrap();
    let report = scraper
        .scrape_listing(ScrapeQuery::new(Category::Rentals).unwrap(), 3)
        .await;

    assert!(report.is_empty());
    assert_eq!(report.failures.len(), 3);
    assert_eq!(report.pages_succeeded(), 0);
}

#[tokio::test]
async fn test_pages_without_listings_are_not_failures() {
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(StubFetcher::new(HashMap::new())), 1).unwrap();
    let report = scraper
        .scrape_listing(ScrapeQuery::new(Category::Motorcycles).unwrap(), 2)
        .await;

    assert!(report.is_empty());
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_run_starts_at_query_page() {
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(StubFetcher::new(five_pages())), 1).unwrap();
    let mut query = ScrapeQuery::new(Category::Cars).unwrap();
    query.next_page();
    query.next_page();

    let report = scraper.scrape_listing(query, 2).await;
    let first_digits: Vec<char> = prices(&report).iter().filter_map(|p| p.chars().next()).collect();
    assert_eq!(first_digits, vec!['3', '3', '3', '4', '4', '4']);
}

#[tokio::test]
async fn test_scrape_all_categories() {
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(StubFetcher::new(five_pages())), 1).unwrap();
    let reports = scraper.scrape_all_categories(1).await.unwrap();

    let categories: Vec<Category> = reports.iter().map(|r| r.table.category).collect();
    assert_eq!(categories, Category::ALL.to_vec());
    // Car cards carry everything the other feeds need as well.
    assert!(reports.iter().all(|r| r.table.len() == 3));

    for report in &reports {
        let record = &report.table.records()[0];
        let expected = match report.table.category {
            Category::Cars => (true, true),
            Category::Motorcycles => (true, false),
            Category::Rentals => (false, false),
        };
        assert_eq!((record.mileage.is_some(), record.gearbox.is_some()), expected);
        assert_eq!(record.gearbox.is_some(), record.fuel_type.is_some());
        assert!(record.owner.is_some());
    }
}
