use crate::fixtures::{car_page, StubFetcher};
use chrono::{TimeZone, Utc};
use dakar_core::{Category, Database};
use dakar_scrapers::{DakarAutoScraper, ScrapeQuery, Scraper};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn test_runs_are_appended() {
    let temp_dir = tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("runs.db")).await.unwrap();

    let pages: HashMap<u32, String> = (1..=2).map(|page| (page, car_page(page, 2))).collect();
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(StubFetcher::new(pages)), 1).unwrap();

    let first = scraper.scrape_listing(ScrapeQuery::new(Category::Cars).unwrap(), 2).await;
    let first_run = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    db.save_table_at(&first.table, first_run).await.unwrap();
    assert_eq!(db.count_records(Category::Cars).await.unwrap(), 4);

    let second = scraper.scrape_listing(ScrapeQuery::new(Category::Cars).unwrap(), 2).await;
    let second_run = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
    db.save_table_at(&second.table, second_run).await.unwrap();
    assert_eq!(db.count_records(Category::Cars).await.unwrap(), 8);

    let stored = db.list_records(Category::Cars, None, None, None).await.unwrap();
    assert_eq!(stored.iter().filter(|r| r.scraped_at == first_run).count(), 4);
    assert_eq!(stored.iter().filter(|r| r.scraped_at == second_run).count(), 4);

    let ids: Vec<i64> = stored.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![8, 7, 6, 5, 4, 3, 2, 1]);
}

#[tokio::test]
async fn test_load_table_after_dedup() {
    let temp_dir = tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("dedup.db")).await.unwrap();

    // Page 2 repeats page 1 verbatim.
    let pages: HashMap<u32, String> = (1..=2).map(|page| (page, car_page(1, 3))).collect();
    let scraper = DakarAutoScraper::with_fetcher(Arc::new(StubFetcher::new(pages)), 1).unwrap();
    let mut report = scraper.scrape_listing(ScrapeQuery::new(Category::Cars).unwrap(), 2).await;
    assert_eq!(report.table.len(), 6);

    assert_eq!(report.table.dedup(), 3);
    db.save_table(&report.table).await.unwrap();

    let loaded = db.load_table(Category::Cars).await.unwrap();
    assert_eq!(loaded, report.table);
}
