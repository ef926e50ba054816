use crate::fixtures::{listing_card, listing_page, Listing};
use dakar_core::{Category, ResultTable};
use dakar_scrapers::ListingExtractor;
use std::fs;
use tempfile::tempdir;

fn scraped_table() -> ResultTable {
    let cards = vec![
        listing_card(&Listing {
            title: "Toyota Corolla 2015",
            attributes: &["Ref 1", "45000 km", "Automatique", "Essence"],
            owner: "Par Moussa Diop",
            price: Some("12 500 000 FCFA"),
        }),
        listing_card(&Listing {
            title: "Peugeot 308 \"GT Line\" 2019",
            attributes: &["Ref 2", "30000 km", "Automatique", "Diesel"],
            owner: "Par Garage Ndiaye, Pikine",
            price: Some("9 800 000 FCFA"),
        }),
        listing_card(&Listing {
            title: "Kia Picanto 2017",
            attributes: &["Ref 3", "60000 km", "Manuelle", "Essence"],
            owner: "Par Fatou Sow",
            price: None,
        }),
    ];

    let extractor = ListingExtractor::new(Category::Cars).unwrap();
    ResultTable::from_records(Category::Cars, extractor.extract(&listing_page(&cards)))
}

#[test]
fn test_csv_file_round_trip() {
    let temp_dir = tempdir().unwrap();
    let export_path = temp_dir.path().join("cars.csv");

    let table = scraped_table();
    assert_eq!(table.len(), 2);
    table.to_csv_path(&export_path).unwrap();

    let content = fs::read_to_string(&export_path).unwrap();
    assert!(content.starts_with("brand,model,year,mileage,gearbox,fuel_type,address,owner,price\n"));
    assert!(content.contains("\"Garage Ndiaye, Pikine\""));

    let parsed = ResultTable::from_csv_path(Category::Cars, &export_path).unwrap();
    assert_eq!(parsed.len(), table.len());
    assert_eq!(parsed, table);
}

#[test]
fn test_stats_from_exported_csv() {
    let temp_dir = tempdir().unwrap();
    let export_path = temp_dir.path().join("cars.csv");
    scraped_table().to_csv_path(&export_path).unwrap();

    let table = ResultTable::from_csv_path(Category::Cars, &export_path).unwrap();
    let summary = table.summary();
    assert_eq!(summary.listings, 2);
    assert_eq!(summary.brands, 2);
    assert_eq!(summary.mean_price, Some(11_150_000.0));
    assert_eq!(summary.latest_year, Some(2019));
}

#[test]
fn test_export_empty_table() {
    let temp_dir = tempdir().unwrap();
    let export_path = temp_dir.path().join("empty.csv");

    ResultTable::new(Category::Rentals).to_csv_path(&export_path).unwrap();
    let parsed = ResultTable::from_csv_path(Category::Rentals, &export_path).unwrap();
    assert!(parsed.is_empty());
}
