use crate::{BrandCount, Category, TableSummary, VehicleRecord};
use colored::Colorize;
use tabled::settings::{object::Columns, Modify, Style, Width};
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct RecordTableRow {
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[tabled(rename = "Model")]
    pub model: String,
    #[tabled(rename = "Year")]
    pub year: String,
    #[tabled(rename = "Mileage (km)", display_with = "display_right_12")]
    pub mileage: String,
    #[tabled(rename = "Gearbox")]
    pub gearbox: String,
    #[tabled(rename = "Fuel")]
    pub fuel_type: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Owner")]
    pub owner: String,
    #[tabled(rename = "Price (FCFA)", display_with = "display_right_12")]
    pub price: String,
}

fn display_right_12(s: &str) -> String {
    format!("{:>12}", s)
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

impl From<&VehicleRecord> for RecordTableRow {
    fn from(record: &VehicleRecord) -> Self {
        Self {
            brand: record.brand.clone(),
            model: record.model.clone(),
            year: record.year.clone(),
            mileage: or_dash(&record.mileage),
            gearbox: or_dash(&record.gearbox),
            fuel_type: or_dash(&record.fuel_type),
            address: or_dash(&record.address),
            owner: or_dash(&record.owner),
            price: record.price.clone(),
        }
    }
}

pub fn create_record_table(records: &[VehicleRecord]) -> String {
    let rows: Vec<RecordTableRow> = records.iter().map(RecordTableRow::from).collect();

    let mut table = Table::new(&rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::single(1)).with(Width::truncate(24)))     // Model
        .with(Modify::new(Columns::single(6)).with(Width::wrap(30)))         // Address
        .with(Modify::new(Columns::single(7)).with(Width::truncate(24)));    // Owner

    table.to_string()
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Listings")]
    listings: usize,
    #[tabled(rename = "Brands")]
    brands: usize,
    #[tabled(rename = "Avg Price (FCFA)")]
    mean_price: String,
    #[tabled(rename = "Latest Year")]
    latest_year: String,
}

pub fn create_summary_table(category: Category, summary: &TableSummary) -> String {
    let row = SummaryRow {
        category: category.to_string(),
        listings: summary.listings,
        brands: summary.brands,
        mean_price: summary
            .mean_price
            .map(|p| format!("{:.0}", p))
            .unwrap_or_else(|| "N/A".to_string()),
        latest_year: summary
            .latest_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    };

    let mut table = Table::new([row]);
    table.with(Style::modern());
    table.to_string()
}

#[derive(Tabled)]
struct BrandRow {
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Listings", display_with = "display_right_8")]
    count: String,
}

fn display_right_8(s: &str) -> String {
    format!("{:>8}", s)
}

pub fn create_brand_table(brands: &[BrandCount]) -> String {
    let rows: Vec<BrandRow> = brands
        .iter()
        .map(|b| BrandRow {
            brand: b.brand.clone(),
            count: b.count.to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.to_string()
}

/// Shown in place of an empty table.
pub fn no_data_notice(category: Category) -> String {
    format!("No data found for {}", category).yellow().bold().to_string()
}
