use serde::{Deserialize, Serialize};
use std::str::FromStr;

mod display;
mod error;
mod graph;
mod stats;
mod table;
pub mod db;

pub use db::{Database, StoredRecord};
pub use display::{create_brand_table, create_record_table, create_summary_table, no_data_notice, RecordTableRow};
pub use error::{DakarError, Result};
pub use graph::PriceDistribution;
pub use stats::{BrandCount, TableSummary};
pub use table::ResultTable;

/// Vehicle feeds published by dakar-auto.com
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cars,
    Motorcycles,
    Rentals,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Cars, Category::Motorcycles, Category::Rentals];

    /// Name of the table holding this category's persisted rows
    pub fn table_name(&self) -> &'static str {
        match self {
            Category::Cars => "cars",
            Category::Motorcycles => "motorcycles",
            Category::Rentals => "rentals",
        }
    }

    pub fn default_feed_url(&self) -> &'static str {
        match self {
            Category::Cars => "https://dakar-auto.com/senegal/voitures-4",
            Category::Motorcycles => "https://dakar-auto.com/senegal/motos-and-scooters-3",
            Category::Rentals => "https://dakar-auto.com/senegal/location-de-voitures-19",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Cars => write!(f, "Cars"),
            Category::Motorcycles => write!(f, "Motorcycles"),
            Category::Rentals => write!(f, "Rentals"),
        }
    }
}

impl FromStr for Category {
    type Err = DakarError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cars" | "car" | "voitures" => Ok(Category::Cars),
            "motorcycles" | "motorcycle" | "motos" | "scooters" => Ok(Category::Motorcycles),
            "rentals" | "rental" | "location" => Ok(Category::Rentals),
            _ => Err(DakarError::InvalidCategory(format!(
                "{}. Valid options are: cars/voitures, motorcycles/motos/scooters, rentals/location",
                s
            ))),
        }
    }
}

/// Column names of a [`VehicleRecord`], in export order.
pub const RECORD_FIELDS: [&str; 9] = [
    "brand",
    "model",
    "year",
    "mileage",
    "gearbox",
    "fuel_type",
    "address",
    "owner",
    "price",
];

/// One normalized listing.
///
/// Values are kept as the text observed in the page markup. Fields a category
/// does not publish are `None`; fields it does publish are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub mileage: Option<String>,
    pub gearbox: Option<String>,
    pub fuel_type: Option<String>,
    pub address: Option<String>,
    pub owner: Option<String>,
    pub price: String,
}

impl VehicleRecord {
    /// Numeric price in FCFA, if the price text is a plain integer.
    pub fn price_value(&self) -> Option<f64> {
        self.price.parse::<u64>().ok().map(|p| p as f64)
    }

    pub fn year_value(&self) -> Option<i32> {
        self.year.parse::<i32>().ok()
    }
}
