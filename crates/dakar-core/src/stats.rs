use crate::ResultTable;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCount {
    pub brand: String,
    pub count: usize,
}

/// Headline figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub listings: usize,
    pub brands: usize,
    /// Mean over prices that parse as integers; `None` when there are none.
    pub mean_price: Option<f64>,
    pub latest_year: Option<i32>,
}

impl TableSummary {
    pub fn from_table(table: &ResultTable) -> Self {
        let brands: HashSet<&str> = table.iter().map(|r| r.brand.as_str()).collect();
        let prices: Vec<f64> = table.iter().filter_map(|r| r.price_value()).collect();
        let mean_price = if prices.is_empty() {
            None
        } else {
            Some(prices.iter().sum::<f64>() / prices.len() as f64)
        };

        Self {
            listings: table.len(),
            brands: brands.len(),
            mean_price,
            latest_year: table.iter().filter_map(|r| r.year_value()).max(),
        }
    }
}

/// Most frequent brands, highest count first; ties ordered by brand name.
pub fn top_brands(table: &ResultTable, n: usize) -> Vec<BrandCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in table {
        *counts.entry(record.brand.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<BrandCount> = counts
        .into_iter()
        .map(|(brand, count)| BrandCount {
            brand: brand.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.brand.cmp(&b.brand)));
    ranked.truncate(n);
    ranked
}

impl ResultTable {
    pub fn summary(&self) -> TableSummary {
        TableSummary::from_table(self)
    }

    pub fn top_brands(&self, n: usize) -> Vec<BrandCount> {
        top_brands(self, n)
    }
}
