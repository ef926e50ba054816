use crate::ResultTable;
use rasciigraph::{plot, Config};
use serde::{Deserialize, Serialize};

/// Histogram of numeric listing prices over equal-width bins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceDistribution {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl PriceDistribution {
    pub fn new(prices: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let mut counts = vec![0; bins];
        if prices.is_empty() {
            return Self { min: 0.0, max: 0.0, counts };
        }

        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        for price in prices {
            let idx = if span == 0.0 {
                0
            } else {
                (((price - min) / span) * bins as f64) as usize
            };
            counts[idx.min(bins - 1)] += 1;
        }

        Self { min, max, counts }
    }

    pub fn from_table(table: &ResultTable, bins: usize) -> Self {
        let prices: Vec<f64> = table.iter().filter_map(|r| r.price_value()).collect();
        Self::new(&prices, bins)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn to_ascii_graph(&self, width: usize, height: usize) -> String {
        if self.total() == 0 {
            return "No prices".to_string();
        }

        let series: Vec<f64> = self.counts.iter().map(|c| *c as f64).collect();
        let config = Config::default()
            .with_width(width as u32)
            .with_height(height as u32);
        let graph = plot(series, config);

        format!(
            "{}\n{:>width$}",
            graph,
            format!("{:.0} .. {:.0} FCFA", self.min, self.max),
            width = width
        )
    }
}
