use serde::{Deserialize, Serialize};
use super::series::ItemSeries;

pub const MIN_RESULT_COUNT: usize = 1;
pub const MAX_RESULT_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub buy_day: u32,
    pub sell_day: u32,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub count: usize,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            buy_day: 3,
            sell_day: 14,
            min_price: None,
            max_price: None,
            count: MAX_RESULT_COUNT,
        }
    }
}

impl RankingQuery {
    pub fn new(buy_day: u32, sell_day: u32) -> Self {
        Self {
            buy_day,
            sell_day,
            ..Self::default()
        }
    }

    pub fn with_budget(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Inclusive on both ends; an omitted bound never excludes.
    pub fn within_budget(&self, price: f64) -> bool {
        if let Some(min) = self.min_price {
            if price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if price > max {
                return false;
            }
        }
        true
    }

    pub fn clamped_count(&self) -> usize {
        self.count.clamp(MIN_RESULT_COUNT, MAX_RESULT_COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub name: String,
    pub icon: Option<String>,
    pub buy_price: f64,
    pub sell_price: f64,
    pub roi: f64,
    pub buy_day: u32,
    pub sell_day: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingResult {
    pub candidates: Vec<RankedCandidate>,
    /// Series of the ranked items, in dataset order.
    pub chart_series: Vec<ItemSeries>,
}

impl RankingResult {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
