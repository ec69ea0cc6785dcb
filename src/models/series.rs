use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: u32,
    pub price: f64,
}

/// Daily average price history of one item, ordered by day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSeries {
    pub name: String,
    pub icon: Option<String>,
    pub values: Vec<PricePoint>,
}

impl ItemSeries {
    pub fn new(name: String) -> Self {
        Self {
            name,
            icon: None,
            values: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_values(mut self, values: Vec<PricePoint>) -> Self {
        self.values = values;
        self
    }

    /// Exact lookup; gaps are not interpolated.
    pub fn price_on(&self, day: u32) -> Option<f64> {
        self.values
            .binary_search_by_key(&day, |point| point.day)
            .ok()
            .map(|idx| self.values[idx].price)
    }

    pub fn last_point(&self) -> Option<&PricePoint> {
        self.values.last()
    }
}
