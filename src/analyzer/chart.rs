use serde::Serialize;

use crate::models::ItemSeries;

pub const MIN_CHART_DAY: u32 = 1;
pub const MAX_CHART_DAY: u32 = 30;

/// Day range shown on the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartWindow {
    pub start: u32,
    pub end: u32,
}

impl Default for ChartWindow {
    fn default() -> Self {
        Self {
            start: MIN_CHART_DAY,
            end: MAX_CHART_DAY,
        }
    }
}

impl ChartWindow {
    pub fn new(start: u32, end: u32) -> Self {
        let start = start.clamp(MIN_CHART_DAY, MAX_CHART_DAY);
        let end = end.clamp(MIN_CHART_DAY, MAX_CHART_DAY);
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn contains(&self, day: u32) -> bool {
        (self.start..=self.end).contains(&day)
    }

    /// Every series, restricted to the window. Emptied series stay in place so
    /// the series-to-color assignment does not shift.
    pub fn window_series(&self, series: &[ItemSeries]) -> Vec<ItemSeries> {
        series
            .iter()
            .map(|s| {
                let values = s.values.iter().copied().filter(|p| self.contains(p.day)).collect();
                s.clone().with_values(values)
            })
            .collect()
    }
}
