use std::collections::HashSet;

use crate::models::{ItemSeries, RankedCandidate, RankingQuery, RankingResult};

/// Fractional return of buying at `buy_price` and selling at `sell_price`.
///
/// Undefined (None) for a non-positive buy price.
pub fn roi(buy_price: f64, sell_price: f64) -> Option<f64> {
    if buy_price <= 0.0 {
        return None;
    }
    let roi = (sell_price - buy_price) / buy_price;
    roi.is_finite().then_some(roi)
}

/// Ranks items of a series snapshot by buy-day/sell-day return.
///
/// Holds only a shared borrow, so any number of queries can run against the
/// same snapshot, from any thread.
#[derive(Debug, Clone, Copy)]
pub struct RoiAnalyzer<'a> {
    dataset: &'a [ItemSeries],
}

impl<'a> RoiAnalyzer<'a> {
    pub fn new(dataset: &'a [ItemSeries]) -> Self {
        Self { dataset }
    }

    pub fn candidate(&self, series: &ItemSeries, query: &RankingQuery) -> Option<RankedCandidate> {
        let buy_price = series.price_on(query.buy_day)?;
        if !query.within_budget(buy_price) {
            return None;
        }
        let sell_price = series.price_on(query.sell_day)?;
        let roi = roi(buy_price, sell_price)?;

        Some(RankedCandidate {
            name: series.name.clone(),
            icon: series.icon.clone(),
            buy_price,
            sell_price,
            roi,
            buy_day: query.buy_day,
            sell_day: query.sell_day,
        })
    }

    pub fn rank(&self, query: &RankingQuery) -> RankingResult {
        let mut candidates: Vec<RankedCandidate> = self
            .dataset
            .iter()
            .filter_map(|series| self.candidate(series, query))
            .collect();

        // Stable sort keeps dataset order among equal returns
        candidates.sort_by(|a, b| b.roi.total_cmp(&a.roi));
        candidates.truncate(query.clamped_count());

        let names: HashSet<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        let chart_series = self
            .dataset
            .iter()
            .filter(|series| names.contains(series.name.as_str()))
            .cloned()
            .collect();

        RankingResult {
            candidates,
            chart_series,
        }
    }
}

pub fn rank_candidates(dataset: &[ItemSeries], query: &RankingQuery) -> RankingResult {
    RoiAnalyzer::new(dataset).rank(query)
}
