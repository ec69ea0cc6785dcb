use std::collections::{BTreeMap, HashMap};

use crate::models::{ItemSeries, PriceObservation, PricePoint};

/// Points after this day are cut from every series.
pub const MAX_DAY: u32 = 60;

/// A finished series together with the key it was grouped under.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedSeries {
    pub key: String,
    pub series: ItemSeries,
}

// Neumaier-compensated running sum.
#[derive(Debug, Default, Clone, Copy)]
struct DailyMean {
    sum: f64,
    compensation: f64,
    count: u32,
}

impl DailyMean {
    fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        (self.sum + self.compensation) / self.count as f64
    }
}

#[derive(Debug)]
struct SeriesAccumulator {
    display_name: String,
    days: BTreeMap<u32, DailyMean>,
}

/// Groups observations by (item key, day) and averages each group.
///
/// Series come out in the order their keys were first seen, and keep the
/// first display name seen for the key.
#[derive(Debug, Default)]
pub struct DailyAggregator {
    index: HashMap<String, usize>,
    entries: Vec<(String, SeriesAccumulator)>,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observation: &PriceObservation) {
        let slot = match self.index.get(&observation.key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(observation.key.clone(), slot);
                self.entries.push((
                    observation.key.clone(),
                    SeriesAccumulator {
                        display_name: observation.display_name.clone(),
                        days: BTreeMap::new(),
                    },
                ));
                slot
            }
        };

        self.entries[slot]
            .1
            .days
            .entry(observation.day)
            .or_default()
            .add(observation.price);
    }

    pub fn extend<'a, I>(&mut self, observations: I)
    where
        I: IntoIterator<Item = &'a PriceObservation>,
    {
        for observation in observations {
            self.add(observation);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Vec<KeyedSeries> {
        self.entries
            .into_iter()
            .map(|(key, acc)| {
                let values = acc
                    .days
                    .iter()
                    .filter(|(day, _)| **day <= MAX_DAY)
                    .map(|(day, mean)| PricePoint {
                        day: *day,
                        price: mean.mean(),
                    })
                    .collect();

                KeyedSeries {
                    key,
                    series: ItemSeries::new(acc.display_name).with_values(values),
                }
            })
            .collect()
    }
}

pub fn aggregate<'a, I>(observations: I) -> Vec<KeyedSeries>
where
    I: IntoIterator<Item = &'a PriceObservation>,
{
    let mut aggregator = DailyAggregator::new();
    aggregator.extend(observations);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(name: &str, day: u32, price: f64) -> PriceObservation {
        PriceObservation {
            key: crate::data::normalize_name(name),
            day,
            price,
            display_name: name.trim().to_string(),
        }
    }

    #[test]
    fn test_daily_mean_per_item() {
        let observations = vec![
            obs("Divine Orb", 1, 150.0),
            obs("Divine Orb", 1, 170.0),
            obs("Divine Orb", 3, 200.0),
            obs("Exalted Orb", 1, 20.0),
        ];
        let series = aggregate(&observations);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].key, "divineorb");
        assert_eq!(
            series[0].series.values,
            vec![
                PricePoint { day: 1, price: 160.0 },
                PricePoint { day: 3, price: 200.0 },
            ]
        );
        assert_eq!(series[1].series.name, "Exalted Orb");
        assert_eq!(series[1].series.icon, None);
    }

    #[test]
    fn test_points_sorted_unique_and_capped() {
        let observations = vec![
            obs("Mirror of Kalandra", 61, 90000.0),
            obs("Mirror of Kalandra", 14, 70000.0),
            obs("Mirror of Kalandra", 60, 80000.0),
            obs("Mirror of Kalandra", 2, 60000.0),
            obs("Mirror of Kalandra", 14, 72000.0),
        ];
        let series = aggregate(&observations);
        let days: Vec<u32> = series[0].series.values.iter().map(|p| p.day).collect();

        assert_eq!(days, vec![2, 14, 60]);
        assert_eq!(series[0].series.price_on(14), Some(71000.0));
    }

    #[test]
    fn test_series_beyond_cap_is_kept_empty() {
        let series = aggregate(&[obs("Late Item", 75, 3.0)]);
        assert_eq!(series.len(), 1);
        assert!(series[0].series.values.is_empty());
    }

    #[test]
    fn test_first_display_name_wins_on_collision() {
        let observations = vec![
            obs("Blessing of Esh", 1, 10.0),
            obs("Blessing-of-Esh's", 1, 30.0),
        ];
        let series = aggregate(&observations);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].series.name, "Blessing of Esh");
        assert_eq!(series[0].series.price_on(1), Some(20.0));
    }

    #[test]
    fn test_order_independent_means() {
        let forward = vec![
            obs("Divine Orb", 1, 10.0),
            obs("Divine Orb", 1, 20.0),
            obs("Divine Orb", 2, 5.0),
            obs("Chaos Shard", 2, 0.5),
            obs("Divine Orb", 1, 33.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let mut a: Vec<ItemSeries> = aggregate(&forward).into_iter().map(|k| k.series).collect();
        let mut b: Vec<ItemSeries> = aggregate(&reversed).into_iter().map(|k| k.series).collect();
        a.sort_by(|x, y| x.name.cmp(&y.name));
        b.sort_by(|x, y| x.name.cmp(&y.name));

        assert_eq!(a, b);
    }

    #[test]
    fn test_compensated_sum_on_large_group() {
        let mut mean = DailyMean::default();
        mean.add(1e16);
        for _ in 0..10 {
            mean.add(1.0);
        }
        mean.add(-1e16);
        assert_eq!(mean.sum + mean.compensation, 10.0);
        assert_eq!(mean.count, 12);
    }
}
