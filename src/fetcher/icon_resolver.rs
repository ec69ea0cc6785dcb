use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{info, warn};

use crate::data::normalize_name;
use crate::errors::Result;
use crate::models::OverviewType;

/// A remote source of item icons, queried once per overview type.
#[async_trait]
pub trait IconLookup: Send + Sync {
    async fn lookup(&self, item_type: OverviewType) -> Result<HashMap<String, String>>;
}

const MANUAL_ICONS: [(&str, &str); 24] = [
    ("Gift to the Goddess", "https://web.poecdn.com/image/Art/2DItems/Maps/LabyrinthHarvestInfused1.png"),
    ("Splinter of Chayula", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachShardChaos.png"),
    ("Splinter of Tul", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachShardCold.png"),
    ("Splinter of Xoph", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachShardFire.png"),
    ("Splinter of Uul-Netol", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachShardPhysical.png"),
    ("Splinter of Esh", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachShardLightning.png"),
    ("Blessing of Chayula", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachUpgradeChaos.png"),
    ("Blessing of Tul", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachUpgradeCold.png"),
    ("Blessing of Xoph", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachUpgradeFire.png"),
    ("Blessing of Uul-Netol", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachUpgradePhysical.png"),
    ("Blessing of Esh", "https://web.poecdn.com/image/Art/2DItems/Currency/Breach/BreachUpgradeLightning.png"),
    ("Rogue's Marker", "https://web.poecdn.com/image/Art/2DItems/Currency/Heist/HeistCoinCurrency.png"),
    ("Otherworldly Scouting Report", "https://web.poecdn.com/image/Art/2DItems/Currency/ScoutingReport.png"),
    ("Delirious Scouting Report", "https://web.poecdn.com/image/Art/2DItems/Currency/ScoutingReport.png"),
    ("Blighted Scouting Report", "https://web.poecdn.com/image/Art/2DItems/Currency/ScoutingReport.png"),
    ("Operative's Scouting Report", "https://web.poecdn.com/image/Art/2DItems/Currency/ScoutingReport.png"),
    ("Comprehensive Scouting Report", "https://web.poecdn.com/image/Art/2DItems/Currency/ScoutingReport.png"),
    ("Timeless Templar Splinter", "https://web.poecdn.com/image/Art/2DItems/Maps/TemplarShard.png"),
    ("Timeless Eternal Empire Splinter", "https://web.poecdn.com/image/Art/2DItems/Maps/EternalEmpireShard.png"),
    ("Timeless Karui Splinter", "https://web.poecdn.com/image/Art/2DItems/Maps/KaruiShard.png"),
    ("Timeless Maraketh Splinter", "https://web.poecdn.com/image/Art/2DItems/Maps/MarakethShard.png"),
    ("Annulment Shard", "https://web.poecdn.com/image/Art/2DItems/Currency/AnnullShard.png"),
    ("Exalted Shard", "https://web.poecdn.com/image/Art/2DItems/Currency/ExaltedShard.png"),
    ("Hunter's Exalted Orb", "https://web.poecdn.com/image/Art/2DItems/Currency/Influence%20Exalts/BasiliskOrb.png"),
];

/// Icons that the overview listings do not carry, keyed by normalized name.
pub fn manual_icon_table() -> HashMap<String, String> {
    MANUAL_ICONS
        .iter()
        .map(|(name, url)| (normalize_name(name), url.to_string()))
        .collect()
}

/// Icon tables stacked by priority: a later layer hides an earlier one for
/// any key it contains.
#[derive(Debug, Clone, Default)]
pub struct IconOverlay {
    layers: Vec<HashMap<String, String>>,
}

impl IconOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: HashMap<String, String>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(key))
            .map(String::as_str)
    }

    pub fn resolve<'a, I>(&self, keys: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        keys.into_iter()
            .filter_map(|key| self.get(key).map(|url| (key.clone(), url.to_string())))
            .collect()
    }
}

pub struct IconResolver {
    manual: HashMap<String, String>,
    lookup: Option<Box<dyn IconLookup>>,
    item_types: Vec<OverviewType>,
    concurrency: usize,
    timeout: Duration,
}

impl IconResolver {
    pub fn new(manual: HashMap<String, String>) -> Self {
        Self {
            manual,
            lookup: None,
            item_types: OverviewType::ALL.to_vec(),
            concurrency: 4,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_lookup(mut self, lookup: Box<dyn IconLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_item_types(mut self, item_types: Vec<OverviewType>) -> Self {
        self.item_types = item_types;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Query every overview type, a bounded number at a time.
    ///
    /// A failed or timed-out type contributes nothing. Results are merged in
    /// type order, so a later type overrides an earlier one on the same key.
    pub async fn fetch_remote(&self) -> HashMap<String, String> {
        let lookup = match self.lookup.as_deref() {
            Some(lookup) => lookup,
            None => return HashMap::new(),
        };
        let timeout = self.timeout;

        let results: Vec<HashMap<String, String>> = stream::iter(self.item_types.iter().copied())
            .map(|item_type| async move {
                match tokio::time::timeout(timeout, lookup.lookup(item_type)).await {
                    Ok(Ok(icons)) => icons,
                    Ok(Err(e)) => {
                        warn!(item_type = %item_type, error = %e, "icon lookup failed");
                        HashMap::new()
                    }
                    Err(_) => {
                        warn!(item_type = %item_type, ?timeout, "icon lookup timed out");
                        HashMap::new()
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut merged = HashMap::new();
        for icons in results {
            merged.extend(icons);
        }
        info!(count = merged.len(), "collected icons from lookup service");
        merged
    }

    /// Icons for the requested keys; keys with no icon are absent.
    pub async fn resolve_icons(&self, keys: &HashSet<String>) -> HashMap<String, String> {
        let remote = self.fetch_remote().await;
        let overlay = IconOverlay::new()
            .with_layer(self.manual.clone())
            .with_layer(remote);
        overlay.resolve(keys)
    }
}
