use serde::{Deserialize, Serialize};
use std::fmt;

/// Item groups exposed by the poe.ninja overview endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverviewType {
    Currency,
    Fragment,
    Scarab,
    Fossil,
    Resonator,
    Essence,
    DivinationCard,
    Prophecy,
    Oil,
    Incubator,
    UniqueWeapon,
    UniqueArmour,
    UniqueAccessory,
    UniqueFlask,
    UniqueJewel,
    SkillGem,
    ClusterJewel,
    Map,
    BlightedMap,
    BlightRavagedMap,
    Invitation,
    Memory,
    Beast,
    Artifact,
    DeliriumOrb,
    Vial,
}

/// Shape of the listing returned for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewKind {
    Currency,
    Item,
}

impl OverviewType {
    pub const ALL: [OverviewType; 26] = [
        OverviewType::Currency,
        OverviewType::Fragment,
        OverviewType::Scarab,
        OverviewType::Fossil,
        OverviewType::Resonator,
        OverviewType::Essence,
        OverviewType::DivinationCard,
        OverviewType::Prophecy,
        OverviewType::Oil,
        OverviewType::Incubator,
        OverviewType::UniqueWeapon,
        OverviewType::UniqueArmour,
        OverviewType::UniqueAccessory,
        OverviewType::UniqueFlask,
        OverviewType::UniqueJewel,
        OverviewType::SkillGem,
        OverviewType::ClusterJewel,
        OverviewType::Map,
        OverviewType::BlightedMap,
        OverviewType::BlightRavagedMap,
        OverviewType::Invitation,
        OverviewType::Memory,
        OverviewType::Beast,
        OverviewType::Artifact,
        OverviewType::DeliriumOrb,
        OverviewType::Vial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverviewType::Currency => "Currency",
            OverviewType::Fragment => "Fragment",
            OverviewType::Scarab => "Scarab",
            OverviewType::Fossil => "Fossil",
            OverviewType::Resonator => "Resonator",
            OverviewType::Essence => "Essence",
            OverviewType::DivinationCard => "DivinationCard",
            OverviewType::Prophecy => "Prophecy",
            OverviewType::Oil => "Oil",
            OverviewType::Incubator => "Incubator",
            OverviewType::UniqueWeapon => "UniqueWeapon",
            OverviewType::UniqueArmour => "UniqueArmour",
            OverviewType::UniqueAccessory => "UniqueAccessory",
            OverviewType::UniqueFlask => "UniqueFlask",
            OverviewType::UniqueJewel => "UniqueJewel",
            OverviewType::SkillGem => "SkillGem",
            OverviewType::ClusterJewel => "ClusterJewel",
            OverviewType::Map => "Map",
            OverviewType::BlightedMap => "BlightedMap",
            OverviewType::BlightRavagedMap => "BlightRavagedMap",
            OverviewType::Invitation => "Invitation",
            OverviewType::Memory => "Memory",
            OverviewType::Beast => "Beast",
            OverviewType::Artifact => "Artifact",
            OverviewType::DeliriumOrb => "DeliriumOrb",
            OverviewType::Vial => "Vial",
        }
    }
}

impl fmt::Display for OverviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OverviewKind {
    /// Endpoints are tried in this order; the first one yielding icons wins.
    pub const LOOKUP_ORDER: [OverviewKind; 2] = [OverviewKind::Currency, OverviewKind::Item];

    pub fn endpoint(&self) -> &'static str {
        match self {
            OverviewKind::Currency => "currencyoverview",
            OverviewKind::Item => "itemoverview",
        }
    }
}
