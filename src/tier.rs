//! Rarity tiers, their draw weights and the item catalog behind each one.
//!
//! A [`TierTable`] is validated once when it is built: all four tiers defined
//! exactly once, every weight positive, weights summing to 100 and every tier
//! carrying at least one item. After that the weights never change; only the
//! item lists may be swapped through [`TierTable::replace_items`].
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");
const WEIGHT_TOTAL: f64 = 100.0;
const WEIGHT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Tier {
    /// Fixed walk order for weighted selection.
    pub const ALL: [Tier; 4] = [Tier::Common, Tier::Rare, Tier::Epic, Tier::Legendary];

    /// Tier awarded when the sampled tier has nothing to give.
    pub const FALLBACK: Tier = Tier::Common;

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Common => "common",
            Tier::Rare => "rare",
            Tier::Epic => "epic",
            Tier::Legendary => "legendary",
        }
    }

    fn index(self) -> usize {
        match self {
            Tier::Common => 0,
            Tier::Rare => 1,
            Tier::Epic => 2,
            Tier::Legendary => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    pub id: Tier,
    pub weight: f64,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub tier: Tier,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Item {
    pub fn new(name: &str, tier: Tier, description: &str) -> Self {
        Self {
            name: name.to_string(),
            tier,
            description: description.to_string(),
            image_ref: None,
        }
    }
}

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    tiers: Vec<TierDefinition>,
    items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct TierTable {
    definitions: [TierDefinition; 4],
    items: [Vec<Item>; 4],
}

impl TierTable {
    pub fn new(tiers: Vec<TierDefinition>, items: Vec<Item>) -> Result<Self, ConfigError> {
        let mut slots: [Option<TierDefinition>; 4] = Default::default();
        for def in tiers {
            if !(def.weight > 0.0 && def.weight.is_finite()) {
                return Err(ConfigError::NonPositiveWeight { tier: def.id, weight: def.weight });
            }
            let slot = &mut slots[def.id.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateTier(def.id));
            }
            *slot = Some(def);
        }

        let present = slots.each_ref().map(Option::is_some);
        let [Some(common), Some(rare), Some(epic), Some(legendary)] = slots else {
            let missing = Tier::ALL
                .into_iter()
                .find(|t| !present[t.index()])
                .unwrap_or(Tier::Common);
            return Err(ConfigError::MissingTier(missing));
        };
        let definitions = [common, rare, epic, legendary];
        let sum: f64 = definitions.iter().map(|d| d.weight).sum();
        if (sum - WEIGHT_TOTAL).abs() > WEIGHT_EPSILON {
            return Err(ConfigError::WeightSum(sum));
        }

        let mut buckets: [Vec<Item>; 4] = Default::default();
        for item in items {
            buckets[item.tier.index()].push(item);
        }
        if let Some(tier) = Tier::ALL.into_iter().find(|t| buckets[t.index()].is_empty()) {
            return Err(ConfigError::EmptyTier(tier));
        }

        Ok(Self { definitions, items: buckets })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            what: "catalog".into(),
            source,
        })?;
        Self::new(file.tiers, file.items)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Catalog shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn weight_of(&self, tier: Tier) -> f64 {
        self.definitions[tier.index()].weight
    }

    pub fn definition(&self, tier: Tier) -> &TierDefinition {
        &self.definitions[tier.index()]
    }

    /// Items for `tier`. Non-empty after validation unless a hot reload emptied it.
    pub fn items_of(&self, tier: Tier) -> &[Item] {
        &self.items[tier.index()]
    }

    /// Swap the item list of one tier at runtime. Items are re-tagged with `tier`.
    /// The fallback tier may never be emptied.
    pub fn replace_items(&mut self, tier: Tier, mut items: Vec<Item>) -> Result<(), ConfigError> {
        if tier == Tier::FALLBACK && items.is_empty() {
            return Err(ConfigError::EmptyFallbackTier(tier));
        }
        for item in &mut items {
            item.tier = tier;
        }
        self.items[tier.index()] = items;
        Ok(())
    }
}
