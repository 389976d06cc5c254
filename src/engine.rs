//! Single-draw selection: pity check, weighted tier pick, uniform item pick.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::pity::PityCounter;
use crate::rng::RandomSource;
use crate::tier::{Item, Tier, TierTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawId(pub u64);

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draw-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawResult {
    pub id: DrawId,
    pub item: Item,
    /// Tier awarded, which is the fallback tier when `fallback` is set.
    pub tier: Tier,
    pub pity_triggered: bool,
    /// The sampled tier had no items and the fallback tier was used instead.
    pub fallback: bool,
}

/// Walk tiers in [`Tier::ALL`] order and return the first whose cumulative
/// weight reaches `r` (`r` in `[0, 100)`).
pub fn pick_tier(table: &TierTable, r: f64) -> Tier {
    let mut cumulative = 0.0;
    for tier in Tier::ALL {
        cumulative += table.weight_of(tier);
        if cumulative >= r {
            return tier;
        }
    }
    // Float rounding can leave the total a hair under r.
    Tier::Legendary
}

pub struct DrawEngine<R> {
    table: TierTable,
    rng: R,
    next_id: u64,
    draws: u64,
}

impl<R: RandomSource> DrawEngine<R> {
    pub fn new(table: TierTable, rng: R) -> Self {
        Self { table, rng, next_id: 1, draws: 0 }
    }

    pub fn table(&self) -> &TierTable {
        &self.table
    }

    pub fn replace_items(&mut self, tier: Tier, items: Vec<Item>) -> Result<(), ConfigError> {
        self.table.replace_items(tier, items)
    }

    /// Number of draws performed by this engine.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    pub fn draw(&mut self, pity: &mut PityCounter) -> DrawResult {
        self.draws += 1;

        let pity_triggered = pity.should_force_legendary();
        let sampled = if pity_triggered {
            log::info!(
                "pity guarantee fired after {} draws without legendary",
                pity.consecutive_draws()
            );
            Tier::Legendary
        } else {
            let r = self.rng.next_unit() * 100.0;
            let tier = pick_tier(&self.table, r);
            log::debug!("sampled r={r:.4} -> {tier}");
            tier
        };

        let (awarded, fallback) = if self.table.items_of(sampled).is_empty() {
            log::warn!(
                "tier '{sampled}' has no items, awarding '{}' instead",
                Tier::FALLBACK
            );
            (Tier::FALLBACK, true)
        } else {
            (sampled, false)
        };

        // The fallback tier is never empty: TierTable rejects that at load and on reload.
        let items = self.table.items_of(awarded);
        let idx = ((self.rng.next_unit() * items.len() as f64) as usize).min(items.len() - 1);
        let item = items[idx].clone();

        pity.observe(awarded);
        log::debug!(
            "awarded {} ({awarded}), pity now {}",
            item.name,
            pity.consecutive_draws()
        );

        let id = DrawId(self.next_id);
        self.next_id += 1;
        DrawResult { id, item, tier: awarded, pity_triggered, fallback }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    #[test]
    fn cumulative_walk_boundaries() {
        // 70 / 20 / 8 / 2
        let table = TierTable::builtin().unwrap();
        assert_eq!(pick_tier(&table, 0.0), Tier::Common);
        assert_eq!(pick_tier(&table, 70.0), Tier::Common);
        assert_eq!(pick_tier(&table, 70.01), Tier::Rare);
        assert_eq!(pick_tier(&table, 90.0), Tier::Rare);
        assert_eq!(pick_tier(&table, 97.5), Tier::Epic);
        assert_eq!(pick_tier(&table, 99.99), Tier::Legendary);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut engine = DrawEngine::new(TierTable::builtin().unwrap(), ScriptedSource::constant(0.5));
        let mut pity = PityCounter::default();
        let a = engine.draw(&mut pity);
        let b = engine.draw(&mut pity);
        assert!(b.id > a.id);
        assert_eq!(engine.draw_count(), 2);
    }

    #[test]
    fn pity_draw_skips_tier_sampling() {
        let mut engine = DrawEngine::new(TierTable::builtin().unwrap(), ScriptedSource::constant(0.0));
        let mut pity = PityCounter::with_count(90, 89).unwrap();
        let result = engine.draw(&mut pity);
        assert!(result.pity_triggered);
        assert_eq!(result.tier, Tier::Legendary);
        assert_eq!(result.item.tier, Tier::Legendary);
        assert_eq!(pity.consecutive_draws(), 0);
    }

    #[test]
    fn last_item_reachable() {
        let table = TierTable::builtin().unwrap();
        let commons = table.items_of(Tier::Common).len();
        let mut engine = DrawEngine::new(table, ScriptedSource::new(vec![0.0, 0.999_999]));
        let result = engine.draw(&mut PityCounter::default());
        assert_eq!(result.item, engine.table().items_of(Tier::Common)[commons - 1]);
    }
}
