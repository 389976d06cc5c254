//! Guarantee counter: draws since the last legendary.
//!
//! With a threshold of `N`, a run of non-legendary draws can be at most `N - 1`
//! long; the `N`th draw of such a run is forced to legendary.
use crate::error::ConfigError;
use crate::tier::Tier;

pub const DEFAULT_PITY_THRESHOLD: u32 = 90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PityCounter {
    consecutive_draws: u32,
    threshold: u32,
}

impl PityCounter {
    pub fn new(threshold: u32) -> Result<Self, ConfigError> {
        Self::with_count(threshold, 0)
    }

    /// Restore a persisted counter.
    pub fn with_count(threshold: u32, consecutive_draws: u32) -> Result<Self, ConfigError> {
        if threshold == 0 {
            return Err(ConfigError::PityThreshold(threshold));
        }
        Ok(Self { consecutive_draws, threshold })
    }

    pub fn consecutive_draws(&self) -> u32 {
        self.consecutive_draws
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record the tier actually awarded. Any legendary resets, lucky or forced.
    pub fn observe(&mut self, awarded: Tier) {
        if awarded == Tier::Legendary {
            self.consecutive_draws = 0;
        } else {
            self.consecutive_draws = self.consecutive_draws.saturating_add(1);
        }
    }

    pub fn should_force_legendary(&self) -> bool {
        self.consecutive_draws >= self.threshold - 1
    }

    /// Draws left until the guarantee fires; 1 means the next draw is forced.
    pub fn draws_until_guarantee(&self) -> u32 {
        self.threshold.saturating_sub(self.consecutive_draws).max(1)
    }
}

impl Default for PityCounter {
    fn default() -> Self {
        Self { consecutive_draws: 0, threshold: DEFAULT_PITY_THRESHOLD }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forces_on_the_threshold_draw() {
        let mut p = PityCounter::new(90).unwrap();
        for _ in 0..88 {
            p.observe(Tier::Common);
        }
        assert!(!p.should_force_legendary());
        assert_eq!(p.draws_until_guarantee(), 2);
        p.observe(Tier::Epic);
        assert_eq!(p.consecutive_draws(), 89);
        assert!(p.should_force_legendary());
        assert_eq!(p.draws_until_guarantee(), 1);
    }

    #[test]
    fn lucky_legendary_resets() {
        let mut p = PityCounter::with_count(90, 40).unwrap();
        p.observe(Tier::Legendary);
        assert_eq!(p.consecutive_draws(), 0);
    }

    #[test]
    fn threshold_one_forces_every_draw() {
        let p = PityCounter::new(1).unwrap();
        assert!(p.should_force_legendary());
    }

    #[test]
    fn zero_threshold_rejected() {
        assert!(matches!(PityCounter::new(0), Err(ConfigError::PityThreshold(0))));
    }
}
