use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::ledger::DEFAULT_RESET_TICKETS;
use crate::pity::DEFAULT_PITY_THRESHOLD;
use crate::store::SAVE_FILE;
use crate::tier::TierTable;

pub const CONFIG_FILE: &str = "gacha.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GachaConfig {
    #[serde(default = "GachaConfig::default_pity_threshold")]
    pub pity_threshold: u32,
    /// Balance for a fresh ledger, also the default reset amount.
    #[serde(default = "GachaConfig::default_starting_tickets")]
    pub starting_tickets: u32,
    #[serde(default = "GachaConfig::default_history_limit")]
    pub history_limit: usize,
    /// Catalog JSON; the built-in catalog when unset.
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,
    #[serde(default = "GachaConfig::default_save_file")]
    pub save_file: PathBuf,
}

impl GachaConfig {
    const fn default_pity_threshold() -> u32 {
        DEFAULT_PITY_THRESHOLD
    }

    const fn default_starting_tickets() -> u32 {
        DEFAULT_RESET_TICKETS
    }

    const fn default_history_limit() -> usize {
        50
    }

    fn default_save_file() -> PathBuf {
        PathBuf::from(SAVE_FILE)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            what: "config".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pity_threshold == 0 {
            return Err(ConfigError::PityThreshold(self.pity_threshold));
        }
        Ok(())
    }

    pub fn load_catalog(&self) -> Result<TierTable, ConfigError> {
        match &self.catalog_file {
            Some(path) => TierTable::load(path),
            None => TierTable::builtin(),
        }
    }
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            pity_threshold: Self::default_pity_threshold(),
            starting_tickets: Self::default_starting_tickets(),
            history_limit: Self::default_history_limit(),
            catalog_file: None,
            save_file: Self::default_save_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(GachaConfig::from_json("{}").unwrap(), GachaConfig::default());
    }

    #[test]
    fn partial_override() {
        let c = GachaConfig::from_json(r#"{"pity_threshold": 10, "starting_tickets": 3}"#).unwrap();
        assert_eq!((c.pity_threshold, c.starting_tickets, c.history_limit), (10, 3, 50));
    }

    #[test]
    fn zero_threshold_rejected() {
        assert!(matches!(
            GachaConfig::from_json(r#"{"pity_threshold": 0}"#),
            Err(ConfigError::PityThreshold(0))
        ));
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(GachaConfig::from_json("{"), Err(ConfigError::Parse { .. })));
    }
}
