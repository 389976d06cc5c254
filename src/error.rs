use thiserror::Error;

use crate::tier::Tier;

/// Misconfiguration detected while loading the catalog or building a session.
/// Any of these means the engine refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tier '{0}' has no definition")]
    MissingTier(Tier),
    #[error("tier '{0}' is defined more than once")]
    DuplicateTier(Tier),
    #[error("tier '{tier}' has non-positive weight {weight}")]
    NonPositiveWeight { tier: Tier, weight: f64 },
    #[error("tier weights sum to {0}, expected 100")]
    WeightSum(f64),
    #[error("tier '{0}' has no items")]
    EmptyTier(Tier),
    #[error("refusing to empty '{0}', it is the fallback tier")]
    EmptyFallbackTier(Tier),
    #[error("pity threshold must be at least 1 (got {0})")]
    PityThreshold(u32),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a persistence hook. Logged by the session, never fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save file io: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file format: {0}")]
    Json(#[from] serde_json::Error),
}
