pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod pity;
pub mod rng;
pub mod session;
pub mod store;
pub mod tier;
pub mod ui;
#[cfg(feature = "wasm")]
pub mod wasm_api;

pub use config::GachaConfig;
pub use engine::{DrawEngine, DrawId, DrawResult};
pub use error::{ConfigError, StoreError};
pub use ledger::{TicketBalance, TicketLedger};
pub use pity::PityCounter;
pub use rng::RandomSource;
pub use session::{GachaSession, Phase, PullOutcome, PullRejection, SessionEvent, SessionListener};
pub use store::{JsonFileStore, MemoryStore, Store};
pub use tier::{Item, Tier, TierDefinition, TierTable};
