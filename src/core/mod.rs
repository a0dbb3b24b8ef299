pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::BattleConfig;
pub use error::{EngineError, Result};
pub use rng::{init_rng, next_random, RngState};
pub use types::Tick;
