//! Battle configuration with documented defaults
//!
//! Everything a caller may tune before a battle starts. The engine itself never
//! reads global state; these values are copied into `GameState` at init.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// Configuration for a single battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Radius of the hexagonal board, centred on (0, 0)
    ///
    /// Radius 5 gives 91 cells. Pathfinding, escape-route counting and
    /// movement candidates only consider cells inside the board.
    pub grid_radius: u32,

    /// Seed for the collision-arbitration PRNG
    ///
    /// Two battles with the same seed and roster replay identically.
    pub seed: u64,

    /// Tick limit used by drivers that run a battle to completion
    ///
    /// The engine does not enforce it; `process_tick` can always be called.
    pub max_ticks: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            grid_radius: 5,
            seed: 0,
            max_ticks: 500,
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_grid_radius(mut self, grid_radius: u32) -> Self {
        self.grid_radius = grid_radius;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid_radius == 0 {
            return Err(EngineError::InvalidConfig(
                "grid_radius must be at least 1".into(),
            ));
        }

        // Keeps cell counts comfortably inside i32 coordinate math
        if self.grid_radius > 1000 {
            return Err(EngineError::InvalidConfig(format!(
                "grid_radius ({}) should be <= 1000",
                self.grid_radius
            )));
        }

        if self.max_ticks == 0 {
            return Err(EngineError::InvalidConfig(
                "max_ticks must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
