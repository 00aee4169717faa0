//! Game configuration with documented constants
//!
//! Every tunable number of a game lives here. Defaults reproduce the standard
//! Fauna Fantastico rules; a TOML file can override any subset of them.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{AnimalId, Tier};

/// Total number of zoos on the map (5 continents x 5 biomes)
pub const ZOO_COUNT: usize = 25;

/// Configuration for one game instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === CATALOG ===
    /// Animals generated per biome for each tier, indexed by tier - 1
    ///
    /// With the default [2, 4, 7, 11] the catalog holds 5 x 24 = 120 animals.
    /// Serial numbers are two digits, so each count must stay within 1..=99.
    pub animals_per_tier: [u8; 4],

    /// Display-name overrides keyed by animal id (e.g. "1101" = "Snow Leopard")
    ///
    /// Ids without an entry get "Tier {t} {Biome} Animal {serial}".
    pub animal_names: BTreeMap<AnimalId, String>,

    // === PLAYERS ===
    /// Number of AI players seated on the first zoos at initialization
    ///
    /// The remaining zoos stay in the available pool for human joins.
    pub ai_players: usize,

    /// Money each player starts with
    pub starting_money: u32,

    /// Coin balance each zoo starts with (counted in the final score)
    pub starting_coins: i64,

    // === AUCTION ===
    /// Round length per tier in seconds, indexed by tier - 1
    pub tier_durations_secs: [u32; 4],

    /// Wall-clock length of one countdown tick in milliseconds
    ///
    /// 1000 in a real game. Simulations shrink it to replay a full game fast.
    pub tick_interval_ms: u64,

    /// Amount a new bid must exceed the current highest bid by
    pub min_bid_increment: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            animals_per_tier: [2, 4, 7, 11],
            animal_names: BTreeMap::new(),
            ai_players: 20,
            starting_money: 100,
            starting_coins: 100,
            tier_durations_secs: [120, 180, 240, 300],
            tick_interval_ms: 1000,
            min_bid_increment: 2,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animals_for(&self, tier: Tier) -> u8 {
        self.animals_per_tier[tier.index()]
    }

    pub fn duration_for(&self, tier: Tier) -> u32 {
        self.tier_durations_secs[tier.index()]
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        for tier in Tier::ALL {
            let count = self.animals_for(tier);
            if !(1..=99).contains(&count) {
                return Err(format!(
                    "animals_per_tier for tier {} must be within 1..=99 (got {})",
                    tier, count
                ));
            }
            if self.duration_for(tier) == 0 {
                return Err(format!("tier {} round duration must be positive", tier));
            }
        }

        if self.ai_players > ZOO_COUNT {
            return Err(format!(
                "ai_players ({}) cannot exceed the number of zoos ({})",
                self.ai_players, ZOO_COUNT
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be positive".into());
        }

        if self.min_bid_increment == 0 {
            return Err("min_bid_increment must be positive".into());
        }

        Ok(())
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate().map_err(GameError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
