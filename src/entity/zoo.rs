//! Zoos on the shared map

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{AnimalId, Biome, Continent, PlayerId, Tier, ZooId};

/// A zoo: one of 25 fixed map locations a player can run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zoo {
    pub id: ZooId,
    pub continent: Continent,
    /// Prevailing climate of the continent
    pub climate: Biome,
    pub biome: Biome,
    pub multiplier: f64,
    pub owner: Option<PlayerId>,
    pub animals: BTreeSet<AnimalId>,
    pub coins: i64,
}

impl Zoo {
    pub fn new(id: ZooId, coins: i64) -> Self {
        Self {
            id,
            continent: id.continent,
            climate: id.continent.climate(),
            biome: id.biome,
            multiplier: id.continent.multiplier(id.biome),
            owner: None,
            animals: BTreeSet::new(),
            coins,
        }
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        self.animals.iter().filter(|a| a.tier == tier).count()
    }

    /// Whether another animal of `tier` fits under the per-zoo limit
    pub fn can_house(&self, tier: Tier) -> bool {
        !tier.limit_reached(self.tier_count(tier))
    }

    /// Returns false if the animal was already housed here
    pub fn add_animal(&mut self, animal: AnimalId) -> bool {
        self.animals.insert(animal)
    }

    pub fn remove_animal(&mut self, animal: AnimalId) -> bool {
        self.animals.remove(&animal)
    }

    pub fn set_owner(&mut self, player: PlayerId) {
        self.owner = Some(player);
    }

    pub fn add_coins(&mut self, amount: i64) {
        self.coins += amount;
    }
}
