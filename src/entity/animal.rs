//! Auction animals

use serde::{Deserialize, Serialize};

use crate::core::types::{AnimalId, Biome, PlayerId, Tier};

/// An animal in the game catalog
///
/// Animals are created once at game setup and never destroyed. Ownership and
/// health are the only fields that change during a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub name: String,
    pub tier: Tier,
    /// Home biome encoded in the id
    pub biome: Biome,
    pub serial_number: u8,
    pub base_price: u32,
    /// Habitats ranked from most favourable to least; last entry is native
    pub preference_order: [Biome; 5],
    pub audience_income: [f64; 5],
    pub maintenance_cost: [f64; 5],
    pub owner: Option<PlayerId>,
    pub unhealthy: bool,
}

impl Animal {
    pub fn new(id: AnimalId, name: String) -> Self {
        Self {
            id,
            name,
            tier: id.tier,
            biome: id.biome,
            serial_number: id.serial,
            base_price: id.tier.base_price(),
            preference_order: id.biome.preference_order(),
            audience_income: id.tier.audience_income(),
            maintenance_cost: id.tier.maintenance_cost(),
            owner: None,
            unhealthy: false,
        }
    }

    pub fn native_biome(&self) -> Biome {
        self.preference_order[4]
    }

    pub fn is_native_to(&self, biome: Biome) -> bool {
        self.native_biome() == biome
    }

    /// Rank of `biome` in this animal's preference order (0 = best, 4 = native)
    pub fn preference_rank(&self, biome: Biome) -> usize {
        // preference_order is a permutation of all biomes
        self.preference_order
            .iter()
            .position(|b| *b == biome)
            .unwrap_or(4)
    }

    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    pub fn set_owner(&mut self, player: PlayerId) {
        self.owner = Some(player);
    }

    pub fn set_unhealthy(&mut self, unhealthy: bool) {
        self.unhealthy = unhealthy;
    }

    pub fn is_healthy(&self) -> bool {
        !self.unhealthy
    }
}
