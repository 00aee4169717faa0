//! Static game catalog - the 25 zoos and the tiered animal population
//!
//! Generation is a pure function of the config: the same config always yields
//! the same ids, names, multipliers and tables, so replays are reproducible.

use std::collections::BTreeMap;

use crate::core::config::GameConfig;
use crate::core::types::{AnimalId, Biome, Continent, Tier, ZooId};
use crate::entity::{Animal, Zoo};

/// Generated reference data for one game
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// A1..A5, B1..B5, ... E5
    pub zoos: Vec<Zoo>,
    /// Biome-major, then tier, then serial
    pub animals: Vec<Animal>,
}

impl Catalog {
    pub fn generate(config: &GameConfig) -> Self {
        Self {
            zoos: generate_zoos(config.starting_coins),
            animals: generate_animals(&config.animals_per_tier, &config.animal_names),
        }
    }

    pub fn animals_of_tier(&self, tier: Tier) -> impl Iterator<Item = &Animal> + '_ {
        self.animals.iter().filter(move |a| a.tier == tier)
    }
}

pub fn generate_zoos(starting_coins: i64) -> Vec<Zoo> {
    Continent::ALL
        .into_iter()
        .flat_map(|continent| {
            Biome::ALL
                .into_iter()
                .map(move |biome| Zoo::new(ZooId::new(continent, biome), starting_coins))
        })
        .collect()
}

pub fn generate_animals(
    counts_per_tier: &[u8; 4],
    names: &BTreeMap<AnimalId, String>,
) -> Vec<Animal> {
    let mut animals = Vec::new();
    for biome in Biome::ALL {
        for tier in Tier::ALL {
            for serial in 1..=counts_per_tier[tier.index()] {
                let id = AnimalId::new(tier, biome, serial);
                let name = names
                    .get(&id)
                    .filter(|n| !n.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| default_name(id));
                animals.push(Animal::new(id, name));
            }
        }
    }
    animals
}

pub fn default_name(id: AnimalId) -> String {
    format!("Tier {} {} Animal {}", id.tier, id.biome.title(), id.serial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_sizes() {
        let catalog = Catalog::generate(&GameConfig::default());
        assert_eq!(catalog.zoos.len(), 25);
        assert_eq!(catalog.animals.len(), 5 * (2 + 4 + 7 + 11));
        assert_eq!(catalog.animals_of_tier(Tier::One).count(), 10);
        assert_eq!(catalog.animals_of_tier(Tier::Four).count(), 55);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = GameConfig::default();
        assert_eq!(Catalog::generate(&config), Catalog::generate(&config));
    }

    #[test]
    fn test_zoo_order_and_multipliers() {
        let catalog = Catalog::generate(&GameConfig::default());
        let ids: Vec<String> = catalog.zoos.iter().take(6).map(|z| z.id.to_string()).collect();
        assert_eq!(ids, ["A1", "A2", "A3", "A4", "A5", "B1"]);
        assert_eq!(catalog.zoos[1].multiplier, 1.25);
        assert_eq!(catalog.zoos[24].id.to_string(), "E5");
        assert_eq!(catalog.zoos[24].multiplier, 1.2);
    }

    #[test]
    fn test_animal_order_is_biome_major() {
        let catalog = Catalog::generate(&GameConfig::default());
        let first: Vec<String> = catalog.animals.iter().take(7).map(|a| a.id.to_string()).collect();
        assert_eq!(first, ["1101", "1102", "2101", "2102", "2103", "2104", "3101"]);
        assert_eq!(catalog.animals[24].id.to_string(), "1201");
    }

    #[test]
    fn test_name_overrides() {
        let mut config = GameConfig::default();
        let id = AnimalId::new(Tier::Two, Biome::Ocean, 3);
        config.animal_names.insert(id, "Sea Otter".into());
        config
            .animal_names
            .insert(AnimalId::new(Tier::Two, Biome::Ocean, 4), "   ".into());

        let catalog = Catalog::generate(&config);
        let find = |id: AnimalId| catalog.animals.iter().find(|a| a.id == id).unwrap().name.clone();
        assert_eq!(find(id), "Sea Otter");
        assert_eq!(find(AnimalId::new(Tier::Two, Biome::Ocean, 4)), "Tier 2 Ocean Animal 4");
    }
}
