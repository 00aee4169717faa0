//! Entity registry - owns every zoo, animal and player of one game

use ahash::AHashMap;

use crate::catalog::Catalog;
use crate::core::error::{GameError, Result};
use crate::core::types::{AnimalId, PlayerId, Tier, ZooId};
use crate::entity::{Animal, Player, Zoo};

/// All mutable entity records of a game, stored in catalog order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    zoos: Vec<Zoo>,
    zoo_index: AHashMap<ZooId, usize>,
    animals: Vec<Animal>,
    animal_index: AHashMap<AnimalId, usize>,
    players: Vec<Player>,
    player_index: AHashMap<PlayerId, usize>,
}

impl Registry {
    pub fn from_catalog(catalog: Catalog) -> Self {
        let zoo_index = catalog
            .zoos
            .iter()
            .enumerate()
            .map(|(i, z)| (z.id, i))
            .collect();
        let animal_index = catalog
            .animals
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, i))
            .collect();

        Self {
            zoos: catalog.zoos,
            zoo_index,
            animals: catalog.animals,
            animal_index,
            players: Vec::new(),
            player_index: AHashMap::new(),
        }
    }

    pub fn zoos(&self) -> &[Zoo] {
        &self.zoos
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn zoo(&self, id: ZooId) -> Option<&Zoo> {
        self.zoo_index.get(&id).map(|&i| &self.zoos[i])
    }

    pub fn zoo_mut(&mut self, id: ZooId) -> Option<&mut Zoo> {
        self.zoo_index.get(&id).map(|&i| &mut self.zoos[i])
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.animal_index.get(&id).map(|&i| &self.animals[i])
    }

    pub fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.animal_index.get(&id).map(|&i| &mut self.animals[i])
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.player_index.get(id).map(|&i| &self.players[i])
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.player_index.get(id).map(|&i| &mut self.players[i])
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_name(&self, id: &PlayerId) -> Option<&str> {
        self.player(id).map(|p| p.name.as_str())
    }

    /// The zoo run by a player, if they have one
    pub fn zoo_of(&self, player: &PlayerId) -> Option<&Zoo> {
        self.player(player).and_then(|p| p.zoo).and_then(|z| self.zoo(z))
    }

    /// Zoos nobody runs yet, in catalog order
    pub fn available_zoos(&self) -> impl Iterator<Item = &Zoo> + '_ {
        self.zoos.iter().filter(|z| z.owner.is_none())
    }

    /// Unowned animals of a tier, in catalog order
    pub fn unowned_animals_of_tier(&self, tier: Tier) -> Vec<AnimalId> {
        self.animals
            .iter()
            .filter(|a| a.tier == tier && !a.is_owned())
            .map(|a| a.id)
            .collect()
    }

    /// Seat a player, taking ownership of their zoo if they were given one
    pub fn add_player(&mut self, player: Player) -> Result<()> {
        if self.player_index.contains_key(&player.id) {
            return Err(GameError::PlayerExists(player.id.to_string()));
        }
        if let Some(zoo_id) = player.zoo {
            let zoo = self.zoo_mut(zoo_id).ok_or(GameError::ZooNotFound(zoo_id))?;
            if zoo.owner.is_some() {
                return Err(GameError::NoZoosAvailable);
            }
            zoo.set_owner(player.id.clone());
        }
        self.player_index.insert(player.id.clone(), self.players.len());
        self.players.push(player);
        Ok(())
    }

    pub fn clear_all_pending_bids(&mut self) {
        for player in &mut self.players {
            player.clear_pending_bids();
        }
    }

    /// Whether `player` could take delivery of `animal` for `amount` right now
    pub fn can_award(&self, player: &PlayerId, animal: AnimalId, amount: u32) -> bool {
        let Some(p) = self.player(player) else {
            return false;
        };
        let Some(zoo) = self.zoo_of(player) else {
            return false;
        };
        let unowned = self.animal(animal).is_some_and(|a| !a.is_owned());
        unowned && p.money >= amount && zoo.can_house(animal.tier)
    }

    /// Transfer an unowned animal to a player's zoo for `amount`.
    ///
    /// Checks every precondition before touching anything, so a false return
    /// leaves the registry unchanged.
    pub fn award(&mut self, player: &PlayerId, animal: AnimalId, amount: u32) -> bool {
        if !self.can_award(player, animal, amount) {
            return false;
        }
        let Some(zoo_id) = self.player(player).and_then(|p| p.zoo) else {
            return false;
        };

        if let Some(p) = self.player_mut(player) {
            p.spend(amount);
            p.record_purchase(animal);
        }
        if let Some(zoo) = self.zoo_mut(zoo_id) {
            zoo.add_animal(animal);
        }
        if let Some(a) = self.animal_mut(animal) {
            a.set_owner(player.clone());
        }
        true
    }
}
