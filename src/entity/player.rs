//! Players and their provisional bid bookkeeping

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{AnimalId, PlayerId, ZooId};

/// A zoo owner taking part in the auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub money: u32,
    pub zoo: Option<ZooId>,
    pub is_active: bool,
    pub is_human: bool,
    pub owned_animals: Vec<AnimalId>,
    /// Money reserved by open bids, not yet deducted: animal -> amount
    pub pending_bids: BTreeMap<AnimalId, u32>,
}

impl Player {
    pub fn new(id: PlayerId, name: String, money: u32) -> Self {
        Self {
            id,
            name,
            money,
            zoo: None,
            is_active: true,
            is_human: false,
            owned_animals: Vec::new(),
            pending_bids: BTreeMap::new(),
        }
    }

    pub fn with_zoo(mut self, zoo: ZooId) -> Self {
        self.zoo = Some(zoo);
        self
    }

    pub fn human(mut self) -> Self {
        self.is_human = true;
        self
    }

    pub fn pending_total(&self) -> u32 {
        self.pending_bids.values().sum()
    }

    /// Money not reserved by any pending bid
    pub fn available_money(&self) -> u32 {
        self.money.saturating_sub(self.pending_total())
    }

    /// Whether `amount` fits alongside the pending bids on every other animal.
    ///
    /// An earlier bid on `animal` itself is superseded, so it is not counted.
    pub fn can_afford_bid(&self, animal: AnimalId, amount: u32) -> bool {
        let others: u64 = self
            .pending_bids
            .iter()
            .filter(|(id, _)| **id != animal)
            .map(|(_, amount)| *amount as u64)
            .sum();
        others + amount as u64 <= self.money as u64
    }

    pub fn set_pending_bid(&mut self, animal: AnimalId, amount: u32) {
        self.pending_bids.insert(animal, amount);
    }

    pub fn clear_pending_bids(&mut self) {
        self.pending_bids.clear();
    }

    /// Deduct `amount`, returning false (and changing nothing) if short
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.money.checked_sub(amount) {
            Some(rest) => {
                self.money = rest;
                true
            }
            None => false,
        }
    }

    pub fn record_purchase(&mut self, animal: AnimalId) {
        if !self.owned_animals.contains(&animal) {
            self.owned_animals.push(animal);
        }
    }
}
