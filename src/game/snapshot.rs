//! Serializable view of a whole game

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::auction::{AuctionState, HighestBid, RoundResults};
use crate::core::types::{AnimalId, GameId, PlayerId, Tier, ZooId};
use crate::entity::{Animal, Zoo};
use crate::game::phase::Phase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub phase: Phase,
    pub players: Vec<PlayerView>,
    pub auction: AuctionView,
    pub available_zoos: Vec<ZooId>,
    pub total_animals: usize,
    pub animals: Vec<Animal>,
    /// Closed rounds, in the order they closed
    pub results: Vec<RoundResults>,
    pub scores: Option<BTreeMap<PlayerId, f64>>,
}

impl GameSnapshot {
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| &p.id == id)
    }
}

/// A player together with their zoo and housed animals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub money: u32,
    pub pending_total: u32,
    /// Open bids by animal, reserved but not yet deducted
    pub pending_bids: BTreeMap<AnimalId, u32>,
    /// Every animal bought, in purchase order
    pub owned_animals: Vec<AnimalId>,
    pub is_human: bool,
    pub is_active: bool,
    pub zoo: Option<Zoo>,
    pub animals: Vec<Animal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionView {
    pub active: bool,
    pub state: AuctionState,
    pub current_tier: Option<Tier>,
    pub time_remaining: u32,
    pub current_animals: Vec<AnimalId>,
    pub highest_bids: BTreeMap<AnimalId, HighestBid>,
}
