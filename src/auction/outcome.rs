//! Results the auction hands back to callers

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{AnimalId, PlayerId, Tier};

/// Why a bid was turned down. Never fatal; the caller may resubmit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BidRejection {
    #[error("No active auction")]
    NoActiveAuction,

    #[error("Player not found")]
    PlayerNotFound,

    #[error("Player has no zoo assigned")]
    NoZoo,

    #[error("Animal not in current auction")]
    AnimalNotInRound,

    #[error("Insufficient funds considering your pending bids")]
    InsufficientFunds,

    #[error("You are already leading bids for {limit} Tier {tier} animals (the maximum allowed)")]
    LeadLimitReached { limit: usize, tier: Tier },

    #[error("Bid must be at least {minimum}")]
    BelowMinimum { minimum: u32 },
}

/// A bid that was recorded as the new highest on its animal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidAccepted {
    pub animal_id: AnimalId,
    pub highest_bid: u32,
    pub highest_bidder: String,
    pub bid_count: usize,
}

/// Transport-facing bid answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidResponse {
    pub success: bool,
    pub message: String,
}

impl From<&std::result::Result<BidAccepted, BidRejection>> for BidResponse {
    fn from(result: &std::result::Result<BidAccepted, BidRejection>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                message: "Bid submitted successfully".into(),
            },
            Err(rejection) => Self {
                success: false,
                message: rejection.to_string(),
            },
        }
    }
}

/// Resolution of one animal at round close
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotResult {
    pub animal_id: AnimalId,
    pub animal_name: String,
    pub winner_id: Option<PlayerId>,
    pub winner: Option<String>,
    pub winning_bid: u32,
}

impl LotResult {
    pub fn unsold(animal_id: AnimalId, animal_name: String) -> Self {
        Self {
            animal_id,
            animal_name,
            winner_id: None,
            winner: None,
            winning_bid: 0,
        }
    }

    pub fn is_sold(&self) -> bool {
        self.winner_id.is_some()
    }
}

/// Every lot of a closed round, in the order the round was opened with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResults {
    pub tier: Tier,
    pub lots: Vec<LotResult>,
}

impl RoundResults {
    pub fn sold(&self) -> impl Iterator<Item = &LotResult> + '_ {
        self.lots.iter().filter(|l| l.is_sold())
    }

    pub fn lot(&self, animal: AnimalId) -> Option<&LotResult> {
        self.lots.iter().find(|l| l.animal_id == animal)
    }
}
