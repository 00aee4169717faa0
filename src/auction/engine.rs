//! Tier auction state machine
//!
//! Idle -> Running (countdown active, bids accepted) -> Closing (resolution,
//! bids rejected) -> Idle. The engine holds only the transient round; every
//! ownership or money change goes through the [`Registry`] it is handed.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auction::bid::{Bid, BidLog};
use crate::auction::outcome::{BidAccepted, BidRejection, LotResult, RoundResults};
use crate::core::error::{GameError, Result};
use crate::core::types::{AnimalId, PlayerId, Tier};
use crate::entity::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionState {
    Idle,
    Running,
    Closing,
}

/// What a freshly opened round offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStarted {
    pub tier: Tier,
    pub duration_secs: u32,
    pub animals: Vec<AnimalId>,
}

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown continues with this many seconds left
    Remaining(u32),
    /// Countdown reached zero; the round must close
    Expired,
    /// An early close was requested; the round must close
    CloseRequested,
    /// No round is running
    NotRunning,
}

impl TickOutcome {
    pub fn should_close(self) -> bool {
        matches!(self, TickOutcome::Expired | TickOutcome::CloseRequested)
    }
}

/// Current best offer on an animal for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighestBid {
    /// Highest bid, or the base price while nobody has bid
    pub amount: u32,
    pub bidder: Option<String>,
    pub bidder_id: Option<PlayerId>,
}

#[derive(Debug, Clone)]
pub struct AuctionEngine {
    state: AuctionState,
    tier: Option<Tier>,
    remaining_secs: u32,
    /// Unowned animals of the tier at round start, in catalog order
    eligible: Vec<AnimalId>,
    logs: AHashMap<AnimalId, BidLog>,
    next_seq: u64,
    /// Bumped at every round start so a stale countdown can tell it is stale
    generation: u64,
    close_requested: bool,
    min_increment: u32,
}

impl AuctionEngine {
    pub fn new(min_increment: u32) -> Self {
        Self {
            state: AuctionState::Idle,
            tier: None,
            remaining_secs: 0,
            eligible: Vec::new(),
            logs: AHashMap::new(),
            next_seq: 0,
            generation: 0,
            close_requested: false,
            min_increment,
        }
    }

    pub fn state(&self) -> AuctionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AuctionState::Running
    }

    /// Tier of the running round, or of the last round if idle
    pub fn current_tier(&self) -> Option<Tier> {
        self.tier
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn eligible(&self) -> &[AnimalId] {
        &self.eligible
    }

    pub fn bid_log(&self, animal: AnimalId) -> Option<&BidLog> {
        self.logs.get(&animal)
    }

    /// Open a round for every currently unowned animal of `tier`
    pub fn start_tier(
        &mut self,
        tier: Tier,
        duration_secs: u32,
        registry: &Registry,
    ) -> Result<RoundStarted> {
        if self.state != AuctionState::Idle {
            return Err(GameError::AuctionAlreadyRunning);
        }

        self.eligible = registry.unowned_animals_of_tier(tier);
        self.logs = self.eligible.iter().map(|id| (*id, BidLog::new())).collect();
        self.next_seq = 0;
        self.tier = Some(tier);
        self.remaining_secs = duration_secs;
        self.close_requested = false;
        self.generation += 1;
        self.state = AuctionState::Running;

        info!(
            "Starting Tier {} auction with {} animals for {}s",
            tier,
            self.eligible.len(),
            duration_secs
        );

        Ok(RoundStarted {
            tier,
            duration_secs,
            animals: self.eligible.clone(),
        })
    }

    /// Smallest acceptable bid on an animal of the running round
    pub fn minimum_bid(&self, animal: AnimalId) -> Option<u32> {
        let log = self.logs.get(&animal)?;
        Some(match log.highest() {
            Some(bid) => bid.amount.saturating_add(self.min_increment),
            None => animal.tier.base_price(),
        })
    }

    /// Number of animals other than `except` on which `player` holds the highest bid
    pub fn leading_count(&self, player: &PlayerId, except: Option<AnimalId>) -> usize {
        self.eligible
            .iter()
            .filter(|id| Some(**id) != except)
            .filter(|id| self.logs.get(*id).is_some_and(|log| log.is_leading(player)))
            .count()
    }

    /// Validate and record a bid. Checks run in a fixed order and the first
    /// failure is returned without any state change.
    pub fn submit_bid(
        &mut self,
        registry: &mut Registry,
        player_id: &PlayerId,
        animal: AnimalId,
        amount: u32,
    ) -> std::result::Result<BidAccepted, BidRejection> {
        if self.state != AuctionState::Running {
            return Err(BidRejection::NoActiveAuction);
        }

        let player = registry
            .player(player_id)
            .ok_or(BidRejection::PlayerNotFound)?;
        if player.zoo.is_none() {
            return Err(BidRejection::NoZoo);
        }

        if !self.logs.contains_key(&animal) {
            return Err(BidRejection::AnimalNotInRound);
        }

        if !player.can_afford_bid(animal, amount) {
            return Err(BidRejection::InsufficientFunds);
        }

        let leading = self.leading_count(player_id, Some(animal));
        if let Some(limit) = animal.tier.zoo_limit() {
            if leading >= limit {
                return Err(BidRejection::LeadLimitReached {
                    limit,
                    tier: animal.tier,
                });
            }
        }

        let minimum = self
            .minimum_bid(animal)
            .unwrap_or_else(|| animal.tier.base_price());
        if amount < minimum {
            return Err(BidRejection::BelowMinimum { minimum });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let log = self.logs.entry(animal).or_default();
        log.push(Bid {
            amount,
            bidder: player_id.clone(),
            seq,
        });
        let bid_count = log.len();
        let (highest_bid, leader) = match log.highest() {
            Some(b) => (b.amount, b.bidder.clone()),
            None => (amount, player_id.clone()),
        };

        if let Some(p) = registry.player_mut(player_id) {
            p.set_pending_bid(animal, amount);
        }

        debug!("Bid {} on {} by {} accepted", amount, animal, player_id);

        Ok(BidAccepted {
            animal_id: animal,
            highest_bid,
            highest_bidder: registry
                .player_name(&leader)
                .unwrap_or("Unknown")
                .to_string(),
            bid_count,
        })
    }

    /// Count one second off the running round
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != AuctionState::Running {
            return TickOutcome::NotRunning;
        }
        if self.close_requested {
            return TickOutcome::CloseRequested;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Remaining(self.remaining_secs)
        }
    }

    /// Ask the countdown to close (and resolve) the round at its next tick
    pub fn request_close(&mut self) -> Result<()> {
        if self.state != AuctionState::Running {
            return Err(GameError::NoActiveAuction);
        }
        self.close_requested = true;
        Ok(())
    }

    /// Resolve every lot of the running round and return to idle.
    ///
    /// Lots are resolved in round order. For each, bidders are tried from the
    /// highest bid down; a bidder is skipped if they cannot pay outright, their
    /// zoo is full for the tier, or awards earlier in this pass already used up
    /// their tier allowance.
    pub fn close_round(&mut self, registry: &mut Registry) -> Result<RoundResults> {
        if self.state != AuctionState::Running {
            return Err(GameError::NoActiveAuction);
        }
        let tier = self.tier.ok_or(GameError::NoActiveAuction)?;
        self.state = AuctionState::Closing;
        info!("Ending Tier {} auction", tier);

        let eligible = std::mem::take(&mut self.eligible);
        let mut logs = std::mem::take(&mut self.logs);
        let mut awarded: AHashMap<PlayerId, usize> = AHashMap::new();
        let mut lots = Vec::with_capacity(eligible.len());

        for animal in eligible {
            let log = logs.remove(&animal).unwrap_or_default();
            let name = registry
                .animal(animal)
                .map(|a| a.name.clone())
                .unwrap_or_default();

            let mut result = LotResult::unsold(animal, name);
            for bid in log.ranked() {
                let already = awarded.get(&bid.bidder).copied().unwrap_or(0);
                if tier.limit_reached(already) {
                    continue;
                }
                if !registry.award(&bid.bidder, animal, bid.amount) {
                    continue;
                }

                *awarded.entry(bid.bidder.clone()).or_default() += 1;
                let winner_name = registry.player_name(&bid.bidder).map(str::to_string);
                info!(
                    "Animal {} ({}) acquired by {} for {} coins",
                    animal,
                    result.animal_name,
                    winner_name.as_deref().unwrap_or("Unknown"),
                    bid.amount
                );
                result.winner_id = Some(bid.bidder.clone());
                result.winner = winner_name;
                result.winning_bid = bid.amount;
                break;
            }
            if !result.is_sold() && !log.is_empty() {
                debug!("Animal {} unsold: no bidder could take delivery", animal);
            }
            lots.push(result);
        }

        registry.clear_all_pending_bids();
        self.remaining_secs = 0;
        self.close_requested = false;
        self.state = AuctionState::Idle;

        Ok(RoundResults { tier, lots })
    }

    /// Administrative stop: void the running round without awarding anything
    pub fn stop(&mut self, registry: &mut Registry) -> Result<()> {
        if self.state != AuctionState::Running {
            return Err(GameError::NoActiveAuction);
        }
        info!("Stopping the current auction; all bids voided");

        self.eligible.clear();
        self.logs.clear();
        registry.clear_all_pending_bids();
        self.remaining_secs = 0;
        self.close_requested = false;
        self.state = AuctionState::Idle;
        Ok(())
    }

    /// Highest bid per animal of the current round
    pub fn highest_bids(&self, registry: &Registry) -> BTreeMap<AnimalId, HighestBid> {
        self.eligible
            .iter()
            .map(|id| {
                let view = match self.logs.get(id).and_then(|log| log.highest()) {
                    Some(bid) => HighestBid {
                        amount: bid.amount,
                        bidder: registry.player_name(&bid.bidder).map(str::to_string),
                        bidder_id: Some(bid.bidder.clone()),
                    },
                    None => HighestBid {
                        amount: id.tier.base_price(),
                        bidder: None,
                        bidder_id: None,
                    },
                };
                (*id, view)
            })
            .collect()
    }
}
