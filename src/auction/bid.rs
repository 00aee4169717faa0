//! Per-animal bid logs

use serde::{Deserialize, Serialize};

use crate::core::types::PlayerId;

/// One accepted bid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub amount: u32,
    pub bidder: PlayerId,
    /// Round-wide submission order
    pub seq: u64,
}

/// Append-only log of the bids on one animal during one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidLog {
    bids: Vec<Bid>,
}

impl BidLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bid: Bid) {
        self.bids.push(bid);
    }

    pub fn len(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bid> + '_ {
        self.bids.iter()
    }

    /// Highest amount; the earliest submission wins a tie
    pub fn highest(&self) -> Option<&Bid> {
        self.bids.iter().fold(None, |best: Option<&Bid>, bid| match best {
            Some(b) if b.amount >= bid.amount => Some(b),
            _ => Some(bid),
        })
    }

    pub fn is_leading(&self, player: &PlayerId) -> bool {
        self.highest().is_some_and(|b| &b.bidder == player)
    }

    /// Bids by amount descending, submission order breaking ties
    pub fn ranked(&self) -> Vec<&Bid> {
        let mut ranked: Vec<&Bid> = self.bids.iter().collect();
        ranked.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.seq.cmp(&b.seq)));
        ranked
    }
}
