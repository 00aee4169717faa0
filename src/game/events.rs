//! Push notifications for the transport layer to relay unmodified

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::auction::{BidAccepted, RoundResults};
use crate::core::types::{PlayerId, Tier};
use crate::entity::Animal;
use crate::game::snapshot::GameSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    AuctionRoundStart {
        tier: Tier,
        duration: u32,
        animals: Vec<Animal>,
    },
    AuctionTimerUpdate {
        tier: Tier,
        time_remaining: u32,
    },
    BidUpdate(BidAccepted),
    AuctionRoundEnd(RoundResults),
    AuctionStopped {
        message: String,
    },
    GameStateUpdate(Box<GameSnapshot>),
    ScoresReady {
        scores: BTreeMap<PlayerId, f64>,
    },
}

impl GameEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::AuctionRoundStart { .. } => "auction_round_start",
            GameEvent::AuctionTimerUpdate { .. } => "auction_timer_update",
            GameEvent::BidUpdate(_) => "bid_update",
            GameEvent::AuctionRoundEnd(_) => "auction_round_end",
            GameEvent::AuctionStopped { .. } => "auction_stopped",
            GameEvent::GameStateUpdate(_) => "game_state_update",
            GameEvent::ScoresReady { .. } => "scores_ready",
        }
    }
}

/// Receiver of game notifications
pub trait EventSink: Send + Sync {
    fn emit(&self, event: GameEvent);
}

/// Discards every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: GameEvent) {}
}

/// Forwards events into a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<GameEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<GameEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: GameEvent) {
        // A dropped receiver just means nobody is listening any more
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(GameEvent::name)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().into_iter().filter(|n| *n == name).count()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: GameEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
