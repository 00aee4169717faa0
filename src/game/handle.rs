//! Shared game handle and the round countdown task

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::auction::{BidAccepted, BidRejection, RoundStarted};
use crate::core::error::Result;
use crate::core::types::{AnimalId, PlayerId, Tier};
use crate::game::snapshot::GameSnapshot;
use crate::game::state::GameState;

/// Cloneable handle to one game. The mutex around the state is the only
/// exclusion boundary; bids, ticks and admin calls all serialize on it.
#[derive(Clone)]
pub struct GameHandle {
    state: Arc<Mutex<GameState>>,
    countdown: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl GameHandle {
    pub fn new(state: GameState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            countdown: Arc::new(Mutex::new(None)),
        }
    }

    /// Lock the game. Every mutation leaves the state consistent, so a
    /// poisoned lock is still safe to use.
    pub fn lock(&self) -> MutexGuard<'_, GameState> {
        lock_state(&self.state)
    }

    pub fn initialize(&self) -> GameSnapshot {
        self.lock().initialize()
    }

    pub fn join_player(&self, name: &str) -> Result<PlayerId> {
        self.lock().join_player(name)
    }

    /// Enter the auction phase with Tier 1. Must be called inside a tokio runtime.
    pub fn start_auction_phase(&self) -> Result<RoundStarted> {
        let (started, generation, interval) = {
            let mut game = self.lock();
            let started = game.start_auction_phase()?;
            (started, game.engine().generation(), game.config().tick_interval())
        };
        self.spawn_countdown(generation, interval);
        Ok(started)
    }

    /// Open a round for `tier`. Must be called inside a tokio runtime.
    pub fn start_tier_auction(&self, tier: Tier) -> Result<RoundStarted> {
        let (started, generation, interval) = {
            let mut game = self.lock();
            let started = game.start_tier_auction(tier)?;
            (started, game.engine().generation(), game.config().tick_interval())
        };
        self.spawn_countdown(generation, interval);
        Ok(started)
    }

    pub fn stop_current_auction(&self) -> Result<()> {
        self.lock().stop_current_auction()
    }

    pub fn request_close(&self) -> Result<()> {
        self.lock().request_close()
    }

    pub fn submit_bid(
        &self,
        player: &PlayerId,
        animal: AnimalId,
        amount: u32,
    ) -> std::result::Result<BidAccepted, BidRejection> {
        self.lock().submit_bid(player, animal, amount)
    }

    pub fn set_animal_health(&self, animal: AnimalId, unhealthy: bool) -> Result<()> {
        self.lock().set_animal_health(animal, unhealthy)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().snapshot()
    }

    pub fn scores(&self) -> Option<BTreeMap<PlayerId, f64>> {
        self.lock().scores().cloned()
    }

    /// Wait for the most recently started countdown to finish
    pub async fn wait_for_round(&self) {
        let task = self
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!("Countdown task ended abnormally: {}", e);
            }
        }
    }

    fn spawn_countdown(&self, generation: u64, interval: Duration) {
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(run_countdown(state, generation, interval));
        // A replaced task retires on its own once it sees a newer generation
        *self
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task);
    }
}

impl std::fmt::Debug for GameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GameHandle").field(&*self.lock()).finish()
    }
}

fn lock_state(state: &Mutex<GameState>) -> MutexGuard<'_, GameState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tick the round started as `generation` once per interval until it closes.
///
/// Cancellation is cooperative: a stop or a newer round is only noticed at
/// the next tick boundary.
async fn run_countdown(state: Arc<Mutex<GameState>>, generation: u64, interval: Duration) {
    debug!("Countdown {} started", generation);
    loop {
        tokio::time::sleep(interval).await;

        let mut game = lock_state(&state);
        if game.engine().generation() != generation || !game.engine().is_running() {
            debug!("Countdown {} retired", generation);
            break;
        }
        if game.tick().should_close() {
            debug!("Countdown {} finished", generation);
            break;
        }
    }
}
