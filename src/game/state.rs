//! Game orchestration - phase transitions and the single mutation boundary
//!
//! Every state change of a game goes through a [`GameState`] method, and every
//! notification the transport layer relays is emitted from here.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auction::{
    AuctionEngine, BidAccepted, BidRejection, HighestBid, RoundResults, RoundStarted, TickOutcome,
};
use crate::catalog::Catalog;
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{AnimalId, GameId, PlayerId, Tier};
use crate::entity::{Player, Registry};
use crate::game::events::{EventSink, GameEvent};
use crate::game::phase::Phase;
use crate::game::snapshot::{AuctionView, GameSnapshot, PlayerView};
use crate::scoring::{self, compute_bonus, compute_final_score};

pub const STOPPED_MESSAGE: &str = "Auction stopped by administrator";

pub struct GameState {
    game_id: GameId,
    config: GameConfig,
    phase: Phase,
    registry: Registry,
    engine: AuctionEngine,
    results: Vec<RoundResults>,
    scores: Option<BTreeMap<PlayerId, f64>>,
    sink: Arc<dyn EventSink>,
}

impl GameState {
    /// Create an empty game: catalog generated, nobody seated yet
    pub fn new(config: GameConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        config.validate().map_err(GameError::InvalidConfig)?;
        let registry = Registry::from_catalog(Catalog::generate(&config));
        let engine = AuctionEngine::new(config.min_bid_increment);

        Ok(Self {
            game_id: GameId::new(),
            config,
            phase: Phase::Setup,
            registry,
            engine,
            results: Vec::new(),
            scores: None,
            sink,
        })
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn engine(&self) -> &AuctionEngine {
        &self.engine
    }

    pub fn scores(&self) -> Option<&BTreeMap<PlayerId, f64>> {
        self.scores.as_ref()
    }

    pub fn auction_results(&self) -> &[RoundResults] {
        &self.results
    }

    pub fn round_results(&self, tier: Tier) -> Option<&RoundResults> {
        self.results.iter().rev().find(|r| r.tier == tier)
    }

    pub fn highest_bids(&self) -> BTreeMap<AnimalId, HighestBid> {
        self.engine.highest_bids(&self.registry)
    }

    /// Start a fresh game: regenerate every entity and seat the default players.
    ///
    /// A running round is voided first so its countdown retires.
    pub fn initialize(&mut self) -> GameSnapshot {
        if self.engine.is_running() {
            if let Err(e) = self.engine.stop(&mut self.registry) {
                warn!("Failed to void running round on reinitialise: {}", e);
            }
        }

        self.game_id = GameId::new();
        self.phase = Phase::Setup;
        self.results.clear();
        self.scores = None;
        self.registry = Registry::from_catalog(Catalog::generate(&self.config));

        let seats: Vec<_> = self
            .registry
            .zoos()
            .iter()
            .take(self.config.ai_players)
            .map(|z| z.id)
            .collect();
        for zoo in seats {
            let name = zoo.to_string();
            let player = Player::new(PlayerId::new(name.clone()), name, self.config.starting_money)
                .with_zoo(zoo);
            if let Err(e) = self.registry.add_player(player) {
                warn!("Could not seat default player at {}: {}", zoo, e);
            }
        }

        info!(
            "Initialised game {} with {} zoos, {} animals, {} players",
            self.game_id.0,
            self.registry.zoos().len(),
            self.registry.animals().len(),
            self.registry.players().len()
        );

        let snapshot = self.snapshot();
        self.sink
            .emit(GameEvent::GameStateUpdate(Box::new(snapshot.clone())));
        snapshot
    }

    /// Seat a new human player at the first available zoo
    pub fn join_player(&mut self, name: &str) -> Result<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::MissingField("name"));
        }
        if self.registry.player_by_name(name).is_some() {
            return Err(GameError::PlayerExists(name.to_string()));
        }
        let zoo = self
            .registry
            .available_zoos()
            .next()
            .map(|z| z.id)
            .ok_or(GameError::NoZoosAvailable)?;

        let id = PlayerId::new(format!("player_{}", self.registry.players().len() + 1));
        let player = Player::new(id.clone(), name.to_string(), self.config.starting_money)
            .with_zoo(zoo)
            .human();
        self.registry.add_player(player)?;

        info!("Player {} ({}) joined at zoo {}", name, id, zoo);
        self.refresh();
        Ok(id)
    }

    /// Move to the auction phase and open Tier 1
    pub fn start_auction_phase(&mut self) -> Result<RoundStarted> {
        if self.phase != Phase::Setup {
            return Err(GameError::WrongPhase(self.phase.to_string()));
        }
        self.start_tier_auction(Tier::One)
    }

    pub fn start_tier_auction(&mut self, tier: Tier) -> Result<RoundStarted> {
        if self.phase.is_terminal() {
            return Err(GameError::WrongPhase(self.phase.to_string()));
        }

        let duration = self.config.duration_for(tier);
        let started = self.engine.start_tier(tier, duration, &self.registry)?;
        if self.phase != Phase::Auction {
            info!("Phase {} -> {}", self.phase, Phase::Auction);
            self.phase = Phase::Auction;
        }

        let animals = started
            .animals
            .iter()
            .filter_map(|id| self.registry.animal(*id).cloned())
            .collect();
        self.sink.emit(GameEvent::AuctionRoundStart {
            tier,
            duration,
            animals,
        });
        self.refresh();
        Ok(started)
    }

    /// Administrative stop: void the running round. The game stays in the
    /// auction phase, waiting for a tier to be started by hand.
    pub fn stop_current_auction(&mut self) -> Result<()> {
        self.engine.stop(&mut self.registry)?;

        self.sink.emit(GameEvent::AuctionStopped {
            message: STOPPED_MESSAGE.to_string(),
        });
        self.refresh();
        Ok(())
    }

    /// Close the running round, with resolution, at the next countdown tick
    pub fn request_close(&mut self) -> Result<()> {
        self.engine.request_close()?;
        info!("Early close requested");
        Ok(())
    }

    pub fn submit_bid(
        &mut self,
        player: &PlayerId,
        animal: AnimalId,
        amount: u32,
    ) -> std::result::Result<BidAccepted, BidRejection> {
        match self
            .engine
            .submit_bid(&mut self.registry, player, animal, amount)
        {
            Ok(accepted) => {
                self.sink.emit(GameEvent::BidUpdate(accepted.clone()));
                Ok(accepted)
            }
            Err(rejection) => {
                debug!(
                    "Bid {} on {} by {} rejected: {}",
                    amount, animal, player, rejection
                );
                Err(rejection)
            }
        }
    }

    /// One countdown step; closes the round when the countdown says so
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.engine.tick();
        let tier = self.engine.current_tier();

        match (outcome, tier) {
            (TickOutcome::Remaining(secs), Some(tier)) => {
                self.sink.emit(GameEvent::AuctionTimerUpdate {
                    tier,
                    time_remaining: secs,
                });
            }
            (TickOutcome::Expired, Some(tier)) => {
                self.sink.emit(GameEvent::AuctionTimerUpdate {
                    tier,
                    time_remaining: 0,
                });
            }
            _ => {}
        }

        if outcome.should_close() {
            if let Err(e) = self.close_round() {
                warn!("Failed to close round: {}", e);
            }
        }
        outcome
    }

    /// Resolve the running round. Closing Tier 4 moves straight to scoring.
    pub fn close_round(&mut self) -> Result<RoundResults> {
        let results = self.engine.close_round(&mut self.registry)?;
        info!(
            "Tier {} closed: {} of {} animals sold",
            results.tier,
            results.sold().count(),
            results.lots.len()
        );

        self.results.push(results.clone());
        self.sink.emit(GameEvent::AuctionRoundEnd(results.clone()));
        self.refresh();

        if results.tier.is_final() {
            self.start_scoring_phase()?;
        }
        Ok(results)
    }

    /// Apply the synergy bonus to every seated zoo, then score it.
    ///
    /// The bonus goes into coins once; asking again returns the stored scores.
    pub fn start_scoring_phase(&mut self) -> Result<BTreeMap<PlayerId, f64>> {
        if self.engine.is_running() {
            return Err(GameError::AuctionAlreadyRunning);
        }
        if let Some(scores) = &self.scores {
            return Ok(scores.clone());
        }
        info!("Phase {} -> {}", self.phase, Phase::Scoring);
        self.phase = Phase::Scoring;

        let seated: Vec<_> = self
            .registry
            .players()
            .iter()
            .filter_map(|p| p.zoo.map(|z| (p.id.clone(), z)))
            .collect();

        let mut scores = BTreeMap::new();
        for (player, zoo_id) in seated {
            let bonus = match self.registry.zoo(zoo_id) {
                Some(zoo) => compute_bonus(zoo, &scoring::housed_animals(zoo, &self.registry)),
                None => continue,
            };
            // Whole coins only
            let bonus = bonus.trunc() as i64;
            if let Some(zoo) = self.registry.zoo_mut(zoo_id) {
                zoo.add_coins(bonus);
            }

            let Some(zoo) = self.registry.zoo(zoo_id) else {
                continue;
            };
            let score = compute_final_score(zoo, &scoring::housed_animals(zoo, &self.registry));
            debug!(
                "Zoo {} of {}: bonus {}, coins {}, score {:.3}",
                zoo_id, player, bonus, zoo.coins, score
            );
            scores.insert(player, score);
        }

        info!("Scored {} zoos", scores.len());
        self.scores = Some(scores.clone());
        self.sink.emit(GameEvent::ScoresReady {
            scores: scores.clone(),
        });
        self.refresh();
        Ok(scores)
    }

    /// Mark a player as connected or not. Inactive players keep their zoo and bids.
    pub fn set_player_active(&mut self, player: &PlayerId, active: bool) -> Result<()> {
        let record = self
            .registry
            .player_mut(player)
            .ok_or_else(|| GameError::PlayerNotFound(player.clone()))?;
        record.is_active = active;
        debug!("Player {} active: {}", player, active);
        self.refresh();
        Ok(())
    }

    pub fn set_animal_health(&mut self, animal: AnimalId, unhealthy: bool) -> Result<()> {
        let record = self
            .registry
            .animal_mut(animal)
            .ok_or(GameError::AnimalNotFound(animal))?;
        record.set_unhealthy(unhealthy);
        info!(
            "Animal {} marked {}",
            animal,
            if unhealthy { "unhealthy" } else { "healthy" }
        );
        self.refresh();
        Ok(())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let players = self
            .registry
            .players()
            .iter()
            .map(|p| {
                let zoo = p.zoo.and_then(|z| self.registry.zoo(z));
                PlayerView {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    money: p.money,
                    pending_total: p.pending_total(),
                    pending_bids: p.pending_bids.clone(),
                    owned_animals: p.owned_animals.clone(),
                    is_human: p.is_human,
                    is_active: p.is_active,
                    zoo: zoo.cloned(),
                    animals: zoo
                        .map(|z| {
                            scoring::housed_animals(z, &self.registry)
                                .into_iter()
                                .cloned()
                                .collect()
                        })
                        .unwrap_or_default(),
                }
            })
            .collect();

        let running = self.engine.is_running();
        let auction = AuctionView {
            active: running,
            state: self.engine.state(),
            current_tier: self.engine.current_tier(),
            time_remaining: self.engine.remaining_secs(),
            current_animals: self.engine.eligible().to_vec(),
            highest_bids: self.highest_bids(),
        };

        GameSnapshot {
            game_id: self.game_id,
            phase: self.phase,
            players,
            auction,
            available_zoos: self.registry.available_zoos().map(|z| z.id).collect(),
            total_animals: self.registry.animals().len(),
            animals: self.registry.animals().to_vec(),
            results: self.results.clone(),
            scores: self.scores.clone(),
        }
    }

    fn refresh(&self) {
        self.sink
            .emit(GameEvent::GameStateUpdate(Box::new(self.snapshot())));
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("game_id", &self.game_id)
            .field("phase", &self.phase)
            .field("players", &self.registry.players().len())
            .field("auction", &self.engine.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Biome;
    use crate::game::events::RecordingSink;

    fn game() -> (GameState, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let mut state = GameState::new(GameConfig::default(), sink.clone()).unwrap();
        state.initialize();
        sink.clear();
        (state, sink)
    }

    fn animal(tier: Tier, biome: Biome, serial: u8) -> AnimalId {
        AnimalId::new(tier, biome, serial)
    }

    #[test]
    fn test_initialize_seats_default_players() {
        let (state, _) = game();
        assert_eq!(state.phase(), Phase::Setup);
        assert_eq!(state.registry().players().len(), 20);
        let first = &state.registry().players()[0];
        assert_eq!(first.id.as_str(), "A1");
        assert_eq!(first.name, "A1");
        assert_eq!(first.money, 100);
        assert!(!first.is_human);
        assert_eq!(state.registry().available_zoos().count(), 5);
        assert_eq!(state.registry().animals().len(), 5 * (2 + 4 + 7 + 11));
    }

    #[test]
    fn test_join_takes_first_available_zoo() {
        let (mut state, sink) = game();
        let id = state.join_player("alice").unwrap();
        assert_eq!(id.as_str(), "player_21");
        let zoo = state.registry().zoo_of(&id).unwrap();
        assert_eq!(zoo.id.to_string(), "E1");
        assert!(state.registry().player(&id).unwrap().is_human);
        assert_eq!(sink.count("game_state_update"), 1);

        assert!(matches!(
            state.join_player("alice"),
            Err(GameError::PlayerExists(_))
        ));
        for name in ["b", "c", "d", "e"] {
            state.join_player(name).unwrap();
        }
        assert!(matches!(
            state.join_player("late"),
            Err(GameError::NoZoosAvailable)
        ));
    }

    #[test]
    fn test_round_start_emits_and_switches_phase() {
        let (mut state, sink) = game();
        let started = state.start_auction_phase().unwrap();
        assert_eq!(started.tier, Tier::One);
        assert_eq!(started.duration_secs, 120);
        assert_eq!(started.animals.len(), 10);
        assert_eq!(state.phase(), Phase::Auction);
        assert_eq!(sink.names(), ["auction_round_start", "game_state_update"]);

        assert!(matches!(
            state.start_tier_auction(Tier::Two),
            Err(GameError::AuctionAlreadyRunning)
        ));
    }

    #[test]
    fn test_bid_update_event() {
        let (mut state, sink) = game();
        state.start_tier_auction(Tier::Four).unwrap();
        sink.clear();

        let lot = animal(Tier::Four, Biome::Ocean, 3);
        let accepted = state.submit_bid(&"B2".into(), lot, 5).unwrap();
        assert_eq!(accepted.highest_bid, 5);
        assert_eq!(accepted.highest_bidder, "B2");
        assert_eq!(
            sink.events(),
            vec![GameEvent::BidUpdate(accepted.clone())]
        );

        let rejected = state.submit_bid(&"C3".into(), lot, 4).unwrap_err();
        assert_eq!(rejected.to_string(), "Bid must be at least 7");
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_tick_emits_timer_then_closes() {
        let mut config = GameConfig::default();
        config.tier_durations_secs = [2, 2, 2, 2];
        let sink = Arc::new(RecordingSink::new());
        let mut state = GameState::new(config, sink.clone()).unwrap();
        state.initialize();
        state.start_tier_auction(Tier::Two).unwrap();
        sink.clear();

        assert_eq!(state.tick(), TickOutcome::Remaining(1));
        assert_eq!(state.tick(), TickOutcome::Expired);
        assert_eq!(
            sink.names(),
            [
                "auction_timer_update",
                "auction_timer_update",
                "auction_round_end",
                "game_state_update"
            ]
        );
        assert!(!state.engine().is_running());
        assert_eq!(state.auction_results().len(), 1);
        assert_eq!(state.phase(), Phase::Auction);
    }

    #[test]
    fn test_stop_keeps_auction_phase() {
        let (mut state, sink) = game();
        state.start_tier_auction(Tier::One).unwrap();
        let lot = animal(Tier::One, Biome::Forest, 1);
        state.submit_bid(&"A1".into(), lot, 30).unwrap();
        sink.clear();

        state.stop_current_auction().unwrap();
        assert_eq!(state.phase(), Phase::Auction);
        assert_eq!(state.snapshot().phase, Phase::Auction);
        assert_eq!(sink.count("auction_stopped"), 1);
        assert_eq!(state.registry().player(&"A1".into()).unwrap().pending_total(), 0);
        assert!(!state.registry().animal(lot).unwrap().is_owned());
        assert!(matches!(
            state.stop_current_auction(),
            Err(GameError::NoActiveAuction)
        ));
        assert_eq!(sink.count("auction_stopped"), 1);
    }

    #[test]
    fn test_stop_mid_game_does_not_reopen_auction_phase() {
        let (mut state, _) = game();
        state.start_auction_phase().unwrap();
        state.close_round().unwrap();
        state.start_tier_auction(Tier::Two).unwrap();

        state.stop_current_auction().unwrap();
        assert_eq!(state.phase(), Phase::Auction);
        assert!(matches!(
            state.start_auction_phase(),
            Err(GameError::WrongPhase(_))
        ));
        let restarted = state.start_tier_auction(Tier::Two).unwrap();
        assert_eq!(restarted.tier, Tier::Two);
    }

    #[test]
    fn test_final_tier_triggers_scoring_once() {
        let (mut state, sink) = game();
        state.start_tier_auction(Tier::Four).unwrap();
        let lot = animal(Tier::Four, Biome::Forest, 1);
        state.submit_bid(&"A1".into(), lot, 3).unwrap();
        state.request_close().unwrap();
        sink.clear();

        assert_eq!(state.tick(), TickOutcome::CloseRequested);
        assert_eq!(state.phase(), Phase::Scoring);
        assert_eq!(sink.count("scores_ready"), 1);
        let scores = state.scores().cloned().unwrap();
        assert_eq!(scores.len(), 20);

        let coins_before = state.registry().zoo_of(&"A1".into()).unwrap().coins;
        let again = state.start_scoring_phase().unwrap();
        assert_eq!(again, scores);
        assert_eq!(state.registry().zoo_of(&"A1".into()).unwrap().coins, coins_before);
        assert!(matches!(
            state.start_tier_auction(Tier::One),
            Err(GameError::WrongPhase(_))
        ));
    }

    #[test]
    fn test_set_animal_health() {
        let (mut state, _) = game();
        let lot = animal(Tier::One, Biome::Tundra, 2);
        state.set_animal_health(lot, true).unwrap();
        assert!(!state.registry().animal(lot).unwrap().is_healthy());
        let missing = animal(Tier::One, Biome::Tundra, 9);
        assert!(matches!(
            state.set_animal_health(missing, true),
            Err(GameError::AnimalNotFound(_))
        ));
    }

    #[test]
    fn test_set_player_active() {
        let (mut state, _) = game();
        let id = state.join_player("bob").unwrap();
        state.set_player_active(&id, false).unwrap();
        assert!(!state.snapshot().player(&id).unwrap().is_active);

        let err = state.set_player_active(&"ghost".into(), false).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_snapshot_idempotent() {
        let (mut state, _) = game();
        state.start_tier_auction(Tier::Three).unwrap();
        state
            .submit_bid(&"A2".into(), animal(Tier::Three, Biome::Desert, 4), 9)
            .unwrap();
        let a = state.snapshot();
        let b = state.snapshot();
        assert_eq!(a, b);
        assert!(a.auction.active);
        assert_eq!(a.auction.current_animals.len(), 35);
        let view = &a.auction.highest_bids[&animal(Tier::Three, Biome::Desert, 4)];
        assert_eq!(view.amount, 9);
        assert_eq!(view.bidder.as_deref(), Some("A2"));
        let bidder = a.player(&"A2".into()).unwrap();
        assert_eq!(bidder.pending_total, 9);
        assert_eq!(
            bidder.pending_bids.get(&animal(Tier::Three, Biome::Desert, 4)),
            Some(&9)
        );
        assert!(bidder.owned_animals.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.tick_interval_ms = 0;
        let result = GameState::new(config, Arc::new(crate::game::events::NullSink));
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }
}
