//! Integration tests for the round countdown
//!
//! Run on a paused tokio clock so whole rounds pass instantly while keeping
//! the one-tick-per-interval behaviour of the background task.

use std::sync::Arc;
use std::time::Duration;

use fauna_fantastico::core::config::GameConfig;
use fauna_fantastico::core::types::{AnimalId, Biome, PlayerId, Tier};
use fauna_fantastico::game::{ChannelSink, GameEvent, GameHandle, GameState, Phase, RecordingSink};

fn short_config(secs: u32) -> GameConfig {
    GameConfig {
        tier_durations_secs: [secs; 4],
        ..GameConfig::default()
    }
}

fn new_handle(config: GameConfig) -> (GameHandle, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let handle = GameHandle::new(GameState::new(config, sink.clone()).unwrap());
    handle.initialize();
    sink.clear();
    (handle, sink)
}

fn timer_values(sink: &RecordingSink) -> Vec<u32> {
    sink.events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::AuctionTimerUpdate { time_remaining, .. } => Some(time_remaining),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_round_closes_when_countdown_expires() {
    let (game, sink) = new_handle(short_config(3));
    game.start_tier_auction(Tier::Two).unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(game.lock().engine().is_running());
    assert_eq!(timer_values(&sink), vec![2, 1]);

    game.wait_for_round().await;
    assert!(!game.lock().engine().is_running());
    assert_eq!(timer_values(&sink), vec![2, 1, 0]);
    assert_eq!(sink.count("auction_round_end"), 1);
    assert_eq!(game.lock().auction_results().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_bids_and_ticks_interleave() {
    let (game, sink) = new_handle(short_config(5));
    let animal = AnimalId::new(Tier::Three, Biome::Wetland, 3);
    game.start_tier_auction(Tier::Three).unwrap();

    game.submit_bid(&PlayerId::from("A1"), animal, 7).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    game.submit_bid(&PlayerId::from("A2"), animal, 9).unwrap();
    game.wait_for_round().await;

    let names = sink.names();
    let bid_positions: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, n)| **n == "bid_update")
        .map(|(i, _)| i)
        .collect();
    let first_tick = names.iter().position(|n| *n == "auction_timer_update").unwrap();
    assert!(bid_positions[0] < first_tick);
    assert!(bid_positions[1] > first_tick);

    let state = game.lock();
    let record = state.registry().animal(animal).unwrap();
    assert_eq!(record.owner, Some(PlayerId::from("A2")));
    assert_eq!(state.registry().player(&PlayerId::from("A2")).unwrap().money, 91);
}

#[tokio::test(start_paused = true)]
async fn test_admin_stop_retires_countdown() {
    let (game, sink) = new_handle(short_config(10));
    game.start_tier_auction(Tier::One).unwrap();
    game.submit_bid(&PlayerId::from("C1"), AnimalId::new(Tier::One, Biome::Forest, 2), 35)
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    game.stop_current_auction().unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(timer_values(&sink), vec![9]);
    assert_eq!(sink.count("auction_stopped"), 1);
    assert_eq!(sink.count("auction_round_end"), 0);

    let state = game.lock();
    assert_eq!(state.phase(), Phase::Auction);
    assert!(state.registry().animals().iter().all(|a| a.owner.is_none()));
    assert!(state.registry().players().iter().all(|p| p.pending_bids.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn test_request_close_resolves_at_next_tick() {
    let (game, sink) = new_handle(short_config(120));
    let animal = AnimalId::new(Tier::Four, Biome::Forest, 7);
    game.start_tier_auction(Tier::One).unwrap();
    game.stop_current_auction().unwrap();
    game.start_tier_auction(Tier::Four).unwrap();
    game.submit_bid(&PlayerId::from("D2"), animal, 3).unwrap();

    game.request_close().unwrap();
    assert!(game.lock().engine().is_running());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let state = game.lock();
    assert!(!state.engine().is_running());
    assert_eq!(state.registry().animal(animal).unwrap().owner, Some(PlayerId::from("D2")));
    // Tier 4 was the last tier
    assert_eq!(state.phase(), Phase::Scoring);
    assert!(state.scores().is_some());
    assert!(timer_values(&sink).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stale_countdown_does_not_tick_new_round() {
    let (game, _) = new_handle(short_config(10));
    game.start_tier_auction(Tier::One).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    game.stop_current_auction().unwrap();
    game.start_tier_auction(Tier::Two).unwrap();

    // Old countdown wakes at 1.0s and retires; the new one ticks at 1.5s
    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(game.lock().engine().remaining_secs(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_channel_sink_relays_round() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let game = GameHandle::new(
        GameState::new(short_config(2), Arc::new(ChannelSink::new(tx))).unwrap(),
    );
    game.initialize();
    game.start_auction_phase().unwrap();
    game.wait_for_round().await;

    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        names.push(event.name());
    }
    assert_eq!(
        names,
        [
            "game_state_update",
            "auction_round_start",
            "game_state_update",
            "auction_timer_update",
            "auction_timer_update",
            "auction_round_end",
            "game_state_update",
        ]
    );
}
