//! Integration tests for scoring
//!
//! Covers the standalone formulas on hand-built zoos and the full pipeline:
//! animals bought at auction, Tier 4 closing, synergy bonus paid into coins,
//! final scores published.

use std::sync::Arc;

use fauna_fantastico::core::config::GameConfig;
use fauna_fantastico::core::types::{AnimalId, Biome, PlayerId, Tier};
use fauna_fantastico::entity::{Animal, Zoo};
use fauna_fantastico::game::{GameEvent, GameState, Phase, RecordingSink};
use fauna_fantastico::scoring::{
    compute_animal_income, compute_animal_maintenance, compute_bonus, compute_final_score,
    leaderboard, score_breakdown,
};

fn animal(tier: Tier, biome: Biome, serial: u8) -> Animal {
    Animal::new(AnimalId::new(tier, biome, serial), "Test".into())
}

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Formula scenarios
// ============================================================================

#[test]
fn test_empty_broke_zoo_scores_zero() {
    let zoo = Zoo::new("C4".parse().unwrap(), 0);
    assert_eq!(zoo.multiplier, 1.2);
    let breakdown = score_breakdown(&zoo, &[]);
    assert_eq!(breakdown.final_amount, 0.0);
    assert_eq!(breakdown.score, 0.0);
}

#[test]
fn test_negative_coins_and_income_score_zero() {
    // Unhealthy Tier-1 animals off their native biome cost more than they earn
    let zoo = Zoo::new("A3".parse().unwrap(), -10);
    let mut a = animal(Tier::One, Biome::Forest, 1);
    let mut b = animal(Tier::One, Biome::Tundra, 1);
    a.set_unhealthy(true);
    b.set_unhealthy(true);
    let housed = [&a, &b];

    let net: f64 = housed
        .iter()
        .map(|x| compute_animal_income(x, &zoo) - compute_animal_maintenance(x, &zoo))
        .sum();
    assert!(net < 0.0);

    let breakdown = score_breakdown(&zoo, &housed);
    assert!(breakdown.final_amount < 0.0);
    assert_eq!(compute_final_score(&zoo, &housed), 0.0);
}

#[test]
fn test_established_biomes_raise_exponent() {
    let zoo = Zoo::new("D1".parse().unwrap(), 100);
    let t4a = animal(Tier::Four, Biome::Desert, 1);
    let t4b = animal(Tier::Four, Biome::Desert, 2);
    let t4c = animal(Tier::Four, Biome::Ocean, 1);

    let single = score_breakdown(&zoo, &[&t4a, &t4c]);
    let pair = score_breakdown(&zoo, &[&t4a, &t4b]);
    assert_eq!(single.established_biomes, 0);
    assert_eq!(pair.established_biomes, 1);

    let expected = pair.final_amount.log2().abs().powf(1.5) * zoo.multiplier;
    assert!(close_enough(pair.score, expected));
    assert!(pair.score > single.score);
}

// ============================================================================
// Full game
// ============================================================================

#[test]
fn test_full_game_applies_truncated_bonus_and_scores() {
    let sink = Arc::new(RecordingSink::new());
    let mut game = GameState::new(GameConfig::default(), sink.clone()).unwrap();
    game.initialize();
    let buyer = PlayerId::from("A1");
    let t1 = AnimalId::new(Tier::One, Biome::Ocean, 1);
    let t2 = AnimalId::new(Tier::Two, Biome::Ocean, 1);

    game.start_auction_phase().unwrap();
    game.submit_bid(&buyer, t1, 30).unwrap();
    game.close_round().unwrap();
    game.start_tier_auction(Tier::Two).unwrap();
    game.submit_bid(&buyer, t2, 20).unwrap();
    game.close_round().unwrap();
    game.start_tier_auction(Tier::Three).unwrap();
    game.close_round().unwrap();
    assert_eq!(game.phase(), Phase::Auction);

    // Bonus as it stands before scoring: ocean pair housed in a forest zoo
    let expected_bonus = {
        let registry = game.registry();
        let zoo = registry.zoo_of(&buyer).unwrap();
        let housed: Vec<&Animal> = zoo.animals.iter().filter_map(|id| registry.animal(*id)).collect();
        compute_bonus(zoo, &housed)
    };
    // 10% on 24 x 1.4 x 1.1 + 18 x 1.1
    assert!(close_enough(expected_bonus, 0.1 * (36.96 + 19.8)));

    sink.clear();
    game.start_tier_auction(Tier::Four).unwrap();
    game.close_round().unwrap();
    assert_eq!(game.phase(), Phase::Scoring);

    let zoo = game.registry().zoo_of(&buyer).unwrap();
    assert_eq!(zoo.coins, 105);
    assert_eq!(game.registry().player(&buyer).unwrap().money, 50);

    let scores = game.scores().unwrap().clone();
    assert_eq!(scores.len(), 20);
    let final_amount: f64 = 105.0 + (36.96 - 9.0) + (19.8 - 5.0);
    let expected = final_amount.log2().abs().powf(1.5) * 1.1;
    assert!((scores[&buyer] - expected).abs() < 1e-6);

    // A zoo with nothing but its starting coins
    let idle = PlayerId::from("A2");
    let idle_expected = 100f64.log2().powf(0.5) * 1.25;
    assert!(close_enough(scores[&idle], idle_expected));

    assert_eq!(leaderboard(&scores)[0].0, buyer);

    let ready: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ScoresReady { scores } => Some(scores),
            _ => None,
        })
        .collect();
    assert_eq!(ready, vec![scores.clone()]);
    assert_eq!(game.snapshot().scores, Some(scores));
}

#[test]
fn test_sick_animal_lowers_score() {
    let mut healthy_game = GameState::new(GameConfig::default(), Arc::new(RecordingSink::new())).unwrap();
    let mut sick_game = GameState::new(GameConfig::default(), Arc::new(RecordingSink::new())).unwrap();
    let buyer = PlayerId::from("B2");
    let t1 = AnimalId::new(Tier::One, Biome::Desert, 2);

    for game in [&mut healthy_game, &mut sick_game] {
        game.initialize();
        game.start_tier_auction(Tier::One).unwrap();
        game.submit_bid(&buyer, t1, 40).unwrap();
        game.close_round().unwrap();
    }
    sick_game.set_animal_health(t1, true).unwrap();

    for game in [&mut healthy_game, &mut sick_game] {
        game.start_tier_auction(Tier::Four).unwrap();
        game.close_round().unwrap();
    }

    let healthy = healthy_game.scores().unwrap()[&buyer];
    let sick = sick_game.scores().unwrap()[&buyer];
    assert!(sick < healthy);
}
