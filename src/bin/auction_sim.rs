//! Auction Simulation
//! Seeded AI bidders play all four tiers against an accelerated countdown

use fauna_fantastico::core::config::GameConfig;
use fauna_fantastico::core::error::Result;
use fauna_fantastico::core::types::{PlayerId, Tier};
use fauna_fantastico::game::{GameHandle, GameState, NullSink};
use fauna_fantastico::scoring::leaderboard;
use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Auction Simulation - AI zoos bid through every tier, then get scored
#[derive(Parser, Debug)]
#[command(name = "auction_sim")]
#[command(about = "Run a headless zoo auction with seeded AI bidders")]
struct Args {
    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Countdown tick length in milliseconds
    #[arg(long, default_value_t = 5)]
    tick_ms: u64,

    /// Round length in ticks for every tier (defaults to the configured durations)
    #[arg(long)]
    round_ticks: Option<u32>,

    /// Number of AI players
    #[arg(long, default_value_t = 25)]
    players: usize,

    /// Chance that an AI player bids during a bidding wave
    #[arg(long, default_value_t = 0.3)]
    aggression: f64,

    /// TOML config to start from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final game snapshot as JSON here
    #[arg(long)]
    output: Option<PathBuf>,

    /// How many leaderboard entries to print
    #[arg(long, default_value_t = 10)]
    top: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fauna_fantastico=warn".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.ai_players = args.players;
    config.tick_interval_ms = args.tick_ms;
    if let Some(ticks) = args.round_ticks {
        config.tier_durations_secs = [ticks; 4];
    }

    println!("Starting Zoo Auction Simulation");
    println!("===============================");
    println!("Seed: {}", args.seed);
    println!("AI players: {}", config.ai_players);
    println!("Tick: {}ms", config.tick_interval_ms);
    println!();

    let game = GameHandle::new(GameState::new(config, Arc::new(NullSink))?);
    game.initialize();

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let tick = Duration::from_millis(args.tick_ms);
    let start = Instant::now();

    for tier in Tier::ALL {
        let round = game.start_tier_auction(tier)?;
        println!(
            "Tier {}: {} lots over {} ticks",
            tier,
            round.animals.len(),
            round.duration_secs
        );

        let mut accepted = 0usize;
        let mut rejected = 0usize;
        while game.lock().engine().is_running() {
            let (a, r) = bidding_wave(&game, &mut rng, args.aggression);
            accepted += a;
            rejected += r;
            tokio::time::sleep(tick).await;
        }
        game.wait_for_round().await;

        let state = game.lock();
        let sold = state
            .round_results(tier)
            .map(|r| r.sold().count())
            .unwrap_or(0);
        println!(
            "  {} bids accepted, {} rejected, {} animals sold",
            accepted, rejected, sold
        );
    }

    let elapsed = start.elapsed();
    println!("\nSimulated auction in {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    let snapshot = game.snapshot();
    if let Some(scores) = &snapshot.scores {
        println!("\n--- Leaderboard ---");
        for (rank, (id, score)) in leaderboard(scores).iter().take(args.top).enumerate() {
            let player = snapshot.player(id);
            let coins = player
                .and_then(|p| p.zoo.as_ref())
                .map(|z| z.coins)
                .unwrap_or(0);
            let animals = player.map(|p| p.animals.len()).unwrap_or(0);
            println!(
                "{:>3}. {:<6} score {:>10.3}  coins {:>4}  animals {:>2}",
                rank + 1,
                id.as_str(),
                score,
                coins,
                animals
            );
        }
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)?;
        println!("\nFinal state written to {}", path.display());
    }

    Ok(())
}

/// Let every AI player consider one bid. Returns (accepted, rejected).
fn bidding_wave(game: &GameHandle, rng: &mut ChaCha8Rng, aggression: f64) -> (usize, usize) {
    let mut state = game.lock();
    if !state.engine().is_running() {
        return (0, 0);
    }

    let lots = state.engine().eligible().to_vec();
    let players: Vec<PlayerId> = state
        .registry()
        .players()
        .iter()
        .filter(|p| p.zoo.is_some())
        .map(|p| p.id.clone())
        .collect();

    let mut accepted = 0;
    let mut rejected = 0;
    for player in players {
        if !rng.gen_bool(aggression.clamp(0.0, 1.0)) {
            continue;
        }
        let Some(&lot) = lots.choose(rng) else {
            break;
        };
        let Some(minimum) = state.engine().minimum_bid(lot) else {
            continue;
        };
        // Each bidder values the lot somewhere between base price and a few times it
        let ceiling = (f64::from(lot.tier.base_price()) * rng.gen_range(1.0..3.0)) as u32;
        if minimum > ceiling {
            continue;
        }
        match state.submit_bid(&player, lot, minimum) {
            Ok(_) => accepted += 1,
            Err(_) => rejected += 1,
        }
    }
    (accepted, rejected)
}
