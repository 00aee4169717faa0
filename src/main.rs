//! Fauna Fantastico - Admin Console
//!
//! Runs one game in-process and lets an administrator drive it from stdin:
//! seat players, open and stop tier rounds, bid on behalf of players and
//! inspect the state. Round countdowns run on the tokio runtime in the
//! background while the console waits for input.

use fauna_fantastico::core::config::GameConfig;
use fauna_fantastico::core::error::Result;
use fauna_fantastico::core::types::{AnimalId, PlayerId, Tier};
use fauna_fantastico::game::{ChannelSink, GameEvent, GameHandle, GameState};
use fauna_fantastico::scoring::leaderboard;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fauna_fantastico=info".into()),
        )
        .init();

    tracing::info!("Fauna Fantastico starting...");

    let rt = Runtime::new()?;
    let _guard = rt.enter();

    // Optional config path as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path))?,
        None => GameConfig::default(),
    };

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let game = GameHandle::new(GameState::new(config, Arc::new(ChannelSink::new(tx)))?);
    rt.spawn(print_events(rx));
    game.initialize();

    println!("\n=== FAUNA FANTASTICO ===");
    println!("Zoo auction admin console");
    println!();
    println!("Commands:");
    println!("  init                      - Start a fresh game");
    println!("  join <name>               - Seat a human player");
    println!("  start [tier]              - Open a tier round (auction phase from setup)");
    println!("  stop                      - Void the running round");
    println!("  close                     - Close the running round at the next tick");
    println!("  bid <player> <animal> <n> - Bid on behalf of a player");
    println!("  sick <animal> [off]       - Mark an animal unhealthy (or healthy)");
    println!("  state / s                 - Show game state");
    println!("  scores                    - Show the leaderboard");
    println!("  quit / q                  - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            continue;
        };

        match command {
            "quit" | "q" => break,
            "init" => {
                let snapshot = game.initialize();
                println!(
                    "New game {} with {} players.",
                    snapshot.game_id.0,
                    snapshot.players.len()
                );
            }
            "join" => match args.first() {
                Some(name) => match game.join_player(name) {
                    Ok(id) => println!("{} joined as {}.", name, id),
                    Err(e) => println!("Join failed: {}", e),
                },
                None => println!("Usage: join <name>"),
            },
            "start" => {
                let result = match args.first() {
                    Some(raw) => match raw.parse::<u8>().map(Tier::try_from) {
                        Ok(Ok(tier)) => game.start_tier_auction(tier),
                        _ => {
                            println!("Usage: start [1-4]");
                            continue;
                        }
                    },
                    None => game.start_auction_phase(),
                };
                match result {
                    Ok(round) => println!(
                        "Tier {} round open: {} animals, {}s.",
                        round.tier,
                        round.animals.len(),
                        round.duration_secs
                    ),
                    Err(e) => println!("Start failed: {}", e),
                }
            }
            "stop" => {
                if let Err(e) = game.stop_current_auction() {
                    println!("Stop failed: {}", e);
                }
            }
            "close" => match game.request_close() {
                Ok(()) => println!("Round will close at the next tick."),
                Err(e) => println!("Close failed: {}", e),
            },
            "bid" => handle_bid(&game, args),
            "sick" => handle_sick(&game, args),
            "state" | "s" => display_state(&game),
            "scores" => display_scores(&game),
            _ => println!("Unknown command: {}", command),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn handle_bid(game: &GameHandle, args: &[&str]) {
    let [player, animal, amount] = args else {
        println!("Usage: bid <player> <animal> <amount>");
        return;
    };
    let animal: AnimalId = match animal.parse() {
        Ok(id) => id,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    let Ok(amount) = amount.parse::<u32>() else {
        println!("Amount must be a whole number");
        return;
    };

    match game.submit_bid(&PlayerId::new(*player), animal, amount) {
        Ok(accepted) => println!(
            "Bid accepted: {} now at {} ({} bids)",
            accepted.animal_id, accepted.highest_bid, accepted.bid_count
        ),
        Err(rejection) => println!("Bid rejected: {}", rejection),
    }
}

fn handle_sick(game: &GameHandle, args: &[&str]) {
    let Some(raw) = args.first() else {
        println!("Usage: sick <animal> [off]");
        return;
    };
    let unhealthy = args.get(1) != Some(&"off");
    let result = raw
        .parse::<AnimalId>()
        .and_then(|id| game.set_animal_health(id, unhealthy));
    if let Err(e) = result {
        println!("{}", e);
    }
}

fn display_state(game: &GameHandle) {
    let snapshot = game.snapshot();
    println!("\n--- Game {} ({}) ---", snapshot.game_id.0, snapshot.phase);
    if snapshot.auction.active {
        println!(
            "Tier {} round: {}s left, {} lots",
            snapshot
                .auction
                .current_tier
                .map(|t| t.to_string())
                .unwrap_or_default(),
            snapshot.auction.time_remaining,
            snapshot.auction.current_animals.len()
        );
        for (id, bid) in &snapshot.auction.highest_bids {
            if let Some(bidder) = &bid.bidder {
                println!("  {} -> {} by {}", id, bid.amount, bidder);
            }
        }
    }
    println!("Players:");
    for player in &snapshot.players {
        let zoo = player
            .zoo
            .as_ref()
            .map(|z| format!("{} ({} coins)", z.id, z.coins))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<12} {:<12} money {:>4} pending {:>4} zoo {} animals {}",
            player.id.as_str(),
            player.name,
            player.money,
            player.pending_total,
            zoo,
            player.animals.len()
        );
    }
    println!("Available zoos: {}", snapshot.available_zoos.len());
    println!();
}

fn display_scores(game: &GameHandle) {
    let Some(scores) = game.scores() else {
        println!("No scores yet.");
        return;
    };
    let snapshot = game.snapshot();
    println!("\n--- Leaderboard ---");
    for (rank, (id, score)) in leaderboard(&scores).iter().enumerate() {
        let name = snapshot
            .player(id)
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown");
        println!("{:>3}. {:<12} {:>10.3}", rank + 1, name, score);
    }
    println!();
}

/// Print the notifications an administrator cares about
async fn print_events(mut rx: UnboundedReceiver<GameEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            GameEvent::AuctionRoundStart { tier, duration, .. } => {
                println!("\n[round] Tier {} open for {}s", tier, duration);
            }
            GameEvent::AuctionTimerUpdate {
                tier,
                time_remaining,
            } if time_remaining % 30 == 0 || time_remaining <= 5 => {
                println!("\n[timer] Tier {}: {}s left", tier, time_remaining);
            }
            GameEvent::AuctionRoundEnd(results) => {
                println!(
                    "\n[round] Tier {} closed, {} sold",
                    results.tier,
                    results.sold().count()
                );
                for lot in results.sold() {
                    println!(
                        "  {} -> {} for {}",
                        lot.animal_name,
                        lot.winner.as_deref().unwrap_or("Unknown"),
                        lot.winning_bid
                    );
                }
            }
            GameEvent::AuctionStopped { message } => println!("\n[round] {}", message),
            GameEvent::ScoresReady { scores } => {
                println!("\n[scores] {} zoos scored; type 'scores'", scores.len());
            }
            _ => {}
        }
    }
}
