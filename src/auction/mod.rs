//! Auction layer - timed tier rounds, bid arbitration and lot resolution

pub mod bid;
pub mod engine;
pub mod outcome;

pub use bid::{Bid, BidLog};
pub use engine::{AuctionEngine, AuctionState, HighestBid, RoundStarted, TickOutcome};
pub use outcome::{BidAccepted, BidRejection, BidResponse, LotResult, RoundResults};
