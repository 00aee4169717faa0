//! Fauna Fantastico - Zoo Auction Game Engine
//!
//! Players run zoos on a shared map, bid in timed tier rounds for animals and
//! are scored on income, placement and biome diversity once the last tier closes.

pub mod auction;
pub mod catalog;
pub mod core;
pub mod entity;
pub mod game;
pub mod scoring;
