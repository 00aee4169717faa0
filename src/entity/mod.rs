//! Entities - zoos, animals and players, plus the registry that owns them

pub mod animal;
pub mod player;
pub mod registry;
pub mod zoo;

pub use animal::Animal;
pub use player::Player;
pub use registry::Registry;
pub use zoo::Zoo;
