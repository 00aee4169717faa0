use thiserror::Error;

use crate::core::types::{AnimalId, PlayerId, ZooId};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid tier: {0} (expected 1-4)")]
    InvalidTier(i64),

    #[error("Invalid animal id: {0}")]
    InvalidAnimalId(String),

    #[error("Invalid zoo id: {0}")]
    InvalidZooId(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Action not allowed during the {0} phase")]
    WrongPhase(String),

    #[error("An auction is already running")]
    AuctionAlreadyRunning,

    #[error("No auction is currently running")]
    NoActiveAuction,

    #[error("No zoos are available")]
    NoZoosAvailable,

    #[error("Player already exists: {0}")]
    PlayerExists(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Animal not found: {0}")]
    AnimalNotFound(AnimalId),

    #[error("Zoo not found: {0}")]
    ZooNotFound(ZooId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl GameError {
    /// Integrity errors: the request named something that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GameError::PlayerNotFound(_) | GameError::AnimalNotFound(_) | GameError::ZooNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
