//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::GameError;

/// Unique identifier for one game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

/// Animal value class (1 = scarcest and most valuable, 4 = commonest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Tier {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::One, Tier::Two, Tier::Three, Tier::Four];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based index into per-tier tables
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Opening price of an auction lot when nobody has bid yet
    pub fn base_price(self) -> u32 {
        match self {
            Tier::One => 30,
            Tier::Two => 20,
            Tier::Three => 7,
            Tier::Four => 3,
        }
    }

    /// Audience income indexed by preference rank (0 = best fit, 4 = native)
    pub fn audience_income(self) -> [f64; 5] {
        match self {
            Tier::One => [30.0, 26.0, 24.0, 22.0, 20.0],
            Tier::Two => [20.0, 19.0, 18.0, 17.0, 16.0],
            Tier::Three => [7.0, 6.0, 5.0, 4.0, 3.0],
            Tier::Four => [5.0, 4.0, 3.0, 2.0, 1.0],
        }
    }

    /// Maintenance cost indexed by preference rank
    pub fn maintenance_cost(self) -> [f64; 5] {
        match self {
            Tier::One => [12.0, 10.0, 9.0, 7.0, 6.0],
            Tier::Two => [8.0, 6.0, 5.0, 4.0, 3.0],
            Tier::Three => [3.0, 2.5, 2.0, 1.5, 1.0],
            Tier::Four => [1.0, 1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Maximum animals of this tier one zoo may house (and one player may lead)
    ///
    /// `None` means unlimited.
    pub fn zoo_limit(self) -> Option<usize> {
        match self {
            Tier::One | Tier::Two => Some(2),
            Tier::Three => Some(3),
            Tier::Four => None,
        }
    }

    /// Whether `count` animals of this tier already fill the per-zoo limit
    pub fn limit_reached(self, count: usize) -> bool {
        self.zoo_limit().is_some_and(|limit| count >= limit)
    }

    pub fn is_final(self) -> bool {
        self == Tier::Four
    }
}

impl TryFrom<u8> for Tier {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            3 => Ok(Tier::Three),
            4 => Ok(Tier::Four),
            other => Err(GameError::InvalidTier(other as i64)),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.number()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Habitat type shared by zoos and animals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Biome {
    Forest = 1,
    Tundra = 2,
    Ocean = 3,
    Desert = 4,
    Wetland = 5,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Forest,
        Biome::Tundra,
        Biome::Ocean,
        Biome::Desert,
        Biome::Wetland,
    ];

    /// One-based index used in zoo and animal identities
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get((n as usize).checked_sub(1)?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Forest => "forest",
            Biome::Tundra => "tundra",
            Biome::Ocean => "ocean",
            Biome::Desert => "desert",
            Biome::Wetland => "wetland",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Biome::Forest => "Forest",
            Biome::Tundra => "Tundra",
            Biome::Ocean => "Ocean",
            Biome::Desert => "Desert",
            Biome::Wetland => "Wetland",
        }
    }

    /// Ranked habitats for animals from this biome, most favourable first.
    ///
    /// The last entry is the animal's native biome.
    pub fn preference_order(self) -> [Biome; 5] {
        use Biome::*;
        match self {
            Forest => [Ocean, Desert, Wetland, Tundra, Forest],
            Tundra => [Wetland, Forest, Ocean, Desert, Tundra],
            Ocean => [Desert, Tundra, Forest, Wetland, Ocean],
            Desert => [Forest, Ocean, Tundra, Desert, Wetland],
            Wetland => [Tundra, Wetland, Desert, Forest, Ocean],
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the five continents of the shared map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    A,
    B,
    C,
    D,
    E,
}

impl Continent {
    pub const ALL: [Continent; 5] = [
        Continent::A,
        Continent::B,
        Continent::C,
        Continent::D,
        Continent::E,
    ];

    pub fn letter(self) -> char {
        match self {
            Continent::A => 'A',
            Continent::B => 'B',
            Continent::C => 'C',
            Continent::D => 'D',
            Continent::E => 'E',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|continent| continent.letter() == c)
    }

    /// Prevailing climate of the continent
    pub fn climate(self) -> Biome {
        match self {
            Continent::A => Biome::Tundra,
            Continent::B => Biome::Wetland,
            Continent::C => Biome::Ocean,
            Continent::D => Biome::Forest,
            Continent::E => Biome::Desert,
        }
    }

    /// Score multiplier for a zoo of `biome` on this continent (1.1 to 1.25)
    pub fn multiplier(self, biome: Biome) -> f64 {
        let row = match self {
            Continent::A => [1.1, 1.25, 1.2, 1.2, 1.1],
            Continent::B => [1.2, 1.2, 1.1, 1.1, 1.25],
            Continent::C => [1.1, 1.1, 1.25, 1.2, 1.2],
            Continent::D => [1.25, 1.2, 1.2, 1.1, 1.1],
            Continent::E => [1.2, 1.1, 1.1, 1.25, 1.2],
        };
        row[biome.number() as usize - 1]
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Zoo identity such as `A1` (continent letter + biome number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZooId {
    pub continent: Continent,
    pub biome: Biome,
}

impl ZooId {
    pub fn new(continent: Continent, biome: Biome) -> Self {
        Self { continent, biome }
    }
}

impl fmt::Display for ZooId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.continent.letter(), self.biome.number())
    }
}

impl FromStr for ZooId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let continent = chars.next().and_then(Continent::from_letter);
        let biome = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| Biome::from_number(d as u8));
        match (continent, biome, chars.next()) {
            (Some(continent), Some(biome), None) => Ok(Self { continent, biome }),
            _ => Err(GameError::InvalidZooId(s.to_string())),
        }
    }
}

impl TryFrom<String> for ZooId {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ZooId> for String {
    fn from(id: ZooId) -> String {
        id.to_string()
    }
}

/// Animal identity such as `1101`: tier digit, biome digit, two-digit serial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnimalId {
    pub tier: Tier,
    pub biome: Biome,
    pub serial: u8,
}

impl AnimalId {
    pub fn new(tier: Tier, biome: Biome, serial: u8) -> Self {
        Self { tier, biome, serial }
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:02}", self.tier.number(), self.biome.number(), self.serial)
    }
}

impl FromStr for AnimalId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidAnimalId(s.to_string());
        // Exactly "TBSS": tier digit, biome digit, two-digit serial
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let digit = |i: usize| bytes[i] - b'0';
        let tier = Tier::try_from(digit(0)).map_err(|_| invalid())?;
        let biome = Biome::from_number(digit(1)).ok_or_else(invalid)?;
        let serial = digit(2) * 10 + digit(3);
        Ok(Self { tier, biome, serial })
    }
}

impl TryFrom<String> for AnimalId {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnimalId> for String {
    fn from(id: AnimalId) -> String {
        id.to_string()
    }
}

/// Player identity (AI players reuse their zoo id, humans get `player_N`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
