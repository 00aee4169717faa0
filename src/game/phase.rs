use serde::{Deserialize, Serialize};

/// Lifecycle of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Setup,
    Auction,
    Scoring,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Auction => "auction",
            Phase::Scoring => "scoring",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Scoring
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
