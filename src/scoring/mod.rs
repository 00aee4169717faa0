//! Scoring - income, maintenance, synergy bonus and final score

pub mod bonus;
pub mod income;
pub mod score;

use std::collections::BTreeMap;

use crate::core::types::PlayerId;
use crate::entity::{Animal, Registry, Zoo};

pub use bonus::{compute_bonus, synergy_matches, SynergyMatches};
pub use income::{compute_animal_income, compute_animal_maintenance};
pub use score::{compute_final_score, score_breakdown, ScoreBreakdown};

/// The animals housed in `zoo`, looked up in the registry
pub fn housed_animals<'a>(zoo: &Zoo, registry: &'a Registry) -> Vec<&'a Animal> {
    zoo.animals
        .iter()
        .filter_map(|id| registry.animal(*id))
        .collect()
}

/// Players ordered by descending score, ties broken by player id
pub fn leaderboard(scores: &BTreeMap<PlayerId, f64>) -> Vec<(PlayerId, f64)> {
    let mut ranked: Vec<(PlayerId, f64)> =
        scores.iter().map(|(id, s)| (id.clone(), *s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
