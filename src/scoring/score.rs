//! Final zoo score
//!
//! score = |log2(A)|^(n - 0.5) x zoo multiplier, where
//! - A is the zoo's coins plus net income (income - maintenance) of every animal
//! - n is the number of established biomes (2+ animals from it) plus one for
//!   the zoo's own biome
//!
//! A zoo whose A is zero or negative scores 0.

use std::collections::BTreeMap;

use crate::core::types::Biome;
use crate::entity::{Animal, Zoo};
use crate::scoring::income::{compute_animal_income, compute_animal_maintenance};

/// Breakdown of one zoo's final score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub net_income: f64,
    pub final_amount: f64,
    pub established_biomes: u32,
    pub score: f64,
}

/// Sum of income minus maintenance over every housed animal
pub fn net_income(zoo: &Zoo, housed: &[&Animal]) -> f64 {
    housed
        .iter()
        .map(|a| compute_animal_income(a, zoo) - compute_animal_maintenance(a, zoo))
        .sum()
}

/// Home biomes represented by at least two housed animals
pub fn established_biomes(housed: &[&Animal]) -> u32 {
    let mut counts = BTreeMap::<Biome, u32>::new();
    for animal in housed {
        *counts.entry(animal.biome).or_default() += 1;
    }
    counts.values().filter(|&&c| c >= 2).count() as u32
}

pub fn score_breakdown(zoo: &Zoo, housed: &[&Animal]) -> ScoreBreakdown {
    let net_income = net_income(zoo, housed);
    let final_amount = zoo.coins as f64 + net_income;
    let established_biomes = established_biomes(housed);

    let score = if final_amount <= 0.0 {
        0.0
    } else {
        let n = established_biomes as f64 + 1.0;
        final_amount.log2().abs().powf(n - 0.5) * zoo.multiplier
    };

    ScoreBreakdown {
        net_income,
        final_amount,
        established_biomes,
        score,
    }
}

/// Final score of a zoo. Coins must already include the synergy bonus.
pub fn compute_final_score(zoo: &Zoo, housed: &[&Animal]) -> f64 {
    score_breakdown(zoo, housed).score
}
