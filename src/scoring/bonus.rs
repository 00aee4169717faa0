//! Tier-1 / Tier-2 synergy bonus
//!
//! A zoo earns a bonus on its Tier-1 and Tier-2 income when it pairs a Tier-1
//! and a Tier-2 animal sharing a native biome:
//! - both away from that native biome: one non-native match, +10% compounding
//! - both in that native biome (the zoo's own): one native match, +5% compounding

use std::collections::BTreeSet;

use crate::core::types::{Biome, Tier};
use crate::entity::{Animal, Zoo};
use crate::scoring::income::compute_animal_income;

/// Pairing counts that feed the bonus rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynergyMatches {
    pub non_native: u32,
    pub native: u32,
}

impl SynergyMatches {
    pub fn bonus_rate(&self) -> f64 {
        let mut rate = 0.0;
        if self.non_native > 0 {
            rate += 1.1_f64.powf(self.non_native as f64) - 1.0;
        }
        if self.native > 0 {
            rate += 1.05_f64.powf(self.native as f64) - 1.0;
        }
        rate
    }
}

pub fn synergy_matches(zoo: &Zoo, housed: &[&Animal]) -> SynergyMatches {
    let mut t1_away = BTreeSet::<Biome>::new();
    let mut t2_away = BTreeSet::<Biome>::new();
    let mut t1_home = BTreeSet::<Biome>::new();
    let mut t2_home = BTreeSet::<Biome>::new();

    for animal in housed {
        let native = animal.native_biome();
        let at_home = native == zoo.biome;
        let set = match (animal.tier, at_home) {
            (Tier::One, false) => &mut t1_away,
            (Tier::Two, false) => &mut t2_away,
            (Tier::One, true) => &mut t1_home,
            (Tier::Two, true) => &mut t2_home,
            _ => continue,
        };
        set.insert(native);
    }

    SynergyMatches {
        non_native: t1_away.intersection(&t2_away).count() as u32,
        native: t1_home.intersection(&t2_home).count() as u32,
    }
}

/// Bonus coins earned on top of the Tier-1/Tier-2 audience income
pub fn compute_bonus(zoo: &Zoo, housed: &[&Animal]) -> f64 {
    let rate = synergy_matches(zoo, housed).bonus_rate();
    if rate == 0.0 {
        return 0.0;
    }
    let income: f64 = housed
        .iter()
        .filter(|a| matches!(a.tier, Tier::One | Tier::Two))
        .map(|a| compute_animal_income(a, zoo))
        .sum();
    income * rate
}
