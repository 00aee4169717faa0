//! Per-animal audience income and maintenance cost

use crate::core::types::Tier;
use crate::entity::{Animal, Zoo};

/// Income multiplier for unhealthy animals (tiers 3 and 4 are unaffected)
fn health_factor(animal: &Animal) -> f64 {
    match (animal.unhealthy, animal.tier) {
        (true, Tier::One) => 0.75,
        (true, Tier::Two) => 0.8,
        _ => 1.0,
    }
}

/// Tier-1 animals draw extra crowds, more so away from their native biome
fn placement_factor(animal: &Animal, zoo: &Zoo) -> f64 {
    match animal.tier {
        Tier::One if animal.is_native_to(zoo.biome) => 1.2,
        Tier::One => 1.4,
        _ => 1.0,
    }
}

/// Audience income `animal` earns when housed in `zoo`
pub fn compute_animal_income(animal: &Animal, zoo: &Zoo) -> f64 {
    let rank = animal.preference_rank(zoo.biome);
    let base = animal.audience_income[rank];
    // Multipliers combine before scaling the base; scores depend on this rounding
    let multipliers = placement_factor(animal, zoo) * zoo.multiplier;
    base * multipliers * health_factor(animal)
}

/// Upkeep `animal` costs when housed in `zoo`
pub fn compute_animal_maintenance(animal: &Animal, zoo: &Zoo) -> f64 {
    let rank = animal.preference_rank(zoo.biome);
    let cost = animal.maintenance_cost[rank];
    match (animal.unhealthy, animal.tier) {
        (true, Tier::One) if animal.is_native_to(zoo.biome) => cost * 2.0,
        (true, Tier::One) => cost * 4.0,
        (true, Tier::Two) => cost * 2.0,
        _ => cost,
    }
}
