//! Score and health economy

use rand::Rng;

use crate::consts::SCORE_DIVISOR;
use crate::tuning::RestoreTuning;

/// Points for destroying an obstacle with a shot that covered `distance_units`.
/// Every hit is worth at least one point.
pub fn score_for_hit(distance_units: u64) -> u64 {
    (distance_units / SCORE_DIVISOR).max(1)
}

/// Roll the restoration ladder for one hit and return the health gained.
///
/// Rolls happen in a fixed order and do not exclude each other, so a single
/// hit can trigger several of them. Additive restores are not clamped to
/// `max_health`; the gates only look at health before each roll pays out.
pub fn roll_health_restore(
    health: &mut f32,
    max_health: f32,
    ladder: &RestoreTuning,
    rng: &mut impl Rng,
) -> f32 {
    let before = *health;

    if rng.random::<f32>() < ladder.full_chance {
        *health = max_health;
    }

    if rng.random::<f32>() < ladder.half_chance && *health <= max_health * 0.5 {
        *health += max_health * ladder.half_amount;
    }

    if rng.random::<f32>() < ladder.small_chance && *health < max_health {
        *health += max_health * ladder.small_amount;
    }

    for &(chance, amount) in &ladder.tiers {
        if rng.random::<f32>() < chance && *health < max_health {
            *health += max_health * amount;
        }
    }

    *health - before
}
