//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON blob can retune the game
//! without a rebuild. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Particle burst spawned on a projectile hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstTuning {
    pub count: usize,
    pub radius: f32,
    pub speed: f32,
}

impl Default for BurstTuning {
    fn default() -> Self {
        Self {
            count: 20,
            radius: 7.5,
            speed: 2.5,
        }
    }
}

/// Health restoration rolls made on every hit.
///
/// Each roll is independent; several can pay out on the same hit.
/// Amounts are fractions of max health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreTuning {
    /// Chance of a full restore
    pub full_chance: f32,
    /// Chance of restoring `half_amount`, only when at or below half health
    pub half_chance: f32,
    pub half_amount: f32,
    /// Chance of restoring `small_amount` when below max
    pub small_chance: f32,
    pub small_amount: f32,
    /// `(chance, amount)` tiers rolled after the small restore, each gated on being below max
    pub tiers: [(f32, f32); 2],
}

impl Default for RestoreTuning {
    fn default() -> Self {
        Self {
            full_chance: 0.0001,
            half_chance: 0.01,
            half_amount: 0.5,
            small_chance: 0.5,
            small_amount: 0.025,
            tiers: [(0.1, 0.05), (0.2, 0.05)],
        }
    }
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Gravity (per frame) ===
    /// Player and other rect bodies
    pub gravity: f32,
    pub projectile_gravity: f32,
    pub particle_gravity: f32,

    // === Player movement ===
    pub acceleration: f32,
    /// Horizontal velocity multiplier when no direction is held
    pub friction: f32,
    /// Horizontal acceleration only applies below this speed
    pub max_velocity: f32,
    /// Upward velocity added per frame while "up" is held
    pub lift_step: f32,
    /// Upward speed cap
    pub max_lift: f32,
    pub max_health: f32,

    // === Firing ===
    pub projectile_speed: f32,
    pub fire_cooldown_ms: f64,

    // === Obstacles ===
    pub spawn_interval_ms: u32,
    /// Spawn speeds are drawn from `[0, enemy_max_speed)`
    pub enemy_max_speed: f32,
    /// Health lost when an obstacle leaves through the floor
    pub obstacle_damage: f32,
    /// Width and height worn off every obstacle each frame
    pub obstacle_erosion: f32,

    // === Effects ===
    pub burst: BurstTuning,
    pub restore: RestoreTuning,
    /// Remove particles as soon as they leave the playfield
    pub cull_particles: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            projectile_gravity: 0.09,
            particle_gravity: 0.02,

            acceleration: 0.5,
            friction: 0.8,
            max_velocity: 10.0,
            lift_step: 1.0,
            max_lift: 10.0,
            max_health: 100.0,

            projectile_speed: 10.0,
            fire_cooldown_ms: 500.0,

            spawn_interval_ms: 1000,
            enemy_max_speed: 5.0,
            obstacle_damage: 10.0,
            obstacle_erosion: 0.0,

            burst: BurstTuning::default(),
            restore: RestoreTuning::default(),
            cull_particles: false,
        }
    }
}

impl Tuning {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "rusher_tuning";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
