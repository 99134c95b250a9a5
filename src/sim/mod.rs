//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only, so a seed and an input sequence replay the same game
//! - Registries are owned by [`World`] and only mutated from inside a callback
//! - Drawing goes through [`crate::renderer::Canvas`], never a GPU handle

pub mod body;
pub mod collision;
pub mod economy;
pub mod entities;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use body::{Body, Shape};
pub use collision::{bodies_collide, check_collision, check_out_of_bounds, is_out_of_bounds};
pub use economy::{roll_health_restore, score_for_hit};
pub use entities::{Obstacle, Particle, Player, Projectile};
pub use particles::ParticleSystem;
pub use physics::{apply_gravity, chase_entity};
pub use state::{GameEvent, GamePhase, HealthBar, Playfield, Score, World};
pub use tick::{SpawnTimer, fire, spawn_tick, tick};
