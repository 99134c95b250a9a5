//! Rusher - A falling-obstacle arcade survival shooter
//!
//! Core modules:
//! - `sim`: Simulation core (entities, physics, collisions, frame driver)
//! - `renderer`: Draw primitives and the WebGPU presentation pipeline
//! - `platform`: Browser/native input abstraction
//! - `persistence`: Key-value storage for scores and preferences
//! - `tuning`: Data-driven game balance
//! - `ui`: Menu view model for the host

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScore;
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Projectile radius
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    /// Raw distance per rounded distance unit
    pub const DISTANCE_UNIT: f32 = 10.0;
    /// Rounded distance units per score point
    pub const SCORE_DIVISOR: u64 = 5;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 75.0;

    /// Obstacles spawn square
    pub const OBSTACLE_SIZE: f32 = 50.0;

    /// HUD layout
    pub const HEALTH_BAR_MARGIN: f32 = 10.0;
    pub const HEALTH_BAR_HEIGHT: f32 = 20.0;
    pub const SCORE_POS: (f32, f32) = (20.0, 60.0);
    pub const HIGH_SCORE_POS: (f32, f32) = (20.0, 90.0);

    /// Opacity of the per-frame background overpaint (motion trails)
    pub const TRAIL_ALPHA: f32 = 0.1;
}
