//! Game state and core simulation types
//!
//! [`World`] owns everything the frame driver mutates: the player, the three
//! live-entity registries and the counters. Nothing else holds references
//! into it between calls.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::{Obstacle, Player, Projectile};
use super::particles::ParticleSystem;
use crate::consts::*;
use crate::renderer::vertex::colors;
use crate::renderer::{Canvas, Color};
use crate::settings::{Difficulty, Settings};
use crate::tuning::Tuning;

/// Logical size of the area entities move in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Frame driver idle; also the state before the first start
    Paused,
    /// Active gameplay
    Running,
    /// Health ran out; only a reset leaves this phase
    GameOver,
}

/// Things that happened during a callback, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ObstacleSpawned,
    ProjectileFired,
    ObstacleDestroyed { points: u64 },
    HealthRestored { amount: f32 },
    PlayerDamaged { amount: f32 },
    NewHighScore(u64),
    GameOver,
}

/// A labelled counter drawn as HUD text
#[derive(Debug, Clone)]
pub struct Score {
    pub value: u64,
    pub label: &'static str,
    pub pos: Vec2,
}

impl Score {
    pub fn new(value: u64, label: &'static str, pos: (f32, f32)) -> Self {
        Self {
            value,
            label,
            pos: Vec2::new(pos.0, pos.1),
        }
    }

    pub fn add(&mut self, points: u64) {
        self.value += points;
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.fill_text(&format!("{}: {}", self.label, self.value), self.pos.x, self.pos.y);
    }
}

/// View over the player's health, refreshed every frame
#[derive(Debug, Clone)]
pub struct HealthBar {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub current: f32,
    pub max: f32,
}

impl HealthBar {
    /// Full-width bar along the top of the playfield
    pub fn new(field: Playfield, max: f32) -> Self {
        Self {
            pos: Vec2::splat(HEALTH_BAR_MARGIN),
            size: Vec2::new(field.width - 2.0 * HEALTH_BAR_MARGIN, HEALTH_BAR_HEIGHT),
            color: colors::HEALTH_FILL,
            current: max,
            max,
        }
    }

    pub fn update(&mut self, health: f32) {
        self.current = health;
    }

    /// Filled fraction, clamped to 0..=1
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.fill_rect(self.pos.x, self.pos.y, self.size.x, self.size.y, colors::HEALTH_TRACK);
        let fill = self.size.x * self.fraction();
        if fill > 0.0 {
            canvas.fill_rect(self.pos.x, self.pos.y, fill, self.size.y, self.color);
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub field: Playfield,
    pub tuning: Tuning,
    pub difficulty: Difficulty,
    /// Spawn particle bursts on hits
    pub particles_enabled: bool,
    pub phase: GamePhase,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub particle_systems: Vec<ParticleSystem>,
    pub score: Score,
    pub high_score: Score,
    pub health_bar: HealthBar,
    /// Frames run since the last reset
    pub frame: u64,
    pub events: Vec<GameEvent>,
    /// Timestamp of the last accepted shot
    pub(crate) last_fire_ms: Option<f64>,
    pub(crate) rng: Pcg32,
    pub seed: u64,
}

impl World {
    /// A paused world with empty registries. `high_score` is the persisted best.
    pub fn new(
        seed: u64,
        field: Playfield,
        tuning: Tuning,
        settings: &Settings,
        high_score: u64,
    ) -> Self {
        let max_health = tuning.max_health;
        Self {
            field,
            difficulty: settings.difficulty,
            particles_enabled: settings.particles,
            phase: GamePhase::Paused,
            player: Player::new(field, max_health),
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            particle_systems: Vec::new(),
            score: Score::new(0, "Score", SCORE_POS),
            high_score: Score::new(high_score, "Highest Score", HIGH_SCORE_POS),
            health_bar: HealthBar::new(field, max_health),
            frame: 0,
            events: Vec::new(),
            last_fire_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            tuning,
        }
    }

    /// Clear registries and counters, recenter the player at full health and start running
    pub fn reset(&mut self) {
        let previous = self.score.value;
        self.player.reset(self.field);
        self.health_bar.update(self.player.health);
        self.projectiles.clear();
        self.obstacles.clear();
        self.particle_systems.clear();
        self.score.value = 0;
        self.frame = 0;
        self.last_fire_ms = None;
        self.phase = GamePhase::Running;
        log::info!("Game reset (previous score {})", previous);
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            log::info!("Paused at frame {}", self.frame);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            log::info!("Resumed");
        }
    }

    /// Flip between Running and Paused; a finished game stays finished
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Menu summary line
    pub fn score_text(&self) -> String {
        format!("Score: {} Highest: {}", self.score.value, self.high_score.value)
    }

    /// Add points and lift the high score along with them
    pub(crate) fn award(&mut self, points: u64) {
        self.score.add(points);
        if self.score.value > self.high_score.value {
            self.high_score.value = self.score.value;
            self.events.push(GameEvent::NewHighScore(self.score.value));
        }
    }

    /// Subtract `amount` from health, then end the game if nothing is left
    pub(crate) fn damage_player(&mut self, amount: f32) {
        if amount > 0.0 {
            self.player.health -= amount;
            self.events.push(GameEvent::PlayerDamaged { amount });
        }
        self.check_death();
    }

    pub(crate) fn check_death(&mut self) {
        if self.phase == GamePhase::Running && self.player.is_dead() {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            log::info!(
                "Game over at frame {} with score {}",
                self.frame,
                self.score.value
            );
        }
    }
}
