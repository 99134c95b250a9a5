//! Game settings and preferences
//!
//! Persisted separately from the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, StorageError};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Obstacles fall straight down
    #[default]
    Normal,
    /// Obstacles steer toward the player
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "easy" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Whether obstacles pursue the player
    pub fn obstacles_pursue(&self) -> bool {
        matches!(self, Difficulty::Hard)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Visual Effects ===
    /// Particle bursts on hits
    pub particles: bool,
    /// Fade previous frames instead of clearing
    pub trails: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            particles: true,
            trails: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "rusher_settings";

    pub fn load(store: &impl KeyValueStore) -> Self {
        persistence::load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
