//! Menu view model
//!
//! The host owns the DOM; this decides what the menu overlay should show.

use crate::sim::{GamePhase, World};

/// Title shown on the start and death screens
pub const GAME_TITLE: &str = "RUSHER";
/// Title shown while paused
pub const PAUSED_TITLE: &str = "Paused";

/// What the menu overlay shows for the current game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub visible: bool,
    pub title: &'static str,
    pub score_text: String,
    /// Pausing is undone with Escape, so the play button only appears when
    /// starting a fresh game
    pub play_button_visible: bool,
}

impl MenuView {
    /// Menu shown before the first game starts
    pub fn start_screen(world: &World) -> Self {
        Self {
            visible: true,
            title: GAME_TITLE,
            score_text: world.score_text(),
            play_button_visible: true,
        }
    }

    pub fn for_world(world: &World) -> Self {
        match world.phase {
            GamePhase::Running => Self {
                visible: false,
                title: GAME_TITLE,
                score_text: world.score_text(),
                play_button_visible: false,
            },
            GamePhase::Paused => Self {
                visible: true,
                title: PAUSED_TITLE,
                score_text: world.score_text(),
                play_button_visible: false,
            },
            GamePhase::GameOver => Self {
                visible: true,
                title: GAME_TITLE,
                score_text: world.score_text(),
                play_button_visible: true,
            },
        }
    }
}
