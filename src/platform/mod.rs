//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Directional input intent (keys, touch buttons)
//! - Pointer coordinates (screen to playfield)

pub mod input;

pub use input::{Intent, ScreenRect, screen_to_playfield};
