//! Input state shared between event handlers and the frame driver

use glam::Vec2;

/// Held directions. Event handlers write it; the frame driver reads it every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Intent {
    /// Apply a key press or release by `KeyboardEvent.key`.
    /// Returns false for keys that don't map to a direction.
    pub fn apply_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key.to_lowercase().as_str() {
            "w" => &mut self.up,
            "s" => &mut self.down,
            "a" => &mut self.left,
            "d" => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Horizontal direction: -1 left, 1 right, 0 for none or both
    pub fn horizontal(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Client rect of the drawing surface on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Map a pointer position in client pixels onto the playfield, accounting for
/// the surface being scaled to a different size than its logical resolution
pub fn screen_to_playfield(client: Vec2, rect: ScreenRect, logical: Vec2) -> Vec2 {
    let scale = Vec2::new(
        if rect.width > 0.0 { logical.x / rect.width } else { 1.0 },
        if rect.height > 0.0 { logical.y / rect.height } else { 1.0 },
    );
    (client - Vec2::new(rect.left, rect.top)) * scale
}
