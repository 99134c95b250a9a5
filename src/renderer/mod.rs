//! Rendering module
//!
//! Entities paint themselves through the [`Canvas`] primitives. The WebGPU
//! pipeline presents whatever a [`ShapeBatch`] collected during a frame.

pub mod batch;
pub mod pipeline;
pub mod vertex;

pub use batch::{ShapeBatch, TextLabel};
pub use pipeline::RenderState;

use serde::{Deserialize, Serialize};

/// Straight RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Drawing surface entities paint onto.
///
/// Coordinates are logical playfield units: origin top-left, y grows downward.
pub trait Canvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    /// Logical playfield size
    fn size(&self) -> (f32, f32);
}
