//! Moving bodies
//!
//! Every entity is a [`Body`]: shared position, velocity and color plus a
//! [`Shape`] holding the geometry. Rect positions are the top-left corner;
//! circle positions are the center.

use glam::Vec2;

use crate::renderer::{Canvas, Color};

/// Geometry of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

/// A moving, drawable body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    pub color: Color,
}

impl Body {
    pub fn rect(pos: Vec2, vel: Vec2, width: f32, height: f32, color: Color) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0);
        Self {
            pos,
            vel,
            shape: Shape::Rect { width, height },
            color,
        }
    }

    pub fn circle(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        debug_assert!(radius >= 0.0);
        Self {
            pos,
            vel,
            shape: Shape::Circle { radius },
            color,
        }
    }

    /// Paint the body at its current state
    pub fn draw(&self, canvas: &mut impl Canvas) {
        match self.shape {
            Shape::Rect { width, height } => {
                canvas.fill_rect(self.pos.x, self.pos.y, width, height, self.color)
            }
            Shape::Circle { radius } => {
                canvas.fill_circle(self.pos.x, self.pos.y, radius, self.color)
            }
        }
    }

    /// Advance position by one frame of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Draw, then integrate
    pub fn update(&mut self, canvas: &mut impl Canvas) {
        self.draw(canvas);
        self.integrate();
    }

    /// Size of the body's bounding box
    pub fn extent(&self) -> Vec2 {
        match self.shape {
            Shape::Rect { width, height } => Vec2::new(width, height),
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
        }
    }

    /// Geometric center
    pub fn center(&self) -> Vec2 {
        match self.shape {
            Shape::Rect { width, height } => self.pos + Vec2::new(width, height) * 0.5,
            Shape::Circle { .. } => self.pos,
        }
    }

    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            Shape::Rect { .. } => None,
        }
    }
}
