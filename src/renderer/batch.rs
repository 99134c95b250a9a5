//! Shape batching for 2D primitives
//!
//! Tessellates canvas calls into triangle lists in playfield coordinates.
//! Text is not rasterized here; labels are collected for the host to place.

use std::f32::consts::PI;

use glam::Vec2;

use super::vertex::Vertex;
use super::{Canvas, Color};

/// Triangles per circle fan
pub const CIRCLE_SEGMENTS: u32 = 24;

/// A text draw request
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// One frame's worth of draw calls
#[derive(Debug, Clone)]
pub struct ShapeBatch {
    pub vertices: Vec<Vertex>,
    pub labels: Vec<TextLabel>,
    width: f32,
    height: f32,
}

impl ShapeBatch {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            vertices: Vec::new(),
            labels: Vec::new(),
            width,
            height,
        }
    }

    /// Drop everything drawn so far (call at the start of each frame)
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.labels.is_empty()
    }

    /// Number of filled primitives drawn (two triangles per rect, one fan per circle)
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl Canvas for ShapeBatch {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.vertices.extend(rect(Vec2::new(x, y), Vec2::new(w, h), color.to_array()));
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Color) {
        self.vertices.extend(circle(
            Vec2::new(x, y),
            r,
            color.to_array(),
            CIRCLE_SEGMENTS,
        ));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(origin: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0) = (origin.x, origin.y);
    let (x1, y1) = (origin.x + size.x, origin.y + size.y);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 5.0, [1.0; 4], 12);
        assert_eq!(verts.len(), 36);
        for v in verts.iter().skip(1).step_by(3) {
            let r = Vec2::new(v.position[0], v.position[1]).length();
            assert!((r - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_batch_collects_primitives_and_labels() {
        let mut batch = ShapeBatch::new(800.0, 600.0);
        batch.fill_rect(0.0, 0.0, 10.0, 10.0, Color::WHITE);
        batch.fill_circle(5.0, 5.0, 2.0, Color::RED);
        batch.fill_text("Score: 3", 20.0, 60.0);

        assert_eq!(batch.triangle_count(), 2 + CIRCLE_SEGMENTS as usize);
        assert_eq!(batch.labels.len(), 1);
        assert_eq!(batch.labels[0].text, "Score: 3");
        assert_eq!(batch.size(), (800.0, 600.0));

        batch.clear();
        assert!(batch.is_empty());
    }
}
