//! Bounds culling and overlap tests
//!
//! Detection only: the checks report through a caller-supplied callback and
//! never touch the registries themselves.

use glam::Vec2;

use super::body::{Body, Shape};
use super::state::Playfield;

/// True once the whole body has cleared one of the playfield edges.
///
/// Touching an edge (a circle tangent to it, a rect flush with it) is still in bounds.
pub fn is_out_of_bounds(body: &Body, field: Playfield) -> bool {
    let p = body.pos;
    match body.shape {
        Shape::Circle { radius } => {
            p.x + radius < 0.0
                || p.x - radius > field.width
                || p.y + radius < 0.0
                || p.y - radius > field.height
        }
        Shape::Rect { width, height } => {
            p.x + width < 0.0 || p.x > field.width || p.y + height < 0.0 || p.y > field.height
        }
    }
}

/// Run `on_out_of_bounds` once if the body has left the playfield
pub fn check_out_of_bounds(body: &Body, field: Playfield, on_out_of_bounds: impl FnOnce()) -> bool {
    if is_out_of_bounds(body, field) {
        on_out_of_bounds();
        true
    } else {
        false
    }
}

/// Circle vs axis-aligned rect: clamp the center onto the rect, then compare
/// the distance to the closest point against the radius (touching counts)
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_pos: Vec2, rect_size: Vec2) -> bool {
    let closest = center.clamp(rect_pos, rect_pos + rect_size);
    center.distance(closest) <= radius
}

/// Overlap test for any pair of bodies; the result does not depend on argument order
pub fn bodies_collide(a: &Body, b: &Body) -> bool {
    match (a.shape, b.shape) {
        (Shape::Circle { radius }, Shape::Rect { width, height }) => {
            circle_rect_overlap(a.pos, radius, b.pos, Vec2::new(width, height))
        }
        (Shape::Rect { width, height }, Shape::Circle { radius }) => {
            circle_rect_overlap(b.pos, radius, a.pos, Vec2::new(width, height))
        }
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            a.pos.distance(b.pos) <= ra + rb
        }
        (
            Shape::Rect {
                width: wa,
                height: ha,
            },
            Shape::Rect {
                width: wb,
                height: hb,
            },
        ) => {
            a.pos.x <= b.pos.x + wb
                && b.pos.x <= a.pos.x + wa
                && a.pos.y <= b.pos.y + hb
                && b.pos.y <= a.pos.y + ha
        }
    }
}

/// Run `on_collide` once if the two bodies overlap
pub fn check_collision(a: &Body, b: &Body, on_collide: impl FnOnce()) -> bool {
    if bodies_collide(a, b) {
        on_collide();
        true
    } else {
        false
    }
}
