//! Gravity integration and pursuit steering

use super::body::{Body, Shape};
use super::state::Playfield;

/// Add `gravity` to the vertical velocity.
///
/// A rect whose bottom edge has passed the floor is stopped and parked one
/// unit above it. Circles are not floor-clamped and fall out of the playfield.
pub fn apply_gravity(body: &mut Body, gravity: f32, field: Playfield) {
    body.vel.y += gravity;
    if let Shape::Rect { height, .. } = body.shape {
        if body.pos.y + height > field.height {
            body.vel.y = 0.0;
            body.pos.y = field.height - height - 1.0;
        }
    }
}

/// Point `chaser`'s velocity at `target`.
///
/// Without an explicit speed the target's summed velocity components are
/// used. Coincident bodies leave the velocity untouched.
pub fn chase_entity(target: &Body, chaser: &mut Body, speed: Option<f32>) {
    let speed = speed.unwrap_or(target.vel.x + target.vel.y);
    let delta = target.pos - chaser.pos;
    let distance = delta.length();

    if distance > 0.0 {
        chaser.vel = delta / distance * speed;
    }
}
