//! Hit bursts
//!
//! A [`ParticleSystem`] is a batch of circular fragments thrown out radially
//! from one point. It is finished once gravity has turned every fragment
//! downward, which is a visual heuristic rather than a lifetime.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::check_out_of_bounds;
use super::entities::{Particle, particle};
use super::physics::apply_gravity;
use super::state::Playfield;
use crate::renderer::{Canvas, Color};

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    /// Particles painted by the last `draw`
    pub live_count: usize,
}

impl ParticleSystem {
    /// Emit `count` particles from `origin`, each at a uniformly random angle
    pub fn new(
        rng: &mut impl Rng,
        origin: Vec2,
        count: usize,
        radius: f32,
        speed: f32,
        color: Color,
    ) -> Self {
        let particles = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * TAU;
                particle(origin, angle, speed, radius, color)
            })
            .collect::<Vec<_>>();
        let live_count = particles.len();
        Self {
            particles,
            live_count,
        }
    }

    /// Integrate every particle and run the per-particle bounds check.
    ///
    /// With `cull` unset the out-of-bounds callback does nothing, so strays
    /// keep drifting until the burst is done.
    pub fn update(&mut self, field: Playfield, cull: bool) {
        for p in &mut self.particles {
            p.integrate();
        }
        if cull {
            self.particles.retain(|p| !check_out_of_bounds(p, field, || {}));
        } else {
            for p in &self.particles {
                check_out_of_bounds(p, field, || {});
            }
        }
    }

    pub fn apply_gravity(&mut self, gravity: f32, field: Playfield) {
        for p in &mut self.particles {
            apply_gravity(p, gravity, field);
        }
    }

    pub fn draw(&mut self, canvas: &mut impl Canvas) {
        for p in &self.particles {
            p.draw(canvas);
        }
        self.live_count = self.particles.len();
    }

    /// Every particle has stopped rising
    pub fn is_done(&self) -> bool {
        self.particles.iter().all(|p| p.vel.y >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ShapeBatch;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    fn burst(count: usize) -> ParticleSystem {
        let mut rng = Pcg32::seed_from_u64(3);
        ParticleSystem::new(&mut rng, Vec2::new(400.0, 300.0), count, 2.0, 2.5, Color::WHITE)
    }

    #[test]
    fn test_particles_share_speed() {
        let system = burst(50);
        assert_eq!(system.particles.len(), 50);
        for p in &system.particles {
            assert!((p.vel.length() - 2.5).abs() < 1e-4);
            assert_eq!(p.pos, Vec2::new(400.0, 300.0));
        }
    }

    #[test]
    fn test_burst_finishes_under_gravity() {
        let mut system = burst(30);
        let mut frames = 0;
        while !system.is_done() {
            system.update(field(), false);
            system.apply_gravity(0.02, field());
            frames += 1;
            assert!(frames < 1000, "burst never finished");
        }
        // Speed 2.5 at 0.02 per frame needs at most 125 frames
        assert!(frames <= 130);
    }

    #[test]
    fn test_inert_culling_keeps_strays() {
        let mut system = burst(10);
        for p in &mut system.particles {
            p.pos = Vec2::new(-100.0, -100.0);
        }
        system.update(field(), false);
        assert_eq!(system.particles.len(), 10);

        system.update(field(), true);
        assert!(system.particles.is_empty());
    }

    #[test]
    fn test_draw_counts_live_particles() {
        let mut system = burst(12);
        let mut canvas = ShapeBatch::new(800.0, 600.0);
        system.particles.truncate(5);
        system.draw(&mut canvas);
        assert_eq!(system.live_count, 5);
    }

    proptest! {
        #[test]
        fn prop_done_iff_no_particle_rising(vys in proptest::collection::vec(-5.0f32..5.0, 1..40)) {
            let mut system = burst(vys.len());
            for (p, vy) in system.particles.iter_mut().zip(&vys) {
                p.vel.y = *vy;
            }
            prop_assert_eq!(system.is_done(), vys.iter().all(|vy| *vy >= 0.0));
        }
    }
}
