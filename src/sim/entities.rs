//! Game entities built on [`Body`]

use glam::Vec2;
use rand::Rng;

use super::body::{Body, Shape};
use super::state::Playfield;
use crate::consts::*;
use crate::renderer::vertex::colors;
use crate::renderer::{Canvas, Color};

/// The player's avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
}

impl Player {
    /// New player centered on the playfield at full health
    pub fn new(field: Playfield, max_health: f32) -> Self {
        Self {
            body: Body::rect(
                field.center(),
                Vec2::ZERO,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
                colors::PLAYER,
            ),
            health: max_health,
            max_health,
        }
    }

    /// Back to the center, at rest, full health
    pub fn reset(&mut self, field: Playfield) {
        self.body.pos = field.center();
        self.body.vel = Vec2::ZERO;
        self.health = self.max_health;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// A shot fired by the player
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub(crate) distance_traveled: f32,
}

impl Projectile {
    /// Fire from `origin` along `angle` (radians, y down)
    pub fn new(origin: Vec2, speed: f32, angle: f32) -> Self {
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        Self {
            body: Body::circle(origin, vel, PROJECTILE_RADIUS, colors::PROJECTILE),
            distance_traveled: 0.0,
        }
    }

    /// Draw, integrate and accumulate the distance covered this frame
    pub fn update(&mut self, canvas: &mut impl Canvas) {
        self.body.update(canvas);
        self.distance_traveled += self.body.vel.length();
    }

    /// Raw distance covered since firing
    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    /// Distance in whole units of [`DISTANCE_UNIT`]; this is what scoring reads
    pub fn distance_units(&self) -> u64 {
        (self.distance_traveled / DISTANCE_UNIT).floor() as u64
    }
}

/// A falling block the player must shoot or dodge
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub body: Body,
    /// Spawn-time width and height
    pub original: Vec2,
    /// Spawn-time fall speed
    pub speed: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, width: f32, height: f32, speed: f32, color: Color) -> Self {
        Self {
            body: Body::rect(pos, Vec2::new(0.0, speed), width, height, color),
            original: Vec2::new(width, height),
            speed,
        }
    }

    /// Spawn at a random x along the top edge with a random color and a
    /// downward speed in `[0, max_speed)`
    pub fn spawn(rng: &mut impl Rng, field: Playfield, max_speed: f32) -> Self {
        let x = rng.random::<f32>() * field.width;
        let speed = rng.random::<f32>() * max_speed;
        let color = Color::rgb8(rng.random(), rng.random(), rng.random());
        Self::new(
            Vec2::new(x, 0.0),
            OBSTACLE_SIZE,
            OBSTACLE_SIZE,
            speed,
            color,
        )
    }

    pub fn width(&self) -> f32 {
        match self.body.shape {
            Shape::Rect { width, .. } => width,
            Shape::Circle { radius } => radius * 2.0,
        }
    }

    pub fn height(&self) -> f32 {
        match self.body.shape {
            Shape::Rect { height, .. } => height,
            Shape::Circle { radius } => radius * 2.0,
        }
    }

    /// Fraction of spawn area still left: 1 - (original - current) / original
    pub fn shrink_ratio(&self) -> f32 {
        let original = self.original.x * self.original.y;
        if original <= 0.0 {
            return 0.0;
        }
        let current = self.width() * self.height();
        1.0 - (original - current) / original
    }

    /// Wear the block down on both axes; sizes stop at zero
    pub fn erode(&mut self, amount: f32) {
        if let Shape::Rect { width, height } = &mut self.body.shape {
            *width = (*width - amount).max(0.0);
            *height = (*height - amount).max(0.0);
        }
    }

    /// Draw at full size until damaged, then as a center-anchored rect
    /// scaled by the shrink ratio. Nothing is drawn once a side reaches zero.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        let (w, h) = (self.width(), self.height());
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        if w * h >= self.original.x * self.original.y {
            self.body.draw(canvas);
            return;
        }

        let scaled = Vec2::new(w, h) * self.shrink_ratio();
        let corner = self.body.center() - scaled * 0.5;
        canvas.fill_rect(corner.x, corner.y, scaled.x, scaled.y, self.body.color);
    }

    pub fn update(&mut self, canvas: &mut impl Canvas) {
        self.draw(canvas);
        self.body.integrate();
    }
}

/// One fragment of a hit burst
pub type Particle = Body;

/// Particle leaving `origin` at `speed` along `angle`
pub fn particle(origin: Vec2, angle: f32, speed: f32, radius: f32, color: Color) -> Particle {
    Body::circle(origin, Vec2::new(angle.cos(), angle.sin()) * speed, radius, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ShapeBatch;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn test_projectile_velocity_from_angle() {
        let p = Projectile::new(Vec2::ZERO, 10.0, std::f32::consts::FRAC_PI_2);
        assert!(p.body.vel.x.abs() < 1e-5);
        assert!((p.body.vel.y - 10.0).abs() < 1e-5);
        assert_eq!(p.body.radius(), Some(PROJECTILE_RADIUS));
    }

    #[test]
    fn test_projectile_distance_accumulates() {
        let mut canvas = ShapeBatch::new(800.0, 600.0);
        let mut p = Projectile::new(Vec2::ZERO, 10.0, 0.0);
        let mut last = 0.0;
        for _ in 0..4 {
            p.update(&mut canvas);
            assert!(p.distance_traveled() >= last);
            last = p.distance_traveled();
        }
        assert!((p.distance_traveled() - 40.0).abs() < 1e-3);
        assert_eq!(p.distance_units(), 4);
    }

    #[test]
    fn test_distance_units_floor() {
        let mut p = Projectile::new(Vec2::ZERO, 0.0, 0.0);
        p.distance_traveled = 37.0;
        assert_eq!(p.distance_units(), 3);
        p.distance_traveled = 9.99;
        assert_eq!(p.distance_units(), 0);
    }

    #[test]
    fn test_obstacle_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let o = Obstacle::spawn(&mut rng, field(), 5.0);
            assert_eq!(o.body.pos.y, 0.0);
            assert!(o.body.pos.x >= 0.0 && o.body.pos.x < 800.0);
            assert_eq!(o.body.vel.x, 0.0);
            assert!(o.body.vel.y >= 0.0 && o.body.vel.y < 5.0);
            assert_eq!(o.original, Vec2::splat(OBSTACLE_SIZE));
        }
    }

    #[test]
    fn test_shrink_ratio() {
        let mut o = Obstacle::new(Vec2::ZERO, 50.0, 50.0, 1.0, Color::WHITE);
        assert_eq!(o.shrink_ratio(), 1.0);
        o.erode(25.0);
        assert!((o.shrink_ratio() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_damaged_obstacle_draws_centered() {
        let mut canvas = ShapeBatch::new(800.0, 600.0);
        let mut o = Obstacle::new(Vec2::ZERO, 40.0, 40.0, 0.0, Color::WHITE);
        o.erode(20.0); // 20x20, ratio 0.25 -> drawn 5x5 around (10, 10)
        o.draw(&mut canvas);

        let xs: Vec<f32> = canvas.vertices.iter().map(|v| v.position[0]).collect();
        let min = xs.iter().cloned().fold(f32::MAX, f32::min);
        let max = xs.iter().cloned().fold(f32::MIN, f32::max);
        assert!((min - 7.5).abs() < 1e-4);
        assert!((max - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_fully_eroded_obstacle_not_drawn() {
        let mut canvas = ShapeBatch::new(800.0, 600.0);
        let mut o = Obstacle::new(Vec2::ZERO, 50.0, 50.0, 0.0, Color::WHITE);
        o.erode(60.0);
        assert_eq!(o.width(), 0.0);
        o.update(&mut canvas);
        assert!(canvas.vertices.is_empty());
    }

    #[test]
    fn test_player_reset() {
        let mut player = Player::new(field(), 100.0);
        player.body.pos = Vec2::new(3.0, 4.0);
        player.body.vel = Vec2::new(1.0, 1.0);
        player.health = -5.0;
        assert!(player.is_dead());

        player.reset(field());
        assert_eq!(player.body.pos, Vec2::new(400.0, 300.0));
        assert_eq!(player.body.vel, Vec2::ZERO);
        assert_eq!(player.health, 100.0);
    }
}
