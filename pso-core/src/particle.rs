use crate::config::{Bounds, GOAL_RADIUS, PALETTE};
use crate::rng::UniformSource;
use crate::Vector2D;

/// A single swarm member
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Smallest fitness this particle has observed, `+inf` until evaluated
    pub personal_best: f64,
    pub personal_best_position: Vector2D,
    pub is_global_best: bool,
    /// Render tint, no effect on the simulation
    pub color: u32,
}

impl Particle {
    pub fn new(position: Vector2D, velocity: Vector2D, color: u32) -> Self {
        Self {
            position,
            velocity,
            personal_best: f64::INFINITY,
            personal_best_position: position,
            is_global_best: false,
            color,
        }
    }

    /// Spawns a particle anywhere inside `bounds` with a small random drift.
    pub fn random<R: UniformSource + ?Sized>(rng: &mut R, bounds: Bounds) -> Self {
        let position = Vector2D::new(rng.range(0.0, bounds.width), rng.range(0.0, bounds.height));
        let velocity = Vector2D::new(rng.range(-0.5, 0.5), rng.range(-0.5, 0.5));
        let slot = (rng.next_unit() * PALETTE.len() as f64) as usize;
        let color = PALETTE[slot.min(PALETTE.len() - 1)];
        Self::new(position, velocity, color)
    }

    /// Records `fitness` as the personal best when it improves on it.
    ///
    /// A personal best of exactly zero counts as unset and is always
    /// overwritten, even by a worse fitness.
    pub fn record_fitness(&mut self, fitness: f64) {
        if fitness < self.personal_best || self.personal_best == 0.0 {
            self.personal_best = fitness;
            self.personal_best_position = self.position;
        }
    }

    pub fn reset_personal_best(&mut self) {
        self.personal_best = f64::INFINITY;
    }

    pub fn limit_speed(&mut self, speed_limit: f64) {
        self.velocity = self.velocity.limit(speed_limit);
    }

    /// Moves the particle by its velocity, then clamps it into `bounds`.
    ///
    /// Each axis bounces on its own: the offending coordinate is clamped and
    /// its velocity component is reversed and scaled by `restitution`.
    pub fn integrate(&mut self, bounds: Bounds, restitution: f64) {
        self.position += self.velocity;

        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x *= -restitution;
        }
        if self.position.x > bounds.width {
            self.position.x = bounds.width;
            self.velocity.x *= -restitution;
        }
        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y *= -restitution;
        }
        if self.position.y > bounds.height {
            self.position.y = bounds.height;
            self.velocity.y *= -restitution;
        }
    }
}

/// The point the swarm converges on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub position: Vector2D,
    /// Marker size for rendering only
    pub radius: f64,
}

impl Goal {
    pub fn new(position: Vector2D, radius: f64) -> Self {
        Self { position, radius }
    }

    pub fn at_default_location(bounds: Bounds) -> Self {
        Self::new(
            Vector2D::new(bounds.width / 4.0, bounds.height / 2.0),
            GOAL_RADIUS,
        )
    }

    /// Euclidean distance from `position` to the goal, lower is better
    pub fn fitness(&self, position: Vector2D) -> f64 {
        position.distance(&self.position)
    }

    pub fn move_to(&mut self, position: Vector2D) {
        self.position = position;
    }
}
